//! Write a team's timetable as a CSV grid: people down, dates across.
//!
//! ```text
//! name,2026-10-19,2026-10-20
//! Dana Levi,Night,Night
//! Noa Cohen,Morning,After
//! standby-morning,Noa Cohen,Dana Levi
//! standby-night,Avi Golan,Noa Cohen
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use shabzak_core::{Day, Person, PersonId, StandbyDay};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::debug;

/// Everything one sheet shows. Dates without a stored day render empty.
#[derive(Debug, Clone, Default)]
pub struct TimetableView {
    pub dates: Vec<NaiveDate>,
    pub people: Vec<Person>,
    pub days: Vec<Day>,
    pub standby: Vec<StandbyDay>,
}

impl TimetableView {
    pub fn new(dates: Vec<NaiveDate>, people: Vec<Person>) -> Self {
        Self {
            dates,
            people,
            ..Self::default()
        }
    }

    pub fn with_days(mut self, days: Vec<Day>) -> Self {
        self.days = days;
        self
    }

    pub fn with_standby(mut self, standby: Vec<StandbyDay>) -> Self {
        self.standby = standby;
        self
    }

    fn cell(&self, day: Option<&Day>, person: PersonId) -> String {
        let Some(a) = day.and_then(|d| d.assignment_for(person)) else {
            return String::new();
        };
        match &a.location {
            Some(loc) => format!("{} @ {loc}", a.duty),
            None => a.duty.to_string(),
        }
    }

    fn name_of(&self, id: PersonId) -> String {
        self.people
            .iter()
            .find(|p| p.id == id)
            .map(Person::full_name)
            .unwrap_or_else(|| id.to_string())
    }
}

pub fn write_timetable_csv(writer: impl Write, view: &TimetableView) -> Result<()> {
    let days: BTreeMap<NaiveDate, &Day> = view.days.iter().map(|d| (d.date, d)).collect();
    let standby: BTreeMap<NaiveDate, &StandbyDay> =
        view.standby.iter().map(|s| (s.date, s)).collect();

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["name".to_string()];
    header.extend(view.dates.iter().map(|d| d.format("%Y-%m-%d").to_string()));
    wtr.write_record(&header)?;

    for person in &view.people {
        let mut row = vec![person.full_name()];
        row.extend(
            view.dates
                .iter()
                .map(|d| view.cell(days.get(d).copied(), person.id)),
        );
        wtr.write_record(&row)?;
    }

    let standby_row = |label: &str, pick: fn(&StandbyDay) -> PersonId| {
        let mut row = vec![label.to_string()];
        row.extend(view.dates.iter().map(|d| {
            standby
                .get(d)
                .map(|s| view.name_of(pick(s)))
                .unwrap_or_default()
        }));
        row
    };
    wtr.write_record(&standby_row("standby-morning", |s| s.morning))?;
    wtr.write_record(&standby_row("standby-night", |s| s.night))?;

    wtr.flush()?;
    debug!(people = view.people.len(), dates = view.dates.len(), "timetable written");
    Ok(())
}
