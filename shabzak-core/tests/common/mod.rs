#![allow(dead_code)]

use chrono::NaiveDate;
use shabzak_core::{
    Assignment, Day, DutyType, Person, PersonId, ScheduleError, ScheduleResult, ScheduleSource,
    StandbyDay, TeamConfig, TeamId,
};
use std::collections::BTreeMap;

pub const TEAM: TeamId = TeamId(1);

/// In-memory source for driving the schedulers in tests.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub people: Vec<Person>,
    pub config: Option<TeamConfig>,
    pub locks: Vec<Assignment>,
    pub history: Vec<Day>,
    pub scores: BTreeMap<PersonId, i64>,
    pub standby: Vec<StandbyDay>,
    pub weights: Option<Vec<(DutyType, i64)>>,
}

impl Fixture {
    pub fn team(size: u32, min_nights: i32) -> Self {
        Self {
            people: (1..=size)
                .map(|i| Person::new(i, format!("P{i}"), "Test", TEAM))
                .collect(),
            config: Some(TeamConfig::new(TEAM).with_min_consecutive_nights(min_nights)),
            ..Self::default()
        }
    }

    pub fn lock(mut self, person: u32, date: NaiveDate, duty: DutyType) -> Self {
        self.locks.push(Assignment::new(PersonId(person), date, duty));
        self
    }
}

impl ScheduleSource for Fixture {
    fn roster(&self, team: TeamId) -> ScheduleResult<Vec<Person>> {
        if self.config.is_none() {
            return Err(ScheduleError::NotFound(format!("team {team}")));
        }
        Ok(self.people.iter().filter(|p| p.team == team).cloned().collect())
    }

    fn team_config(&self, team: TeamId) -> ScheduleResult<TeamConfig> {
        self.config
            .clone()
            .ok_or_else(|| ScheduleError::NotFound(format!("team {team}")))
    }

    fn locked_assignments(&self, _team: TeamId, date: NaiveDate) -> ScheduleResult<Vec<Assignment>> {
        Ok(self.locks.iter().filter(|a| a.date == date).cloned().collect())
    }

    fn history(&self, _team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<Day>> {
        Ok(self.history.iter().filter(|d| d.date >= since).cloned().collect())
    }

    fn score(&self, person: PersonId) -> ScheduleResult<i64> {
        Ok(self.scores.get(&person).copied().unwrap_or(0))
    }

    fn standby_history(&self, _team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<StandbyDay>> {
        Ok(self.standby.iter().filter(|d| d.date >= since).copied().collect())
    }

    fn duty_weights(&self) -> ScheduleResult<Vec<(DutyType, i64)>> {
        Ok(self
            .weights
            .clone()
            .unwrap_or_else(|| shabzak_core::DEFAULT_WEIGHTS.to_vec()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monday 2026-10-19.
pub fn monday() -> NaiveDate {
    date(2026, 10, 19)
}

pub fn duty_of(day: &Day, person: u32) -> Option<DutyType> {
    day.duty_of(PersonId(person))
}
