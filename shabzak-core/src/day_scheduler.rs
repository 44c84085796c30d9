//! Day scheduler: decides every roster member's duty for a single date.
//!
//! Each person ends the day in exactly one resolution:
//!
//! - `Locked`: an assignment was fixed before the run; left untouched.
//! - `NightContinuation`: the current night holder has not reached the
//!   team's minimum run yet and keeps Night.
//! - `FollowUp`: yesterday's duty earns an After day.
//! - `Scored`: heaviest duty still open for this person.
//! - `Fallback`: nothing open, so the day kind's default duty.
//!
//! The first three are forced and are resolved for the whole roster before
//! any scored selection, so a continuing night holder's Night already counts
//! as covered when the lower-scored people pick.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::duty::{DayKind, DutyType};
use crate::error::ScheduleResult;
use crate::ledger::ScoreLedger;
use crate::model::{Assignment, Day, Person, PersonId, TeamConfig};

/// Carry-over between consecutive days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightState {
    /// Whoever most recently started a night run.
    pub holder: Option<PersonId>,
    /// Consecutive nights the holder has done so far.
    pub streak: u32,
}

impl NightState {
    pub fn started_by(person: PersonId) -> Self {
        Self {
            holder: Some(person),
            streak: 1,
        }
    }

    fn owes_night(&self, person: PersonId, min_nights: u32) -> bool {
        self.holder == Some(person) && self.streak < min_nights
    }

    /// Fold a locked assignment into the state: a locked Night starts or
    /// extends a run, anything else locked on the holder ends theirs.
    fn observe_lock(&mut self, lock: &Assignment) {
        if lock.duty == DutyType::Night {
            if self.holder == Some(lock.person) {
                self.streak += 1;
            } else {
                *self = NightState::started_by(lock.person);
            }
        } else if self.holder == Some(lock.person) {
            *self = NightState::default();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Locked,
    NightContinuation,
    FollowUp,
    Scored,
    Fallback,
}

/// Everything the scheduler needs to know about one date.
#[derive(Debug, Clone)]
pub struct DayInput<'a> {
    pub date: NaiveDate,
    pub kind: DayKind,
    /// The scheduled day before this one and its kind, if there is one.
    pub previous: Option<(&'a Day, DayKind)>,
    pub locked: &'a [Assignment],
    /// Roster ranked ascending by fairness score.
    pub roster: &'a [Person],
    pub config: &'a TeamConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub day: Day,
    /// Resolution per roster member, in evaluation order.
    pub resolutions: Vec<(PersonId, Resolution)>,
    pub state: NightState,
}

impl DayOutcome {
    pub fn resolution_of(&self, person: PersonId) -> Option<Resolution> {
        self.resolutions
            .iter()
            .find(|(p, _)| *p == person)
            .map(|(_, r)| *r)
    }
}

/// Duties open to one person after every filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Ranked heaviest first.
    pub duties: Vec<DutyType>,
    /// Default duties still uncovered before person-specific filters.
    pub open_slots: usize,
}

/// Schedule one date. Scores for new assignments are written to `ledger`
/// as they are made; locks do not touch it.
pub fn schedule_day(
    input: &DayInput<'_>,
    state: NightState,
    catalog: &Catalog,
    ledger: &mut ScoreLedger,
) -> ScheduleResult<DayOutcome> {
    let min_nights = input.config.min_nights()?;
    let mut state = state;
    let mut day = Day::new(input.date);
    let mut resolutions = Vec::with_capacity(input.roster.len());

    for lock in input.locked {
        state.observe_lock(lock);
        day.assignments.push(lock.clone());
    }

    let mut undecided: Vec<&Person> = Vec::new();
    for person in input.roster {
        if day.assignment_for(person.id).is_some() {
            resolutions.push((person.id, Resolution::Locked));
            continue;
        }

        let forced = if state.owes_night(person.id, min_nights) {
            state.streak += 1;
            Some((DutyType::Night, Resolution::NightContinuation))
        } else if follow_up_due(input, person.id, catalog) {
            Some((DutyType::After, Resolution::FollowUp))
        } else {
            None
        };

        match forced {
            Some((duty, resolution)) => {
                commit(&mut day, person.id, duty, catalog, ledger)?;
                debug!(date = %input.date, person = %person.id, %duty, ?resolution, streak = state.streak, "forced assignment");
                resolutions.push((person.id, resolution));
            }
            None => undecided.push(person),
        }
    }

    for person in undecided {
        let available = available_duties(person, &day, input.kind, input.config, catalog)?;
        let (duty, resolution) = match available.duties.first() {
            Some(&duty) => (duty, Resolution::Scored),
            None => {
                let fallback = catalog.fallback(input.kind);
                if available.open_slots > 0 {
                    warn!(
                        date = %input.date,
                        person = %person.id,
                        open_slots = available.open_slots,
                        %fallback,
                        "no duty left after filters, using fallback"
                    );
                }
                (fallback, Resolution::Fallback)
            }
        };

        if duty == DutyType::Night {
            state = NightState::started_by(person.id);
        }
        commit(&mut day, person.id, duty, catalog, ledger)?;
        debug!(date = %input.date, person = %person.id, %duty, ?resolution, "selected assignment");
        resolutions.push((person.id, resolution));
    }

    Ok(DayOutcome {
        day,
        resolutions,
        state,
    })
}

/// Duties `person` could take on `day` given what is already assigned.
pub fn available_duties(
    person: &Person,
    day: &Day,
    kind: DayKind,
    config: &TeamConfig,
    catalog: &Catalog,
) -> ScheduleResult<Availability> {
    let mut filled = catalog.filled_by(day.duties());
    if config.allow_guard_duty_as_night_cover && day.duties().any(|d| catalog.is_guard_duty(d)) {
        filled.extend(catalog.guard_covers(kind).iter().copied());
    }

    let mut duties: Vec<DutyType> = catalog
        .default_duties(kind)
        .iter()
        .copied()
        .filter(|d| !filled.contains(d))
        .collect();
    let open_slots = duties.len();

    let forbidden = forbidden_for(person, kind, config, catalog);
    duties.retain(|d| !forbidden.contains(d));

    // Remote people cannot split weekend coverage.
    if !person.is_close_to_base && kind == DayKind::Weekend && duties.contains(&DutyType::Day) {
        duties = vec![DutyType::DayAndNight];
        duties.retain(|d| !forbidden.contains(d));
    }

    Ok(Availability {
        duties: catalog.rank_by_weight(&duties)?,
        open_slots,
    })
}

fn forbidden_for(
    person: &Person,
    kind: DayKind,
    config: &TeamConfig,
    catalog: &Catalog,
) -> Vec<DutyType> {
    let mut forbidden = Vec::new();
    if !person.is_commander {
        return forbidden;
    }
    if !config.commanders_do_nights {
        forbidden.extend_from_slice(catalog.disallowed_for_commander());
    }
    if kind == DayKind::Weekend && !config.commanders_do_weekends {
        forbidden.extend_from_slice(catalog.default_duties(DayKind::Weekend));
        forbidden.push(DutyType::DayAndNight);
    }
    forbidden
}

fn follow_up_due(input: &DayInput<'_>, person: PersonId, catalog: &Catalog) -> bool {
    input
        .previous
        .and_then(|(prev, prev_kind)| prev.duty_of(person).map(|d| (d, prev_kind)))
        .is_some_and(|(duty, prev_kind)| catalog.follow_up_allowed(duty, prev_kind))
}

fn commit(
    day: &mut Day,
    person: PersonId,
    duty: DutyType,
    catalog: &Catalog,
    ledger: &mut ScoreLedger,
) -> ScheduleResult<()> {
    ledger.apply_duty(person, duty, catalog)?;
    day.assignments.push(Assignment::new(person, day.date, duty));
    Ok(())
}
