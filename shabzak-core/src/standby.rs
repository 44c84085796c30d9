//! Standby (BCP) scheduler: two standby roles per day, rotated by recency.
//!
//! No score ledger is involved. Who goes next is decided purely by who has
//! held a standby role least recently among the people allowed to hold one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::calendar::{date_range, lookback_start};
use crate::catalog::Catalog;
use crate::error::{ScheduleError, ScheduleResult, StandbyError};
use crate::model::{Assignment, Day, Person, PersonId, StandbyDay, TeamId};
use crate::settings::EngineSettings;
use crate::source::ScheduleSource;

/// How people with standby history are ordered behind the never-served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueOrder {
    /// Whoever served longest ago goes first.
    #[default]
    LeastRecentFirst,
    /// Most recent service first. Keeps the ordering older timetables were
    /// built with; it hands the role straight back to recent holders.
    LegacyMostRecentFirst,
}

/// Close-to-base roster members whose primary duty on the day (if any)
/// can be combined with standby.
pub fn eligible_pool<'a>(roster: &'a [Person], primary: &[Assignment], catalog: &Catalog) -> Vec<&'a Person> {
    roster
        .iter()
        .filter(|p| p.is_close_to_base)
        .filter(|p| {
            primary
                .iter()
                .find(|a| a.person == p.id)
                .is_none_or(|a| catalog.permits_standby(a.duty))
        })
        .collect()
}

/// Role holders of past standby days, most recent day first, morning before
/// night within a day.
pub fn fairness_queue(history: &[StandbyDay]) -> Vec<PersonId> {
    let mut days: Vec<&StandbyDay> = history.iter().collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days.iter().flat_map(|d| [d.morning, d.night]).collect()
}

/// Never-served eligible people in roster order, then everyone with
/// history in `order`.
pub fn candidate_order(eligible: &[&Person], queue: &[PersonId], order: QueueOrder) -> Vec<PersonId> {
    let eligible_ids: BTreeSet<PersonId> = eligible.iter().map(|p| p.id).collect();
    let served: BTreeSet<PersonId> = queue.iter().copied().collect();

    let mut candidates: Vec<PersonId> = eligible
        .iter()
        .map(|p| p.id)
        .filter(|id| !served.contains(id))
        .collect();

    // Each person once, at their most recent service.
    let mut seen = BTreeSet::new();
    let mut by_recency: Vec<PersonId> = queue
        .iter()
        .copied()
        .filter(|id| eligible_ids.contains(id) && seen.insert(*id))
        .collect();
    if order == QueueOrder::LeastRecentFirst {
        by_recency.reverse();
    }

    candidates.extend(by_recency);
    candidates
}

/// Night role goes to the first candidate, morning role to the second.
pub fn pick_standby(date: NaiveDate, candidates: &[PersonId]) -> ScheduleResult<StandbyDay> {
    match candidates {
        [night, morning, ..] => Ok(StandbyDay {
            date,
            morning: *morning,
            night: *night,
        }),
        _ => Err(ScheduleError::InsufficientCandidates {
            date,
            eligible: candidates.len(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct StandbyScheduler<S: ScheduleSource> {
    source: S,
    settings: EngineSettings,
}

impl<S: ScheduleSource> StandbyScheduler<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, EngineSettings::default())
    }

    pub fn with_settings(source: S, settings: EngineSettings) -> Self {
        Self { source, settings }
    }

    /// Propose standby days for `num_days` from `start`.
    ///
    /// `primary` holds primary-duty days to check eligibility against (for
    /// example a fresh horizon plan); dates it does not cover fall back to
    /// the source's stored assignments.
    pub fn plan(
        &self,
        team: TeamId,
        start: NaiveDate,
        num_days: u32,
        primary: &[Day],
    ) -> Result<Vec<StandbyDay>, StandbyError> {
        let roster = self.source.roster(team)?;
        let catalog = Catalog::standard();
        let lookback = self.settings.lookback_days;
        let mut history = self.source.standby_history(team, lookback_start(start, lookback))?;
        history.retain(|d| d.date < start);

        let mut proposed: Vec<StandbyDay> = Vec::new();
        for date in date_range(start, num_days) {
            let step = || -> ScheduleResult<StandbyDay> {
                let assignments = match primary.iter().find(|d| d.date == date) {
                    Some(day) => day.assignments.clone(),
                    None => self.source.locked_assignments(team, date)?,
                };
                let eligible = eligible_pool(&roster, &assignments, catalog);

                let since = lookback_start(date, lookback);
                let window: Vec<StandbyDay> = history
                    .iter()
                    .chain(proposed.iter())
                    .filter(|d| d.date >= since && d.date < date)
                    .copied()
                    .collect();
                let queue = fairness_queue(&window);
                let candidates = candidate_order(&eligible, &queue, self.settings.standby_order);
                debug!(%team, %date, eligible = eligible.len(), ?candidates, "standby candidates");
                pick_standby(date, &candidates)
            };

            match step() {
                Ok(day) => {
                    info!(%team, %date, morning = %day.morning, night = %day.night, "planned standby day");
                    proposed.push(day);
                }
                Err(source) => {
                    return Err(StandbyError {
                        completed: proposed,
                        source,
                    });
                }
            }
        }

        Ok(proposed)
    }
}
