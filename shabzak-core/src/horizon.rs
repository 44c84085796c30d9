//! Horizon scheduler: runs the day scheduler over a contiguous date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::calendar::{date_range, lookback_start};
use crate::catalog::Catalog;
use crate::day_scheduler::{schedule_day, DayInput, NightState};
use crate::duty::DutyType;
use crate::error::{HorizonError, ScheduleError, ScheduleResult};
use crate::ledger::ScoreLedger;
use crate::model::{Day, PersonId, TeamId};
use crate::settings::EngineSettings;
use crate::source::ScheduleSource;

/// A proposed timetable. Nothing here is persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonPlan {
    pub team: TeamId,
    pub days: Vec<Day>,
    /// Net score change per person if the plan is committed.
    pub score_deltas: BTreeMap<PersonId, i64>,
    /// Night state after the last planned day.
    pub final_state: NightState,
}

#[derive(Debug, Clone)]
pub struct HorizonScheduler<S: ScheduleSource> {
    source: S,
    settings: EngineSettings,
}

impl<S: ScheduleSource> HorizonScheduler<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, EngineSettings::default())
    }

    pub fn with_settings(source: S, settings: EngineSettings) -> Self {
        Self { source, settings }
    }

    /// Plan `num_days` days from `start`.
    ///
    /// On failure the error carries every day completed before the failing
    /// one; a half-scheduled day is never returned.
    pub fn plan(&self, team: TeamId, start: NaiveDate, num_days: u32) -> Result<HorizonPlan, HorizonError> {
        let config = self.source.team_config(team)?;
        config.validate()?;
        let roster = self.source.roster(team)?;
        let catalog = Catalog::with_weights(self.source.duty_weights()?);
        let scores = roster
            .iter()
            .map(|p| self.source.score(p.id).map(|s| (p.id, s)))
            .collect::<ScheduleResult<Vec<_>>>()?;
        let mut ledger = ScoreLedger::from_scores(scores);

        let week = self.settings.work_week();
        let mut history = self
            .source
            .history(team, lookback_start(start, self.settings.lookback_days))?;
        history.retain(|d| d.date < start);
        history.sort_by_key(|d| d.date);

        let mut state = seed_night_state(&history, start);
        let mut previous: Option<Day> = history
            .last()
            .filter(|d| d.date.succ_opt() == Some(start))
            .cloned();
        debug!(%team, %start, ?state, history_days = history.len(), "seeded horizon");

        let mut days: Vec<Day> = Vec::new();
        for date in date_range(start, num_days) {
            let step = || -> ScheduleResult<_> {
                let locked = self.source.locked_assignments(team, date)?;
                let ranked = ledger.rank_ascending(&roster);
                let input = DayInput {
                    date,
                    kind: week.day_kind(date),
                    previous: previous.as_ref().map(|d| (d, week.day_kind(d.date))),
                    locked: &locked,
                    roster: &ranked,
                    config: &config,
                };
                // Work on a copy so a failing day leaves no partial deltas.
                let mut day_ledger = ledger.clone();
                let outcome = schedule_day(&input, state, &catalog, &mut day_ledger)?;
                Ok((outcome, day_ledger, locked.len()))
            };

            let (outcome, day_ledger, locked) = match step() {
                Ok(done) => done,
                Err(source) => {
                    return Err(HorizonError {
                        completed: days,
                        source,
                    });
                }
            };

            info!(
                %team,
                %date,
                locked,
                assigned = outcome.day.assignments.len() - locked,
                night_holder = ?outcome.state.holder,
                streak = outcome.state.streak,
                "planned day"
            );
            ledger = day_ledger;
            state = outcome.state;
            previous = Some(outcome.day.clone());
            days.push(outcome.day);
        }

        Ok(HorizonPlan {
            team,
            days,
            score_deltas: ledger.deltas(),
            final_state: state,
        })
    }
}

/// Reconstruct the night run that was in progress when history ends.
///
/// Only a run that reaches the day before `start` matters. Like a live run,
/// only Night starts or extends it: DayAndNight and guard duties never do,
/// so planning day by day gives the same timetable as one long run.
pub fn seed_night_state(history: &[Day], start: NaiveDate) -> NightState {
    let mut recent: Vec<&Day> = history.iter().filter(|d| d.date < start).collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    let Some(latest) = recent.first() else {
        return NightState::default();
    };
    if latest.date.succ_opt() != Some(start) {
        return NightState::default();
    }
    let Some(holder) = night_holder(latest) else {
        return NightState::default();
    };

    let mut streak = 0;
    let mut expected = Some(latest.date);
    for day in recent {
        if Some(day.date) != expected || night_holder(day) != Some(holder) {
            break;
        }
        streak += 1;
        expected = day.date.pred_opt();
    }

    NightState {
        holder: Some(holder),
        streak,
    }
}

/// Whoever holds the Night duty on `day`.
pub fn night_holder(day: &Day) -> Option<PersonId> {
    day.assignments
        .iter()
        .find(|a| a.duty == DutyType::Night)
        .map(|a| a.person)
}

impl From<HorizonError> for ScheduleError {
    fn from(err: HorizonError) -> Self {
        err.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn day_with(date: NaiveDate, entries: &[(u32, DutyType)]) -> Day {
        let mut day = Day::new(date);
        for (p, duty) in entries {
            day.assignments.push(Assignment::new(PersonId(*p), date, *duty));
        }
        day
    }

    #[test]
    fn test_seed_counts_consecutive_nights() {
        let history = vec![
            day_with(d(17), &[(2, DutyType::Night)]),
            day_with(d(18), &[(1, DutyType::Night)]),
            day_with(d(19), &[(1, DutyType::Night), (2, DutyType::Morning)]),
        ];
        let state = seed_night_state(&history, d(20));
        assert_eq!(state.holder, Some(PersonId(1)));
        assert_eq!(state.streak, 2);
    }

    #[test]
    fn test_seed_ignores_stale_history() {
        let history = vec![day_with(d(17), &[(1, DutyType::Night)])];
        let state = seed_night_state(&history, d(20));
        assert_eq!(state, NightState::default());
    }

    #[test]
    fn test_seed_stops_at_gap() {
        let history = vec![
            day_with(d(16), &[(1, DutyType::Night)]),
            day_with(d(18), &[(1, DutyType::Night)]),
            day_with(d(19), &[(1, DutyType::Night)]),
        ];
        let state = seed_night_state(&history, d(20));
        assert_eq!(state.streak, 2);
    }

    #[test]
    fn test_seed_only_counts_night() {
        let history = vec![day_with(
            d(19),
            &[(1, DutyType::DayAndNight), (2, DutyType::GuardDuty), (3, DutyType::Infrastructure)],
        )];
        assert_eq!(seed_night_state(&history, d(20)), NightState::default());

        // A DayAndNight breaks an earlier run of the same person.
        let history = vec![
            day_with(d(18), &[(1, DutyType::DayAndNight)]),
            day_with(d(19), &[(1, DutyType::Night)]),
        ];
        assert_eq!(seed_night_state(&history, d(20)), NightState::started_by(PersonId(1)));
    }
}
