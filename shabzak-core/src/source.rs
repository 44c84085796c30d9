//! Read-only collaborator the schedulers pull their inputs from.
//!
//! The engine never talks to storage directly. Anything that can answer
//! these queries (a JSON snapshot, a database, a test fixture) can drive it.

use chrono::NaiveDate;

use crate::catalog::DEFAULT_WEIGHTS;
use crate::duty::DutyType;
use crate::error::ScheduleResult;
use crate::model::{Assignment, Day, Person, PersonId, StandbyDay, TeamConfig, TeamId};

pub trait ScheduleSource {
    /// Team members in a stable roster order. Unknown team is `NotFound`.
    fn roster(&self, team: TeamId) -> ScheduleResult<Vec<Person>>;

    fn team_config(&self, team: TeamId) -> ScheduleResult<TeamConfig>;

    /// Assignments already fixed for `date` (possibly empty).
    fn locked_assignments(&self, team: TeamId, date: NaiveDate) -> ScheduleResult<Vec<Assignment>>;

    /// Stored days on or after `since`.
    fn history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<Day>>;

    fn score(&self, person: PersonId) -> ScheduleResult<i64>;

    /// Stored standby days on or after `since`.
    fn standby_history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<StandbyDay>>;

    fn duty_weights(&self) -> ScheduleResult<Vec<(DutyType, i64)>> {
        Ok(DEFAULT_WEIGHTS.to_vec())
    }
}

impl<T: ScheduleSource + ?Sized> ScheduleSource for &T {
    fn roster(&self, team: TeamId) -> ScheduleResult<Vec<Person>> {
        (**self).roster(team)
    }

    fn team_config(&self, team: TeamId) -> ScheduleResult<TeamConfig> {
        (**self).team_config(team)
    }

    fn locked_assignments(&self, team: TeamId, date: NaiveDate) -> ScheduleResult<Vec<Assignment>> {
        (**self).locked_assignments(team, date)
    }

    fn history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<Day>> {
        (**self).history(team, since)
    }

    fn score(&self, person: PersonId) -> ScheduleResult<i64> {
        (**self).score(person)
    }

    fn standby_history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<StandbyDay>> {
        (**self).standby_history(team, since)
    }

    fn duty_weights(&self) -> ScheduleResult<Vec<(DutyType, i64)>> {
        (**self).duty_weights()
    }
}
