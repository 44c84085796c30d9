//! Engine error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::duty::DutyType;
use crate::model::{Day, StandbyDay};

/// Errors the scheduling engine can report.
///
/// None of these are transient: the engine is pure, so a failure means the
/// inputs are wrong and the caller gets it back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("no weight configured for duty type {0}")]
    UnknownDutyType(DutyType),

    #[error("unknown duty name: {0:?}")]
    UnknownDutyName(String),

    #[error("only {eligible} standby candidate(s) eligible on {date}, need 2")]
    InsufficientCandidates { date: NaiveDate, eligible: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("schedule source error: {0}")]
    Source(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// A horizon run that stopped early. `completed` holds every day that was
/// fully computed before the failing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source} (after {} completed day(s))", .completed.len())]
pub struct HorizonError {
    pub completed: Vec<Day>,
    #[source]
    pub source: ScheduleError,
}

/// A standby run that stopped early, with the days proposed before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source} (after {} completed standby day(s))", .completed.len())]
pub struct StandbyError {
    pub completed: Vec<StandbyDay>,
    #[source]
    pub source: ScheduleError,
}

impl From<ScheduleError> for HorizonError {
    fn from(source: ScheduleError) -> Self {
        Self {
            completed: Vec::new(),
            source,
        }
    }
}

impl From<ScheduleError> for StandbyError {
    fn from(source: ScheduleError) -> Self {
        Self {
            completed: Vec::new(),
            source,
        }
    }
}
