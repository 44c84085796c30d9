//! shabzak-core: the duty-roster engine.
//!
//! A greedy, single-pass scheduler that hands out daily duties to a team
//! and a recency-based rotation for the two standby roles. The engine only
//! computes proposals; storage and committing belong to the caller.

pub mod calendar;
pub mod catalog;
pub mod day_scheduler;
pub mod duty;
pub mod error;
pub mod horizon;
pub mod ledger;
pub mod model;
pub mod settings;
pub mod source;
pub mod standby;

pub use calendar::{date_range, WorkWeek};
pub use catalog::{Catalog, DEFAULT_WEIGHTS};
pub use day_scheduler::{schedule_day, DayInput, DayOutcome, NightState, Resolution};
pub use duty::{DayKind, DutyType};
pub use error::{HorizonError, ScheduleError, ScheduleResult, StandbyError};
pub use horizon::{seed_night_state, HorizonPlan, HorizonScheduler};
pub use ledger::ScoreLedger;
pub use model::{Assignment, Day, Person, PersonId, StandbyDay, TeamConfig, TeamId};
pub use settings::EngineSettings;
pub use source::ScheduleSource;
pub use standby::{QueueOrder, StandbyScheduler};
