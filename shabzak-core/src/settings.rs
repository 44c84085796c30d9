//! Engine-wide settings shared by the horizon and standby schedulers.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::WorkWeek;
use crate::standby::QueueOrder;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Trailing days of history consulted to seed carry-over state.
    pub lookback_days: u32,
    pub weekend_days: Vec<Weekday>,
    pub standby_order: QueueOrder,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            weekend_days: WorkWeek::default().weekend,
            standby_order: QueueOrder::default(),
        }
    }
}

impl EngineSettings {
    pub fn work_week(&self) -> WorkWeek {
        WorkWeek::new(self.weekend_days.clone())
    }
}
