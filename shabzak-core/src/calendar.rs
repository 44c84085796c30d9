//! Calendar helpers: weekday/weekend classification and date ranges.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::duty::DayKind;

/// Which days of the week are scheduled as weekend days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWeek {
    pub weekend: Vec<Weekday>,
}

impl Default for WorkWeek {
    /// Friday and Saturday.
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Fri, Weekday::Sat],
        }
    }
}

impl WorkWeek {
    pub fn new(weekend: Vec<Weekday>) -> Self {
        Self { weekend }
    }

    pub fn day_kind(&self, date: NaiveDate) -> DayKind {
        if self.weekend.contains(&date.weekday()) {
            DayKind::Weekend
        } else {
            DayKind::Weekday
        }
    }
}

/// `num_days` consecutive dates starting at `start`.
pub fn date_range(start: NaiveDate, num_days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..num_days).filter_map(move |i| start.checked_add_days(Days::new(u64::from(i))))
}

/// First date of a lookback window of `days` days ending just before `date`.
pub fn lookback_start(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}
