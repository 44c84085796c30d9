//! Duty types and day kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// The closed set of duties a person can hold on a day.
///
/// Declaration order is significant: it is the tie-break when two
/// available duties carry the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DutyType {
    HalfDay,
    DayAndNight,
    Day,
    Morning,
    Afternoon,
    Night,
    /// Rest day licensed by a heavy duty the day before.
    After,
    /// Rest before a day off.
    Before,
    GuardDuty,
    Sick,
    Holiday,
    Onboarding,
    Infrastructure,
    HomeWeekend,
    HomeStandby,
}

impl DutyType {
    pub const ALL: [DutyType; 15] = [
        DutyType::HalfDay,
        DutyType::DayAndNight,
        DutyType::Day,
        DutyType::Morning,
        DutyType::Afternoon,
        DutyType::Night,
        DutyType::After,
        DutyType::Before,
        DutyType::GuardDuty,
        DutyType::Sick,
        DutyType::Holiday,
        DutyType::Onboarding,
        DutyType::Infrastructure,
        DutyType::HomeWeekend,
        DutyType::HomeStandby,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DutyType::HalfDay => "HalfDay",
            DutyType::DayAndNight => "DayAndNight",
            DutyType::Day => "Day",
            DutyType::Morning => "Morning",
            DutyType::Afternoon => "Afternoon",
            DutyType::Night => "Night",
            DutyType::After => "After",
            DutyType::Before => "Before",
            DutyType::GuardDuty => "GuardDuty",
            DutyType::Sick => "Sick",
            DutyType::Holiday => "Holiday",
            DutyType::Onboarding => "Onboarding",
            DutyType::Infrastructure => "Infrastructure",
            DutyType::HomeWeekend => "HomeWeekend",
            DutyType::HomeStandby => "HomeStandby",
        }
    }

    /// Position in declaration order.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DutyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DutyType {
    type Err = ScheduleError;

    /// Accepts the variant name in any case, with `-`/`_` separators ignored
    /// (`day-and-night`, `GUARD_DUTY`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        DutyType::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase() == wanted)
            .ok_or_else(|| ScheduleError::UnknownDutyName(s.to_string()))
    }
}

/// Whether a date counts as a regular day or part of the weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Weekday,
    Weekend,
}
