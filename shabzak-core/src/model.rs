//! Roster, configuration and timetable types.
//!
//! Everything here is plain serde data so storage and the CLI can move it
//! around as JSON without an adapter layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::duty::DutyType;
use crate::error::{ScheduleError, ScheduleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub team: TeamId,
    #[serde(default)]
    pub is_commander: bool,
    /// Gates weekend split shifts and standby eligibility.
    #[serde(default = "default_true")]
    pub is_close_to_base: bool,
    #[serde(default)]
    pub is_reserve: bool,
    #[serde(default)]
    pub is_studying: bool,
}

fn default_true() -> bool {
    true
}

impl Person {
    pub fn new(
        id: u32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        team: TeamId,
    ) -> Self {
        Self {
            id: PersonId(id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            team,
            is_commander: false,
            is_close_to_base: true,
            is_reserve: false,
            is_studying: false,
        }
    }

    pub fn commander(mut self) -> Self {
        self.is_commander = true;
        self
    }

    pub fn remote(mut self) -> Self {
        self.is_close_to_base = false;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Per-team rules the day scheduler enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    /// Once someone starts a night run they keep Night until the run is at
    /// least this long.
    pub min_consecutive_nights: i32,
    #[serde(default)]
    pub commanders_do_weekends: bool,
    #[serde(default)]
    pub commanders_do_nights: bool,
    /// Guard duty / infrastructure already cover the night slot.
    #[serde(default)]
    pub allow_guard_duty_as_night_cover: bool,
    #[serde(default)]
    pub allow_before_day_off: bool,
}

impl TeamConfig {
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            name: String::new(),
            min_consecutive_nights: 1,
            commanders_do_weekends: false,
            commanders_do_nights: false,
            allow_guard_duty_as_night_cover: false,
            allow_before_day_off: false,
        }
    }

    pub fn with_min_consecutive_nights(mut self, nights: i32) -> Self {
        self.min_consecutive_nights = nights;
        self
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.min_consecutive_nights < 0 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "team {}: min_consecutive_nights must be >= 0, got {}",
                self.id, self.min_consecutive_nights
            )));
        }
        Ok(())
    }

    /// Validated night minimum as an unsigned count.
    pub fn min_nights(&self) -> ScheduleResult<u32> {
        self.validate()?;
        Ok(self.min_consecutive_nights.unsigned_abs())
    }
}

/// One person's primary duty on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person: PersonId,
    pub date: NaiveDate,
    pub duty: DutyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Assignment {
    pub fn new(person: PersonId, date: NaiveDate, duty: DutyType) -> Self {
        Self {
            person,
            date,
            duty,
            note: None,
            location: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A date and its assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub assignments: Vec<Assignment>,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            assignments: Vec::new(),
        }
    }

    pub fn assignment_for(&self, person: PersonId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.person == person)
    }

    pub fn duty_of(&self, person: PersonId) -> Option<DutyType> {
        self.assignment_for(person).map(|a| a.duty)
    }

    pub fn duties(&self) -> impl Iterator<Item = DutyType> + '_ {
        self.assignments.iter().map(|a| a.duty)
    }
}

/// Two standby (BCP) role holders for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbyDay {
    pub date: NaiveDate,
    pub morning: PersonId,
    pub night: PersonId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_min_nights_is_invalid() {
        let cfg = TeamConfig::new(TeamId(1)).with_min_consecutive_nights(-1);
        assert!(matches!(
            cfg.validate(),
            Err(ScheduleError::InvalidConfiguration(_))
        ));
        assert!(cfg.min_nights().is_err());
    }

    #[test]
    fn test_person_defaults_from_json() {
        let p: Person = serde_json::from_str(
            r#"{"id": 4, "first_name": "Noa", "last_name": "Levi", "team": 1}"#,
        )
        .unwrap();
        assert_eq!(p.id, PersonId(4));
        assert!(p.is_close_to_base);
        assert!(!p.is_commander);
    }

    #[test]
    fn test_assignment_skips_empty_optionals() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let a = Assignment::new(PersonId(1), date, DutyType::Night);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"person":1,"date":"2026-10-20","duty":"Night"}"#);
    }
}
