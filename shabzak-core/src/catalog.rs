//! Assignment catalog: the static rule tables the schedulers consult.
//!
//! Rules are fixed at compile time. Only the fairness weights can be
//! replaced (storage keeps its own weight table), so a `Catalog` is just a
//! weight map plus lookups into the constant tables below.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::duty::{DayKind, DutyType};
use crate::error::{ScheduleError, ScheduleResult};

const WEEKDAY_DUTIES: &[DutyType] = &[DutyType::Morning, DutyType::Afternoon, DutyType::Night];
const WEEKEND_DUTIES: &[DutyType] = &[DutyType::Day, DutyType::Night];

const DAY_AND_NIGHT_COVERS: &[DutyType] = &[
    DutyType::Day,
    DutyType::Afternoon,
    DutyType::Night,
    DutyType::Morning,
];
const DAY_COVERS: &[DutyType] = &[DutyType::Morning, DutyType::Afternoon];

const WEEKDAY_FOLLOW_UP: &[DutyType] = &[
    DutyType::Night,
    DutyType::Infrastructure,
    DutyType::GuardDuty,
    DutyType::DayAndNight,
];
const WEEKEND_FOLLOW_UP: &[DutyType] = &[
    DutyType::Day,
    DutyType::Night,
    DutyType::DayAndNight,
    DutyType::Infrastructure,
    DutyType::GuardDuty,
];

const COMMANDER_DISALLOWED: &[DutyType] = &[
    DutyType::Night,
    DutyType::DayAndNight,
    DutyType::Onboarding,
    DutyType::Afternoon,
];

const STANDBY_COMPATIBLE: &[DutyType] = &[
    DutyType::HomeWeekend,
    DutyType::Morning,
    DutyType::Afternoon,
    DutyType::Before,
    DutyType::HomeStandby,
];

const GUARD_DUTIES: &[DutyType] = &[DutyType::GuardDuty, DutyType::Infrastructure];
const GUARD_COVERS_WEEKDAY: &[DutyType] = &[DutyType::Night];
const GUARD_COVERS_WEEKEND: &[DutyType] = &[DutyType::Day, DutyType::Night];

/// Default fairness weights. Positive duties are heavy or prized, negative
/// ones are rest.
pub const DEFAULT_WEIGHTS: [(DutyType, i64); 15] = [
    (DutyType::HalfDay, 1),
    (DutyType::DayAndNight, 10),
    (DutyType::Day, 6),
    (DutyType::Morning, 4),
    (DutyType::Afternoon, 3),
    (DutyType::Night, 6),
    (DutyType::After, -1),
    (DutyType::Before, -2),
    (DutyType::GuardDuty, 10),
    (DutyType::Sick, -3),
    (DutyType::Holiday, -6),
    (DutyType::Onboarding, 2),
    (DutyType::Infrastructure, 10),
    (DutyType::HomeWeekend, 0),
    (DutyType::HomeStandby, -2),
];

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| Catalog::with_weights(DEFAULT_WEIGHTS));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    weights: BTreeMap<DutyType, i64>,
}

impl Catalog {
    /// The catalog with the default weight table.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// A catalog over an explicit weight table. Duties missing from the
    /// table fail with `UnknownDutyType` when weighed.
    pub fn with_weights(weights: impl IntoIterator<Item = (DutyType, i64)>) -> Self {
        Self {
            weights: weights.into_iter().collect(),
        }
    }

    pub fn weight(&self, duty: DutyType) -> ScheduleResult<i64> {
        self.weights
            .get(&duty)
            .copied()
            .ok_or(ScheduleError::UnknownDutyType(duty))
    }

    /// Duties that must be covered on a day of this kind, in display order.
    pub fn default_duties(&self, kind: DayKind) -> &'static [DutyType] {
        match kind {
            DayKind::Weekday => WEEKDAY_DUTIES,
            DayKind::Weekend => WEEKEND_DUTIES,
        }
    }

    /// Duties that count as filled once `duty` is assigned to someone.
    pub fn subsumed_by(&self, duty: DutyType) -> &'static [DutyType] {
        match duty {
            DutyType::DayAndNight => DAY_AND_NIGHT_COVERS,
            DutyType::Day => DAY_COVERS,
            _ => &[],
        }
    }

    /// Every duty filled by a set of assigned duties, following subsumption
    /// transitively.
    pub fn filled_by(&self, duties: impl IntoIterator<Item = DutyType>) -> BTreeSet<DutyType> {
        let mut filled = BTreeSet::new();
        let mut pending: Vec<DutyType> = duties.into_iter().collect();
        while let Some(duty) = pending.pop() {
            if filled.insert(duty) {
                pending.extend_from_slice(self.subsumed_by(duty));
            }
        }
        filled
    }

    /// Whether holding `prev` on a day of kind `prev_kind` earns an After
    /// duty the next day.
    pub fn follow_up_allowed(&self, prev: DutyType, prev_kind: DayKind) -> bool {
        let licensing = match prev_kind {
            DayKind::Weekday => WEEKDAY_FOLLOW_UP,
            DayKind::Weekend => WEEKEND_FOLLOW_UP,
        };
        licensing.contains(&prev)
    }

    pub fn disallowed_for_commander(&self) -> &'static [DutyType] {
        COMMANDER_DISALLOWED
    }

    /// Duty given when nothing from the default set is left.
    pub fn fallback(&self, kind: DayKind) -> DutyType {
        match kind {
            DayKind::Weekday => DutyType::Morning,
            DayKind::Weekend => DutyType::HomeWeekend,
        }
    }

    /// Light duties that can be held together with a standby role.
    pub fn permits_standby(&self, duty: DutyType) -> bool {
        STANDBY_COMPATIBLE.contains(&duty)
    }

    pub fn is_guard_duty(&self, duty: DutyType) -> bool {
        GUARD_DUTIES.contains(&duty)
    }

    /// Slots a guard-type duty covers when guard cover is enabled.
    pub fn guard_covers(&self, kind: DayKind) -> &'static [DutyType] {
        match kind {
            DayKind::Weekday => GUARD_COVERS_WEEKDAY,
            DayKind::Weekend => GUARD_COVERS_WEEKEND,
        }
    }

    /// Heaviest first; equal weights keep declaration order.
    pub fn rank_by_weight(&self, duties: &[DutyType]) -> ScheduleResult<Vec<DutyType>> {
        let mut weighted = duties
            .iter()
            .map(|&d| self.weight(d).map(|w| (w, d)))
            .collect::<ScheduleResult<Vec<_>>>()?;
        weighted.sort_by(|(wa, da), (wb, db)| wb.cmp(wa).then_with(|| da.ordinal().cmp(&db.ordinal())));
        Ok(weighted.into_iter().map(|(_, d)| d).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_duty_has_a_default_weight() {
        let catalog = Catalog::standard();
        for duty in DutyType::ALL {
            assert!(catalog.weight(duty).is_ok(), "{duty} has no weight");
        }
    }

    #[test]
    fn test_missing_weight_is_an_error() {
        let catalog = Catalog::with_weights([(DutyType::Night, 6)]);
        assert_eq!(
            catalog.weight(DutyType::Morning),
            Err(ScheduleError::UnknownDutyType(DutyType::Morning))
        );
    }

    #[test]
    fn test_day_and_night_fills_everything_transitively() {
        let filled = Catalog::standard().filled_by([DutyType::DayAndNight]);
        for d in [
            DutyType::DayAndNight,
            DutyType::Day,
            DutyType::Morning,
            DutyType::Afternoon,
            DutyType::Night,
        ] {
            assert!(filled.contains(&d));
        }
        assert!(!filled.contains(&DutyType::HomeWeekend));
    }

    #[test]
    fn test_day_fills_morning_and_afternoon_only() {
        let filled = Catalog::standard().filled_by([DutyType::Day]);
        assert!(filled.contains(&DutyType::Morning));
        assert!(filled.contains(&DutyType::Afternoon));
        assert!(!filled.contains(&DutyType::Night));
    }

    #[test]
    fn test_follow_up_depends_on_day_kind() {
        let c = Catalog::standard();
        assert!(c.follow_up_allowed(DutyType::Night, DayKind::Weekday));
        assert!(!c.follow_up_allowed(DutyType::Day, DayKind::Weekday));
        assert!(c.follow_up_allowed(DutyType::Day, DayKind::Weekend));
        assert!(!c.follow_up_allowed(DutyType::Morning, DayKind::Weekend));
    }

    #[test]
    fn test_rank_by_weight_desc_with_declaration_tiebreak() {
        let c = Catalog::standard();
        // Day and Night both weigh 6; Day is declared first.
        let ranked = c
            .rank_by_weight(&[DutyType::Night, DutyType::Morning, DutyType::Day])
            .unwrap();
        assert_eq!(ranked, vec![DutyType::Day, DutyType::Night, DutyType::Morning]);
    }

    #[test]
    fn test_guard_duty_covers_by_day_kind() {
        let c = Catalog::standard();
        assert!(c.is_guard_duty(DutyType::Infrastructure));
        assert!(!c.is_guard_duty(DutyType::DayAndNight));
        assert_eq!(c.guard_covers(DayKind::Weekday), &[DutyType::Night]);
        assert_eq!(c.guard_covers(DayKind::Weekend), &[DutyType::Day, DutyType::Night]);
    }
}
