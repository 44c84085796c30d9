//! Score ledger: cumulative fairness score per person.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::duty::DutyType;
use crate::error::ScheduleResult;
use crate::model::{Person, PersonId};

/// Running scores for one scheduling run (or one storage transaction).
///
/// Besides the absolute score the ledger keeps the net delta it applied per
/// person, which is what a caller persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    scores: BTreeMap<PersonId, i64>,
    deltas: BTreeMap<PersonId, i64>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with stored scores.
    pub fn from_scores(scores: impl IntoIterator<Item = (PersonId, i64)>) -> Self {
        Self {
            scores: scores.into_iter().collect(),
            deltas: BTreeMap::new(),
        }
    }

    pub fn score_of(&self, person: PersonId) -> i64 {
        self.scores.get(&person).copied().unwrap_or(0)
    }

    /// Add the weight of a newly committed duty. Returns the delta.
    pub fn apply_duty(
        &mut self,
        person: PersonId,
        duty: DutyType,
        catalog: &Catalog,
    ) -> ScheduleResult<i64> {
        self.revise(person, None, Some(duty), catalog)
    }

    /// Replace `old` with `new` for one person: subtract the old weight and
    /// add the new one. `None` on either side covers creation and deletion.
    ///
    /// Both weights are looked up before anything is written, so an unknown
    /// duty leaves the ledger untouched.
    pub fn revise(
        &mut self,
        person: PersonId,
        old: Option<DutyType>,
        new: Option<DutyType>,
        catalog: &Catalog,
    ) -> ScheduleResult<i64> {
        let removed = old.map(|d| catalog.weight(d)).transpose()?.unwrap_or(0);
        let added = new.map(|d| catalog.weight(d)).transpose()?.unwrap_or(0);
        let delta = added - removed;

        *self.scores.entry(person).or_insert(0) += delta;
        if delta != 0 {
            *self.deltas.entry(person).or_insert(0) += delta;
        }
        Ok(delta)
    }

    /// Roster ordered by current score, lowest first. Ties keep roster order.
    pub fn rank_ascending(&self, people: &[Person]) -> Vec<Person> {
        let mut ranked = people.to_vec();
        ranked.sort_by_key(|p| self.score_of(p.id));
        ranked
    }

    /// Net delta this ledger applied per person (zero entries omitted).
    pub fn deltas(&self) -> BTreeMap<PersonId, i64> {
        self.deltas
            .iter()
            .filter(|(_, d)| **d != 0)
            .map(|(p, d)| (*p, *d))
            .collect()
    }
}
