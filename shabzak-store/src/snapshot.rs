//! The whole persisted state as one JSON document.
//!
//! Every mutation that touches assignments goes through the score ledger's
//! net-delta path, so scores always equal the sum of the weights of the
//! assignments currently stored.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shabzak_core::{
    Assignment, Catalog, Day, DutyType, Person, PersonId, ScheduleError, ScheduleResult,
    ScheduleSource, ScoreLedger, StandbyDay, TeamConfig, TeamId, DEFAULT_WEIGHTS,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbyRecord {
    pub team: TeamId,
    #[serde(flatten)]
    pub day: StandbyDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub scores: BTreeMap<PersonId, i64>,
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<DutyType, i64>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub standby: Vec<StandbyRecord>,
}

fn default_weights() -> BTreeMap<DutyType, i64> {
    DEFAULT_WEIGHTS.into_iter().collect()
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            teams: Vec::new(),
            people: Vec::new(),
            scores: BTreeMap::new(),
            weights: default_weights(),
            assignments: Vec::new(),
            standby: Vec::new(),
        }
    }
}

/// What a commit changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub score_delta: i64,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::with_weights(self.weights.iter().map(|(d, w)| (*d, *w)))
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamConfig> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn members(&self, team: TeamId) -> impl Iterator<Item = &Person> + '_ {
        self.people.iter().filter(move |p| p.team == team)
    }

    pub fn next_team_id(&self) -> TeamId {
        TeamId(self.teams.iter().map(|t| t.id.0).max().unwrap_or(0) + 1)
    }

    pub fn next_person_id(&self) -> PersonId {
        PersonId(self.people.iter().map(|p| p.id.0).max().unwrap_or(0) + 1)
    }

    pub fn add_team(&mut self, config: TeamConfig) -> Result<TeamId> {
        config.validate()?;
        if self.team(config.id).is_some() {
            bail!("team {} already exists", config.id);
        }
        let id = config.id;
        self.teams.push(config);
        Ok(id)
    }

    /// Add a roster member with a fresh zero score.
    pub fn add_person(&mut self, person: Person) -> Result<PersonId> {
        if self.team(person.team).is_none() {
            bail!("team {} not found", person.team);
        }
        if self.person(person.id).is_some() {
            bail!("person {} already exists", person.id);
        }
        let id = person.id;
        self.scores.insert(id, 0);
        self.people.push(person);
        Ok(id)
    }

    /// Remove a person together with their score and assignments.
    pub fn remove_person(&mut self, id: PersonId) -> Result<Person> {
        let Some(idx) = self.people.iter().position(|p| p.id == id) else {
            bail!("person {id} not found");
        };
        self.scores.remove(&id);
        self.assignments.retain(|a| a.person != id);
        Ok(self.people.remove(idx))
    }

    pub fn set_weight(&mut self, duty: DutyType, weight: i64) {
        self.weights.insert(duty, weight);
    }

    pub fn assignment(&self, person: PersonId, date: NaiveDate) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.person == person && a.date == date)
    }

    /// Create or replace the assignment for (person, date). Returns the
    /// score delta applied.
    pub fn upsert_assignment(&mut self, assignment: Assignment) -> Result<i64> {
        if self.person(assignment.person).is_none() {
            bail!("person {} not found", assignment.person);
        }
        let old = self.assignment(assignment.person, assignment.date).map(|a| a.duty);
        let delta = self.revise_score(assignment.person, old, Some(assignment.duty))?;

        match self
            .assignments
            .iter_mut()
            .find(|a| a.person == assignment.person && a.date == assignment.date)
        {
            Some(existing) => *existing = assignment,
            None => self.assignments.push(assignment),
        }
        Ok(delta)
    }

    /// Delete the assignment for (person, date) and take its weight back.
    pub fn delete_assignment(&mut self, person: PersonId, date: NaiveDate) -> Result<i64> {
        let Some(idx) = self
            .assignments
            .iter()
            .position(|a| a.person == person && a.date == date)
        else {
            bail!("no assignment for person {person} on {date}");
        };
        let duty = self.assignments[idx].duty;
        let delta = self.revise_score(person, Some(duty), None)?;
        self.assignments.remove(idx);
        Ok(delta)
    }

    /// Persist proposed days. Re-committing the same days changes nothing.
    ///
    /// All-or-nothing: on error the snapshot is left as it was.
    pub fn commit_days(&mut self, days: &[Day]) -> Result<CommitReport> {
        let mut next = self.clone();
        let mut report = CommitReport::default();

        for day in days {
            for a in &day.assignments {
                match next.assignment(a.person, a.date) {
                    Some(existing) if existing == a => {
                        report.unchanged += 1;
                        continue;
                    }
                    Some(_) => report.updated += 1,
                    None => report.created += 1,
                }
                report.score_delta += next
                    .upsert_assignment(a.clone())
                    .with_context(|| format!("commit {} on {}", a.person, a.date))?;
            }
        }

        info!(
            days = days.len(),
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            score_delta = report.score_delta,
            "committed days"
        );
        *self = next;
        Ok(report)
    }

    /// Store standby days, replacing any the team already had on those dates.
    pub fn commit_standby(&mut self, team: TeamId, days: &[StandbyDay]) -> Result<usize> {
        if self.team(team).is_none() {
            bail!("team {team} not found");
        }
        for day in days {
            if day.morning == day.night {
                bail!("standby on {} uses {} for both roles", day.date, day.morning);
            }
            self.standby
                .retain(|r| !(r.team == team && r.day.date == day.date));
            self.standby.push(StandbyRecord { team, day: *day });
        }
        self.standby.sort_by_key(|r| (r.team, r.day.date));
        info!(%team, days = days.len(), "committed standby days");
        Ok(days.len())
    }

    /// Stored days for a team in `[from, to]`, one entry per date that has
    /// at least one assignment.
    pub fn days(&self, team: TeamId, from: NaiveDate, to: NaiveDate) -> Vec<Day> {
        let mut by_date: BTreeMap<NaiveDate, Day> = BTreeMap::new();
        for a in &self.assignments {
            if a.date < from || a.date > to || !self.is_member(a.person, team) {
                continue;
            }
            by_date
                .entry(a.date)
                .or_insert_with(|| Day::new(a.date))
                .assignments
                .push(a.clone());
        }
        by_date.into_values().collect()
    }

    pub fn standby_days(&self, team: TeamId, from: NaiveDate, to: NaiveDate) -> Vec<StandbyDay> {
        self.standby
            .iter()
            .filter(|r| r.team == team && r.day.date >= from && r.day.date <= to)
            .map(|r| r.day)
            .collect()
    }

    fn is_member(&self, person: PersonId, team: TeamId) -> bool {
        self.person(person).is_some_and(|p| p.team == team)
    }

    fn revise_score(&mut self, person: PersonId, old: Option<DutyType>, new: Option<DutyType>) -> Result<i64> {
        let catalog = self.catalog();
        let mut ledger = ScoreLedger::from_scores([(person, self.score_of(person))]);
        let delta = ledger.revise(person, old, new, &catalog)?;
        self.scores.insert(person, ledger.score_of(person));
        debug!(%person, ?old, ?new, delta, "score revised");
        Ok(delta)
    }

    pub fn score_of(&self, person: PersonId) -> i64 {
        self.scores.get(&person).copied().unwrap_or(0)
    }
}

impl ScheduleSource for Snapshot {
    fn roster(&self, team: TeamId) -> ScheduleResult<Vec<Person>> {
        if self.team(team).is_none() {
            return Err(ScheduleError::NotFound(format!("team {team}")));
        }
        Ok(self.members(team).cloned().collect())
    }

    fn team_config(&self, team: TeamId) -> ScheduleResult<TeamConfig> {
        self.team(team)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(format!("team {team}")))
    }

    fn locked_assignments(&self, team: TeamId, date: NaiveDate) -> ScheduleResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.date == date && self.is_member(a.person, team))
            .cloned()
            .collect())
    }

    fn history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<Day>> {
        Ok(self.days(team, since, NaiveDate::MAX))
    }

    fn score(&self, person: PersonId) -> ScheduleResult<i64> {
        self.scores
            .get(&person)
            .copied()
            .ok_or_else(|| ScheduleError::NotFound(format!("score for person {person}")))
    }

    fn standby_history(&self, team: TeamId, since: NaiveDate) -> ScheduleResult<Vec<StandbyDay>> {
        Ok(self.standby_days(team, since, NaiveDate::MAX))
    }

    fn duty_weights(&self) -> ScheduleResult<Vec<(DutyType, i64)>> {
        Ok(self.weights.iter().map(|(d, w)| (*d, *w)).collect())
    }
}
