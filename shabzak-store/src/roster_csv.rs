//! Import roster members from a CSV sheet.
//!
//! Expected header (order free, extra columns ignored):
//! first_name,last_name,is_commander,is_close_to_base[,is_reserve,is_studying]

use crate::snapshot::Snapshot;
use anyhow::{bail, Context, Result};
use shabzak_core::{Person, PersonId, TeamId};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One parsed sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub first_name: String,
    pub last_name: String,
    pub is_commander: bool,
    pub is_close_to_base: bool,
    pub is_reserve: bool,
    pub is_studying: bool,
}

impl RosterRow {
    fn into_person(self, id: PersonId, team: TeamId) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            team,
            is_commander: self.is_commander,
            is_close_to_base: self.is_close_to_base,
            is_reserve: self.is_reserve,
            is_studying: self.is_studying,
        }
    }
}

/// Spreadsheet-style booleans. Empty cells fall back to `default`.
fn parse_flag(raw: Option<&str>, default: bool) -> Option<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Some(default),
        Some("true" | "yes" | "y" | "1") => Some(true),
        Some("false" | "no" | "n" | "0") => Some(false),
        Some(_) => None,
    }
}

struct Columns {
    first_name: usize,
    last_name: usize,
    is_commander: Option<usize>,
    is_close_to_base: Option<usize>,
    is_reserve: Option<usize>,
    is_studying: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let (Some(first_name), Some(last_name)) = (find("first_name"), find("last_name")) else {
            bail!("roster sheet needs first_name and last_name columns");
        };
        Ok(Self {
            first_name,
            last_name,
            is_commander: find("is_commander"),
            is_close_to_base: find("is_close_to_base"),
            is_reserve: find("is_reserve"),
            is_studying: find("is_studying"),
        })
    }

    fn row(&self, record: &csv::StringRecord) -> Option<RosterRow> {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));
        let first_name = record.get(self.first_name)?.trim().to_string();
        let last_name = record.get(self.last_name).unwrap_or("").trim().to_string();
        if first_name.is_empty() {
            return None;
        }
        Some(RosterRow {
            first_name,
            last_name,
            is_commander: parse_flag(cell(self.is_commander), false)?,
            is_close_to_base: parse_flag(cell(self.is_close_to_base), true)?,
            is_reserve: parse_flag(cell(self.is_reserve), false)?,
            is_studying: parse_flag(cell(self.is_studying), false)?,
        })
    }
}

/// Read rows from `reader` and add them to `team`. Ids continue after the
/// highest one already stored. Rows that cannot be parsed are skipped.
pub fn import_roster(reader: impl Read, snapshot: &mut Snapshot, team: TeamId) -> Result<Vec<Person>> {
    if snapshot.team(team).is_none() {
        bail!("team {team} not found");
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;

    let mut added = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let Some(row) = columns.row(&record) else {
            warn!(line = line + 2, "skipping unreadable roster row");
            continue;
        };
        let person = row.into_person(snapshot.next_person_id(), team);
        snapshot.add_person(person.clone())?;
        added.push(person);
    }

    info!(%team, count = added.len(), "imported roster");
    Ok(added)
}

pub fn import_roster_csv(path: impl AsRef<Path>, snapshot: &mut Snapshot, team: TeamId) -> Result<Vec<Person>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    import_roster(file, snapshot, team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shabzak_core::TeamConfig;
    use std::io::Write;

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::new();
        s.add_team(TeamConfig::new(TeamId(1))).unwrap();
        s.add_person(Person::new(4, "Old", "Timer", TeamId(1))).unwrap();
        s
    }

    #[test]
    fn test_import_assigns_sequential_ids() {
        let sheet = "first_name,last_name,is_commander,is_close_to_base\n\
                     Dana,Levi,yes,true\n\
                     Noa,Cohen,,0\n";
        let mut s = snapshot();
        let people = import_roster(sheet.as_bytes(), &mut s, TeamId(1)).unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].id, PersonId(5));
        assert!(people[0].is_commander);
        assert_eq!(people[1].id, PersonId(6));
        assert!(!people[1].is_close_to_base);
        assert_eq!(s.score_of(PersonId(6)), 0);
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let sheet = "first_name,last_name,is_commander,is_close_to_base,is_reserve,is_studying\n\
                     ,Nobody,no,yes,no,no\n\
                     Avi,Mizrahi,maybe,yes,no,no\n\
                     Tal,Golan,no,yes,yes,no\n";
        let mut s = snapshot();
        let people = import_roster(sheet.as_bytes(), &mut s, TeamId(1)).unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].first_name, "Tal");
        assert!(people[0].is_reserve);
    }

    #[test]
    fn test_missing_name_columns_fail() {
        let mut s = snapshot();
        let err = import_roster("name,rank\nA,B\n".as_bytes(), &mut s, TeamId(1)).unwrap_err();
        assert!(err.to_string().contains("first_name"));
    }

    #[test]
    fn test_import_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "last_name,first_name\nBarak,Yael").unwrap();
        let mut s = snapshot();
        let people = import_roster_csv(file.path(), &mut s, TeamId(1)).unwrap();
        assert_eq!(people[0].full_name(), "Yael Barak");
        assert!(people[0].is_close_to_base);
    }

    #[test]
    fn test_unknown_team_rejected() {
        let mut s = snapshot();
        assert!(import_roster("first_name,last_name\n".as_bytes(), &mut s, TeamId(9)).is_err());
    }
}
