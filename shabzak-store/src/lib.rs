//! shabzak-store: JSON snapshot storage for rosters, timetables and scores.

pub mod roster_csv;
pub mod snapshot;

pub use roster_csv::{import_roster, import_roster_csv, RosterRow};
pub use snapshot::{CommitReport, Snapshot, StandbyRecord};
