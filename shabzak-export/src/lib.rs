//! shabzak-export: timetable sheets for people who do not run the CLI.

pub mod timetable_csv;

pub use timetable_csv::{write_timetable_csv, TimetableView};
