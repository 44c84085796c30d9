//! Plain-text output for terminal use. `--json` bypasses all of this.

use shabzak_core::{Day, HorizonPlan, Person, PersonId, StandbyDay};
use shabzak_store::CommitReport;

fn name_of(people: &[Person], id: PersonId) -> String {
    people
        .iter()
        .find(|p| p.id == id)
        .map(Person::full_name)
        .unwrap_or_else(|| format!("#{id}"))
}

pub fn day_lines(day: &Day, people: &[Person]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", day.date, day.date.format("%a"))];
    for a in &day.assignments {
        let mut line = format!("  {:<24} {}", name_of(people, a.person), a.duty);
        if let Some(loc) = &a.location {
            line.push_str(&format!(" @ {loc}"));
        }
        if let Some(note) = &a.note {
            line.push_str(&format!("  ({note})"));
        }
        lines.push(line);
    }
    lines
}

pub fn print_plan(plan: &HorizonPlan, people: &[Person]) {
    for day in &plan.days {
        for line in day_lines(day, people) {
            println!("{line}");
        }
    }
    if !plan.score_deltas.is_empty() {
        println!("\nScore changes if committed:");
        for (id, delta) in &plan.score_deltas {
            println!("  {:<24} {delta:+}", name_of(people, *id));
        }
    }
}

pub fn print_standby(days: &[StandbyDay], people: &[Person]) {
    println!("{:<12} {:<24} {}", "date", "morning", "night");
    for sb in days {
        println!(
            "{:<12} {:<24} {}",
            sb.date.to_string(),
            name_of(people, sb.morning),
            name_of(people, sb.night)
        );
    }
}

pub fn print_roster(people: &[Person]) {
    for p in people {
        let mut flags = Vec::new();
        if p.is_commander {
            flags.push("commander");
        }
        if !p.is_close_to_base {
            flags.push("remote");
        }
        if p.is_reserve {
            flags.push("reserve");
        }
        if p.is_studying {
            flags.push("studying");
        }
        println!("{:>4}  {:<24} {}", p.id.to_string(), p.full_name(), flags.join(","));
    }
}

pub fn print_report(report: &CommitReport) {
    println!(
        "Committed: {} created, {} updated, {} unchanged (score change {:+})",
        report.created, report.updated, report.unchanged, report.score_delta
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shabzak_core::{Assignment, DutyType, TeamId};

    #[test]
    fn test_day_lines_show_names_and_extras() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let people = vec![Person::new(1, "Dana", "Levi", TeamId(1))];
        let mut day = Day::new(date);
        day.assignments.push(
            Assignment::new(PersonId(1), date, DutyType::GuardDuty)
                .with_location("North gate")
                .with_note("swap"),
        );
        day.assignments
            .push(Assignment::new(PersonId(9), date, DutyType::Morning));

        let lines = day_lines(&day, &people);
        assert_eq!(lines[0], "2026-10-22 (Thu)");
        assert!(lines[1].contains("Dana Levi"));
        assert!(lines[1].ends_with("GuardDuty @ North gate  (swap)"));
        assert!(lines[2].contains("#9"));
    }
}
