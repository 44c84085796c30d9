use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shabzak_core::{
    date_range, Assignment, Day, DutyType, EngineSettings, HorizonScheduler, Person, PersonId,
    ScoreLedger, StandbyDay, StandbyScheduler, TeamConfig, TeamId,
};
use shabzak_export::{write_timetable_csv, TimetableView};
use shabzak_store::{import_roster_csv, Snapshot};
use std::path::PathBuf;
use tracing::warn;

mod config;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "shabzak", version, about = "Duty roster and standby scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default ~/.shabzak/config.toml
    Init,

    /// Team management
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },

    /// Roster management
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },

    /// Propose duties for a date range, optionally storing them
    Plan {
        /// Team id or name
        #[arg(long)]
        team: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        commit: bool,
        #[arg(long)]
        json: bool,
        /// Also propose standby pairs, checked against this plan
        #[arg(long)]
        standby: bool,
    },

    /// Propose standby (BCP) pairs for a date range
    Standby {
        #[arg(long)]
        team: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        commit: bool,
        #[arg(long)]
        json: bool,
    },

    /// Set one person's duty on one date
    Assign {
        #[arg(long)]
        person: u32,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        duty: DutyType,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },

    /// Remove one person's duty on one date
    Unassign {
        #[arg(long)]
        person: u32,
        #[arg(long)]
        date: NaiveDate,
    },

    /// Show scores, lowest first
    Scores {
        #[arg(long)]
        team: String,
    },

    /// Duty weights
    Weights {
        #[command(subcommand)]
        command: WeightsCommand,
    },

    /// Write stored duties and standby pairs as a CSV grid
    Export {
        #[arg(long)]
        team: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// Create a team
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        min_nights: i32,
        #[arg(long)]
        commanders_do_weekends: bool,
        #[arg(long)]
        commanders_do_nights: bool,
        #[arg(long)]
        guard_covers_night: bool,
        /// Stored with the team; planning does not read it yet
        #[arg(long)]
        allow_before_day_off: bool,
    },
    /// List teams
    List,
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Import members from a CSV sheet
    Import {
        #[arg(long)]
        team: String,
        #[arg(long)]
        csv: PathBuf,
    },
    /// List members
    List {
        #[arg(long)]
        team: String,
    },
    /// Remove a member with their assignments and score
    Remove {
        #[arg(long)]
        person: u32,
    },
}

#[derive(Subcommand, Debug)]
enum WeightsCommand {
    List,
    Set {
        #[arg(long)]
        duty: DutyType,
        #[arg(long, allow_hyphen_values = true)]
        weight: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shabzak=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let cfg = config::load_config()?;
    let mut snapshot = state::load_snapshot(&cfg)?;

    match cli.command {
        Command::Init => config::init_config()?,

        Command::Team { command } => match command {
            TeamCommand::Add {
                name,
                min_nights,
                commanders_do_weekends,
                commanders_do_nights,
                guard_covers_night,
                allow_before_day_off,
            } => {
                if snapshot.teams.iter().any(|t| t.name == name) {
                    bail!("team {name:?} already exists");
                }
                let mut team = TeamConfig::new(snapshot.next_team_id())
                    .with_min_consecutive_nights(min_nights);
                team.name = name;
                team.commanders_do_weekends = commanders_do_weekends;
                team.commanders_do_nights = commanders_do_nights;
                team.allow_guard_duty_as_night_cover = guard_covers_night;
                team.allow_before_day_off = allow_before_day_off;
                let id = snapshot.add_team(team)?;
                state::save_snapshot(&cfg, &snapshot)?;
                println!("Created team {id}");
            }
            TeamCommand::List => {
                for t in &snapshot.teams {
                    println!(
                        "{:>4}  {:<20} min_nights={} members={}",
                        t.id.to_string(),
                        t.name,
                        t.min_consecutive_nights,
                        snapshot.members(t.id).count()
                    );
                }
            }
        },

        Command::Roster { command } => match command {
            RosterCommand::Import { team, csv } => {
                let team = resolve_team(&snapshot, &team)?;
                let added = import_roster_csv(&csv, &mut snapshot, team)
                    .with_context(|| format!("importing {}", csv.display()))?;
                state::save_snapshot(&cfg, &snapshot)?;
                println!("Imported {} member(s) into team {team}", added.len());
            }
            RosterCommand::List { team } => {
                let team = resolve_team(&snapshot, &team)?;
                let people: Vec<_> = snapshot.members(team).cloned().collect();
                render::print_roster(&people);
            }
            RosterCommand::Remove { person } => {
                let removed = snapshot.remove_person(PersonId(person))?;
                state::save_snapshot(&cfg, &snapshot)?;
                println!("Removed {}", removed.full_name());
            }
        },

        Command::Plan {
            team,
            start,
            days,
            commit,
            json,
            standby,
        } => {
            let team = resolve_team(&snapshot, &team)?;
            let opts = RunOptions { commit, json, standby };
            plan(&cfg, &mut snapshot, team, start, days, opts)?;
        }

        Command::Standby {
            team,
            start,
            days,
            commit,
            json,
        } => {
            let team = resolve_team(&snapshot, &team)?;
            let opts = RunOptions { commit, json, standby: true };
            standby(&cfg, &mut snapshot, team, start, days, opts)?;
        }

        Command::Assign {
            person,
            date,
            duty,
            note,
            location,
        } => {
            let mut assignment = Assignment::new(PersonId(person), date, duty);
            assignment.note = note;
            assignment.location = location;
            let delta = snapshot.upsert_assignment(assignment)?;
            state::save_snapshot(&cfg, &snapshot)?;
            println!("Assigned {duty} to {person} on {date} (score change {delta:+})");
        }

        Command::Unassign { person, date } => {
            let delta = snapshot.delete_assignment(PersonId(person), date)?;
            state::save_snapshot(&cfg, &snapshot)?;
            println!("Removed duty of {person} on {date} (score change {delta:+})");
        }

        Command::Scores { team } => {
            let team = resolve_team(&snapshot, &team)?;
            let people: Vec<_> = snapshot.members(team).cloned().collect();
            let ledger = ScoreLedger::from_scores(people.iter().map(|p| (p.id, snapshot.score_of(p.id))));
            for p in ledger.rank_ascending(&people) {
                println!("{:<24} {:>6}", p.full_name(), snapshot.score_of(p.id));
            }
        }

        Command::Weights { command } => match command {
            WeightsCommand::List => {
                for (duty, weight) in &snapshot.weights {
                    println!("{:<16} {weight:>4}", duty.to_string());
                }
            }
            WeightsCommand::Set { duty, weight } => {
                snapshot.set_weight(duty, weight);
                state::save_snapshot(&cfg, &snapshot)?;
                println!("{duty} = {weight}");
            }
        },

        Command::Export {
            team,
            start,
            days,
            out,
        } => {
            let team = resolve_team(&snapshot, &team)?;
            let dates: Vec<_> = date_range(start, days).collect();
            let Some(&end) = dates.last() else {
                bail!("--days must be at least 1");
            };
            let view = TimetableView::new(dates, snapshot.members(team).cloned().collect())
                .with_days(snapshot.days(team, start, end))
                .with_standby(snapshot.standby_days(team, start, end));
            let file = std::fs::File::create(&out)
                .with_context(|| format!("create {}", out.display()))?;
            write_timetable_csv(file, &view)?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}

/// Accept a numeric team id or an exact team name.
fn resolve_team(snapshot: &Snapshot, raw: &str) -> Result<TeamId> {
    if let Ok(id) = raw.parse::<u32>() {
        if snapshot.team(TeamId(id)).is_some() {
            return Ok(TeamId(id));
        }
    }
    snapshot
        .teams
        .iter()
        .find(|t| t.name == raw)
        .map(|t| t.id)
        .with_context(|| format!("team {raw:?} not found (see: shabzak team list)"))
}

#[derive(Debug, Clone, Copy)]
struct RunOptions {
    commit: bool,
    json: bool,
    standby: bool,
}

fn plan(
    cfg: &Config,
    snapshot: &mut Snapshot,
    team: TeamId,
    start: NaiveDate,
    days: u32,
    opts: RunOptions,
) -> Result<()> {
    let result = HorizonScheduler::with_settings(&*snapshot, cfg.engine.clone()).plan(team, start, days);
    let people: Vec<_> = snapshot.members(team).cloned().collect();

    let plan = match result {
        Ok(plan) => plan,
        Err(err) => {
            warn!(completed = err.completed.len(), "planning stopped early");
            for day in &err.completed {
                for line in render::day_lines(day, &people) {
                    println!("{line}");
                }
            }
            return Err(err).context("planning failed; nothing was committed");
        }
    };

    let pairs = if opts.standby {
        propose_standby(&cfg.engine, snapshot, team, start, days, &plan.days, &people)?
    } else {
        Vec::new()
    };

    if opts.json {
        let out = if opts.standby {
            serde_json::json!({ "plan": plan, "standby": pairs })
        } else {
            serde_json::to_value(&plan)?
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        render::print_plan(&plan, &people);
        if opts.standby {
            println!();
            render::print_standby(&pairs, &people);
        }
    }

    if opts.commit {
        let report = snapshot.commit_days(&plan.days)?;
        if opts.standby {
            snapshot.commit_standby(team, &pairs)?;
        }
        state::save_snapshot(cfg, snapshot)?;
        if !opts.json {
            render::print_report(&report);
        }
    }
    Ok(())
}

/// Standby pairs for the range. `primary` overrides stored duties for the
/// dates it covers, so an uncommitted plan is respected.
fn propose_standby(
    settings: &EngineSettings,
    snapshot: &Snapshot,
    team: TeamId,
    start: NaiveDate,
    days: u32,
    primary: &[Day],
    people: &[Person],
) -> Result<Vec<StandbyDay>> {
    match StandbyScheduler::with_settings(snapshot, settings.clone()).plan(team, start, days, primary) {
        Ok(pairs) => Ok(pairs),
        Err(err) => {
            warn!(completed = err.completed.len(), "standby planning stopped early");
            render::print_standby(&err.completed, people);
            Err(err).context("standby planning failed; nothing was committed")
        }
    }
}

fn standby(
    cfg: &Config,
    snapshot: &mut Snapshot,
    team: TeamId,
    start: NaiveDate,
    days: u32,
    opts: RunOptions,
) -> Result<()> {
    let people: Vec<_> = snapshot.members(team).cloned().collect();
    // Primary duties come from what is stored for each date.
    let pairs = propose_standby(&cfg.engine, snapshot, team, start, days, &[], &people)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        render::print_standby(&pairs, &people);
    }

    if opts.commit {
        let stored = snapshot.commit_standby(team, &pairs)?;
        state::save_snapshot(cfg, snapshot)?;
        if !opts.json {
            println!("Committed {stored} standby day(s)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_of(size: u32) -> Snapshot {
        let mut s = Snapshot::new();
        s.add_team(TeamConfig::new(TeamId(1))).unwrap();
        for i in 1..=size {
            s.add_person(Person::new(i, format!("P{i}"), "Cli", TeamId(1))).unwrap();
        }
        s
    }

    #[test]
    fn test_standby_respects_uncommitted_plan() {
        let snapshot = team_of(3);
        let people: Vec<_> = snapshot.members(TeamId(1)).cloned().collect();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let settings = EngineSettings::default();

        let plan = HorizonScheduler::new(&snapshot).plan(TeamId(1), monday, 1).unwrap();
        assert_eq!(plan.days[0].duty_of(PersonId(1)), Some(DutyType::Night));

        // Nothing is stored, so without the plan P1 looks free.
        let blind = propose_standby(&settings, &snapshot, TeamId(1), monday, 1, &[], &people).unwrap();
        assert_eq!(blind[0].night, PersonId(1));

        let pairs =
            propose_standby(&settings, &snapshot, TeamId(1), monday, 1, &plan.days, &people).unwrap();
        assert_eq!(pairs[0].night, PersonId(2));
        assert_eq!(pairs[0].morning, PersonId(3));
    }

    #[test]
    fn test_scores_rank_lowest_first() {
        let mut snapshot = team_of(3);
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        snapshot
            .upsert_assignment(Assignment::new(PersonId(1), monday, DutyType::Night))
            .unwrap();
        snapshot
            .upsert_assignment(Assignment::new(PersonId(3), monday, DutyType::Holiday))
            .unwrap();

        let people: Vec<_> = snapshot.members(TeamId(1)).cloned().collect();
        let ledger = ScoreLedger::from_scores(people.iter().map(|p| (p.id, snapshot.score_of(p.id))));
        let order: Vec<_> = ledger.rank_ascending(&people).iter().map(|p| p.id.0).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }
}
