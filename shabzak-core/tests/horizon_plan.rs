mod common;

use common::{date, duty_of, monday, Fixture, TEAM};
use shabzak_core::{
    Assignment, Catalog, Day, DutyType, HorizonScheduler, PersonId, ScheduleError,
};

#[test]
fn test_four_person_weekday_night_run() {
    let fixture = Fixture::team(4, 2);
    let plan = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 3).unwrap();
    assert_eq!(plan.days.len(), 3);

    let day1 = &plan.days[0];
    assert_eq!(duty_of(day1, 1), Some(DutyType::Night));
    for duty in [DutyType::Morning, DutyType::Afternoon, DutyType::Night] {
        assert!(day1.duties().any(|d| d == duty), "{duty} uncovered on day 1");
    }

    // Same person again to reach the two-night minimum.
    let day2 = &plan.days[1];
    assert_eq!(duty_of(day2, 1), Some(DutyType::Night));
    assert_eq!(day2.duties().filter(|d| *d == DutyType::Night).count(), 1);

    // Released: rests, and the night passes on.
    let day3 = &plan.days[2];
    assert_eq!(duty_of(day3, 1), Some(DutyType::After));
    assert_eq!(duty_of(day3, 2), Some(DutyType::Night));
    assert_eq!(plan.final_state.holder, Some(PersonId(2)));
    assert_eq!(plan.final_state.streak, 1);
}

#[test]
fn test_score_deltas_match_weights_of_new_assignments() {
    let fixture = Fixture::team(4, 2).lock(3, date(2026, 10, 20), DutyType::Holiday);
    let plan = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 5).unwrap();
    let catalog = Catalog::standard();

    let expected: i64 = plan
        .days
        .iter()
        .flat_map(|d| d.assignments.iter())
        .filter(|a| !fixture.locks.contains(a))
        .map(|a| catalog.weight(a.duty).unwrap())
        .sum();
    let applied: i64 = plan.score_deltas.values().sum();
    assert_eq!(applied, expected);
}

#[test]
fn test_locks_survive_exactly() {
    let lock = Assignment::new(PersonId(2), date(2026, 10, 20), DutyType::Onboarding)
        .with_note("new hire")
        .with_location("north gate");
    let mut fixture = Fixture::team(3, 1);
    fixture.locks.push(lock.clone());

    let plan = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 3).unwrap();
    let day = plan.days.iter().find(|d| d.date == lock.date).unwrap();
    assert_eq!(day.assignment_for(PersonId(2)), Some(&lock));
    assert_eq!(
        day.assignments.iter().filter(|a| a.person == PersonId(2)).count(),
        1
    );
}

#[test]
fn test_history_seeds_night_continuation_and_follow_up() {
    let mut fixture = Fixture::team(3, 3);
    let sunday = date(2026, 10, 18);
    let mut day = Day::new(sunday);
    day.assignments.push(Assignment::new(PersonId(3), sunday, DutyType::Night));
    day.assignments.push(Assignment::new(PersonId(1), sunday, DutyType::Morning));
    fixture.history.push(day);

    let plan = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 3).unwrap();
    assert_eq!(duty_of(&plan.days[0], 3), Some(DutyType::Night));
    assert_eq!(duty_of(&plan.days[1], 3), Some(DutyType::Night));
    assert_eq!(duty_of(&plan.days[2], 3), Some(DutyType::After));
}

#[test]
fn test_weekend_uses_weekend_duties() {
    let fixture = Fixture::team(3, 1);
    let friday = date(2026, 10, 23);
    let plan = HorizonScheduler::new(&fixture).plan(TEAM, friday, 1).unwrap();
    let day = &plan.days[0];

    assert!(day.duties().any(|d| d == DutyType::Day));
    assert!(day.duties().any(|d| d == DutyType::Night));
    assert!(day.duties().any(|d| d == DutyType::HomeWeekend));
    assert!(!day.duties().any(|d| d == DutyType::Morning));
}

#[test]
fn test_missing_team_is_reported_before_planning() {
    let mut fixture = Fixture::team(3, 1);
    fixture.config = None;
    let err = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 2).unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(err.source, ScheduleError::NotFound(_)));
}

#[test]
fn test_negative_night_minimum_is_rejected() {
    let fixture = Fixture::team(3, -2);
    let err = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 2).unwrap_err();
    assert!(matches!(err.source, ScheduleError::InvalidConfiguration(_)));
}

#[test]
fn test_unknown_weight_returns_completed_prefix() {
    let mut fixture = Fixture::team(3, 1);
    fixture.weights = Some(vec![
        (DutyType::Morning, 4),
        (DutyType::Afternoon, 3),
        (DutyType::Night, 6),
    ]);

    // Day 2 hands out an After, which has no weight.
    let err = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 4).unwrap_err();
    assert_eq!(err.completed.len(), 1);
    assert_eq!(err.source, ScheduleError::UnknownDutyType(DutyType::After));
    assert!(err.to_string().contains("after 1 completed day"));
}

#[test]
fn test_stored_scores_steer_first_pick() {
    let mut fixture = Fixture::team(3, 1);
    fixture.scores.insert(PersonId(1), 20);
    fixture.scores.insert(PersonId(2), 20);

    let plan = HorizonScheduler::new(&fixture).plan(TEAM, monday(), 1).unwrap();
    assert_eq!(duty_of(&plan.days[0], 3), Some(DutyType::Night));
}

#[test]
fn test_day_by_day_planning_matches_one_run() {
    let mut fixture = Fixture::team(3, 2);
    fixture.people[0] = fixture.people[0].clone().remote();
    let friday = date(2026, 10, 23);
    let saturday = date(2026, 10, 24);

    let whole = HorizonScheduler::new(&fixture).plan(TEAM, friday, 2).unwrap();
    assert_eq!(duty_of(&whole.days[0], 1), Some(DutyType::DayAndNight));

    // Commit Friday, then plan Saturday on its own.
    let first = HorizonScheduler::new(&fixture).plan(TEAM, friday, 1).unwrap();
    let mut split = fixture.clone();
    for (person, delta) in &first.score_deltas {
        *split.scores.entry(*person).or_insert(0) += delta;
    }
    split.history.push(first.days[0].clone());
    let second = HorizonScheduler::new(&split).plan(TEAM, saturday, 1).unwrap();

    assert_eq!(duty_of(&second.days[0], 1), Some(DutyType::After));
    assert_eq!(second.days[0], whole.days[1]);
}

#[test]
fn test_huge_horizon_fails_cleanly_on_first_day() {
    let mut fixture = Fixture::team(3, 1);
    fixture.weights = Some(Vec::new());
    let err = HorizonScheduler::new(&fixture)
        .plan(TEAM, monday(), u32::MAX)
        .unwrap_err();
    assert!(err.completed.is_empty());
    assert!(matches!(err.source, ScheduleError::UnknownDutyType(_)));
}
