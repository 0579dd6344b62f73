//! End-to-end scheduling scenarios.

use shiftforge::prelude::*;
use shiftforge::{RuleKind, SoftRule};
use shiftforge_test::{
    assert_schedule_valid, night_preference, single_slot, uniform_roster, weekly_roster,
};
use tracing_subscriber::EnvFilter;

fn config() -> SolverConfig {
    SolverConfig::default().with_time_limit_millis(10_000)
}

// RUST_LOG=shiftforge_solver=debug shows the search events.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run(input: &ScheduleInput) -> ScheduleResult {
    init_logging();
    let result = Scheduler::new(config()).solve(input).expect("solve");
    if result.solution_found {
        assert_schedule_valid(input, &result);
    }
    result
}

#[test]
fn test_two_workers_one_slot() {
    let input = single_slot(2, 1);
    let result = run(&input);

    assert!(result.solution_found);
    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, 0);
    assert_eq!(result.assignments.len(), 1);
    assert!(result.violated.is_empty());
}

#[test]
fn test_requirement_above_eligible_workers_is_infeasible() {
    let err = Scheduler::new(config())
        .solve(&single_slot(2, 3))
        .unwrap_err();
    assert!(matches!(err, ShiftForgeError::Infeasible(_)));
}

#[test]
fn test_requirement_above_allowed_workers_is_infeasible() {
    let input = ScheduleInput::new(["-", "Desk"], ["-", "Day", "Night"], 1)
        .with_worker(Worker::new("a").with_tasks([1]).with_shifts([1, 2]))
        .with_worker(Worker::new("b").with_tasks([1]).with_shifts([1]))
        .with_worker(Worker::new("c").with_tasks([1]).with_shifts([1]))
        .with_requirement(0, 1, 2, 2);

    let err = Scheduler::new(config()).solve(&input).unwrap_err();
    assert!(matches!(err, ShiftForgeError::Infeasible(_)));
}

#[test]
fn test_double_booking_across_slots_is_infeasible() {
    // Each slot alone has a candidate, but both need the same worker.
    let input = ScheduleInput::new(["-", "Desk", "Floor"], ["-", "Day"], 1)
        .with_worker(Worker::new("a").with_tasks([1, 2]).with_shifts([1]))
        .with_worker(Worker::new("b").with_tasks([]).with_shifts([1]))
        .with_requirement(0, 1, 1, 1)
        .with_requirement(0, 2, 1, 1);

    let err = Scheduler::new(config()).solve(&input).unwrap_err();
    assert!(matches!(err, ShiftForgeError::Infeasible(_)));
}

#[test]
fn test_huge_streak_limit_never_fires() {
    let input = single_slot(2, 1)
        .with_soft_constraint(SoftConstraintSpec::max_consecutive_working_days(usize::MAX, 5));
    let result = run(&input);

    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, 0);
}

#[test]
fn test_huge_requirement_counts() {
    let overflowing = uniform_roster(2, 2, 1, 1)
        .with_requirement(0, 1, 1, i64::MAX)
        .with_requirement(0, 2, 1, 1);
    let err = Scheduler::new(config()).solve(&overflowing).unwrap_err();
    assert!(matches!(err, ShiftForgeError::InvalidInput(_)));

    let unreachable = uniform_roster(2, 1, 1, 1).with_requirement(0, 1, 1, i64::MAX);
    let err = Scheduler::new(config()).solve(&unreachable).unwrap_err();
    assert!(matches!(err, ShiftForgeError::Infeasible(_)));
}

#[test]
fn test_overflowing_penalties_are_rejected() {
    let input = single_slot(2, 1)
        .with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 1, i64::MAX))
        .with_soft_constraint(SoftConstraintSpec::shift_not_equal(1, 0, 1, i64::MAX));
    let err = Scheduler::new(config()).solve(&input).unwrap_err();
    assert!(matches!(err, ShiftForgeError::InvalidInput(_)));
}

#[test]
fn test_shift_not_equal_avoided_when_possible() {
    let input = night_preference(30);
    let result = run(&input);

    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, 0);
    assert_ne!(result.cell_of(0, 0), Some((1, 2)));
    assert_eq!(result.workers_on(0, 1, 2), vec![1]);
}

#[test]
fn test_shift_not_equal_reported_when_unavoidable() {
    let mut input = night_preference(30);
    input.workers[1].allowed_shifts = [1].into_iter().collect();
    let result = run(&input);

    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, 30);
    assert_eq!(result.violated.len(), 1);
    let v = &result.violated[0];
    assert_eq!(v.rule_kind, RuleKind::ShiftNotEqual);
    assert_eq!((v.worker, v.day, v.penalty), (0, 0, 30));
    assert_eq!(v.worker_id, "w0");
}

#[test]
fn test_leave_request_for_whole_day() {
    let input = single_slot(2, 1).with_leave_request(LeaveRequest {
        worker: 0,
        day: 0,
        shift: None,
        penalty: 50,
    });
    // PreferOne places worker 0 first, so the leave is only honoured by
    // improving on that first leaf.
    let config = config().with_value_ordering(ValueOrdering::PreferOne);
    let result = Scheduler::new(config).solve(&input).unwrap();

    assert_eq!(result.cost, 0);
    assert_eq!(result.workers_on(0, 1, 1), vec![1]);
    assert_eq!(result.statistics.improvements, 2);
}

#[test]
fn test_leave_request_unavoidable() {
    let input = single_slot(1, 1).with_leave_request(LeaveRequest {
        worker: 0,
        day: 0,
        shift: None,
        penalty: 50,
    });
    let result = run(&input);

    assert_eq!(result.cost, 50);
    assert_eq!(result.violated[0].rule_kind, RuleKind::ShiftExact);
}

#[test]
fn test_shift_exact_requires_presence() {
    let input = uniform_roster(2, 1, 2, 1)
        .with_requirement(0, 1, 2, 1)
        .with_soft_constraint(SoftConstraintSpec::shift_exact(1, 0, 2, 40));
    let result = run(&input);

    assert_eq!(result.cost, 0);
    assert_eq!(result.cell_of(1, 0), Some((1, 2)));
}

#[test]
fn test_shift_exact_absence() {
    let input = uniform_roster(2, 1, 1, 1)
        .with_requirement(0, 1, 1, 1)
        .with_soft_constraint(SoftConstraintSpec::new(
            SoftRule::ShiftExact {
                worker: 0,
                day: 0,
                shift: 1,
                present: false,
            },
            40,
        ));
    let result = run(&input);

    assert_eq!(result.cost, 0);
    assert_eq!(result.workers_on(0, 1, 1), vec![1]);
}

#[test]
fn test_sentinel_shift_not_equal_penalizes_day_off() {
    let input = single_slot(2, 1)
        .with_soft_constraint(SoftConstraintSpec::shift_not_equal(1, 0, 0, 25));
    let result = run(&input);

    assert_eq!(result.cost, 0);
    assert_eq!(result.workers_on(0, 1, 1), vec![1]);
}

#[test]
fn test_shift_sequence_unavoidable() {
    let input = uniform_roster(1, 1, 2, 2)
        .with_requirement(0, 1, 2, 1)
        .with_requirement(1, 1, 1, 1)
        .with_soft_constraint(SoftConstraintSpec::shift_sequence(0, 2, 1, 15));
    let result = run(&input);

    assert_eq!(result.cost, 15);
    assert_eq!(result.violated.len(), 1);
    assert_eq!(result.violated[0].rule_kind, RuleKind::ShiftSequence);
    assert_eq!(result.violated[0].day, 0);
}

#[test]
fn test_allowed_shift_set() {
    let input = uniform_roster(2, 1, 2, 2)
        .with_requirement(0, 1, 2, 1)
        .with_requirement(1, 1, 2, 1)
        .with_soft_constraint(SoftConstraintSpec::allowed_shifts(0, vec![1], 10));
    let result = run(&input);

    assert_eq!(result.cost, 0);
    assert!(result.assignments_of(0).next().is_none());
}

#[test]
fn test_max_consecutive_working_days() {
    let mut input = uniform_roster(1, 1, 1, 3)
        .with_soft_constraint(SoftConstraintSpec::max_consecutive_working_days(2, 20));
    for day in 0..3 {
        input = input.with_requirement(day, 1, 1, 1);
    }
    let result = run(&input);

    assert_eq!(result.cost, 20);
    assert_eq!(result.violated[0].rule_kind, RuleKind::MaxConsecutiveWorkingDays);
}

fn rotation(workers: usize) -> ScheduleInput {
    let mut input = uniform_roster(workers, 1, 1, 3)
        .with_soft_constraint(SoftConstraintSpec::min_non_working_days(3, 1, 20));
    for day in 0..3 {
        input = input.with_requirement(day, 1, 1, 1);
    }
    input
}

#[test]
fn test_min_non_working_days() {
    assert_eq!(run(&rotation(2)).cost, 0);

    let alone = run(&rotation(1));
    assert_eq!(alone.cost, 20);
    assert_eq!(alone.violated[0].rule_kind, RuleKind::MinNonWorkingDays);
}

#[test]
fn test_min_non_working_comparison_is_configurable() {
    // Violated when a worker gets at least one day off: one of the two
    // workers always does.
    let config = config().with_min_non_working_violation(Comparison::GreaterOrEqual);
    let input = rotation(2);
    let result = Scheduler::new(config).solve(&input).unwrap();

    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, 20);
    assert_eq!(result.violated.len(), 1);
}

#[test]
fn test_zero_time_limit_times_out() {
    let config = SolverConfig::default().with_time_limit_millis(0);
    let result = Scheduler::new(config).solve(&single_slot(3, 1)).unwrap();

    assert_eq!(result.search_status, SearchStatus::TimedOut);
    assert!(!result.solution_found);
    assert!(result.assignments.is_empty());
}

#[test]
fn test_weekly_roster() {
    let input = weekly_roster();
    let result = run(&input);

    assert!(result.solution_found);
    assert_eq!(result.assignments.len(), 14);
    if result.search_status == SearchStatus::Exhausted {
        assert_eq!(result.cost, 0);
    }
}

#[test]
fn test_phases_and_orderings_agree_on_optimum() {
    let input = night_preference(30).with_leave_request(LeaveRequest {
        worker: 1,
        day: 0,
        shift: Some(2),
        penalty: 10,
    });
    let baseline = run(&input).cost;
    assert_eq!(baseline, 10);

    let staged = config()
        .with_phase(
            PhaseConfig::new(PhaseSelection::Workers { workers: vec![1] })
                .with_value_ordering(ValueOrdering::PreferOne),
        )
        .with_phase(
            PhaseConfig::new(PhaseSelection::Shifts { shifts: vec![2] })
                .with_variable_ordering(VariableOrdering::MinDomainHighestMax),
        );
    let result = Scheduler::new(staged).solve(&input).unwrap();
    assert_eq!(result.search_status, SearchStatus::Exhausted);
    assert_eq!(result.cost, baseline);
}

#[test]
fn test_input_json_round_trip() {
    let input = weekly_roster().with_leave_request(LeaveRequest {
        worker: 2,
        day: 3,
        shift: Some(2),
        penalty: 10,
    });
    let json = serde_json::to_string(&input).unwrap();
    let back: ScheduleInput = serde_json::from_str(&json).unwrap();
    assert_eq!(back, input);
}

#[test]
fn test_input_json_contract() {
    let json = r#"{
        "taskNames": ["-", "Desk"],
        "shiftNames": ["-", "Day", "Night"],
        "horizonDays": 1,
        "workers": [
            {"id": "w0", "allowedTasks": [1], "allowedShifts": [1, 2]},
            {"id": "w1", "allowedTasks": [1], "allowedShifts": [1, 2], "priority": 1}
        ],
        "requirements": [{"day": 0, "task": 1, "shift": 2, "count": 1}],
        "softConstraintSpecs": [
            {"kind": "shift_not_equal", "params": {"worker": 0, "day": 0, "shift": 2}, "penalty": 30}
        ]
    }"#;
    let input: ScheduleInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.all_soft_constraints().len(), 1);

    let result = run(&input);
    assert_eq!(result.cost, 0);

    let out = serde_json::to_value(&result).unwrap();
    assert_eq!(out["solutionFound"], true);
    assert_eq!(out["searchStatus"], "Exhausted");
    assert_eq!(out["assignments"][0]["workerId"], "w1");
}
