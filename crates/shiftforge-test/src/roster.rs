//! Scheduling inputs used across test suites.
//!
//! Index 0 of every task and shift table is the sentinel, so the first real
//! task and shift are both 1.

use shiftforge_core::{ScheduleInput, SoftConstraintSpec, Worker};

/// `workers` interchangeable workers, one day, one slot needing `count`.
pub fn single_slot(workers: usize, count: i64) -> ScheduleInput {
    let mut input = ScheduleInput::new(["-", "Desk"], ["-", "Day"], 1);
    for w in 0..workers {
        input = input.with_worker(Worker::new(format!("w{w}")).with_tasks([1]).with_shifts([1]));
    }
    input.with_requirement(0, 1, 1, count)
}

/// `workers` workers allowed everywhere on a `tasks` x `shifts` grid.
pub fn uniform_roster(workers: usize, tasks: usize, shifts: usize, days: usize) -> ScheduleInput {
    let task_names = std::iter::once("-".to_string()).chain((1..=tasks).map(|t| format!("T{t}")));
    let shift_names = std::iter::once("-".to_string()).chain((1..=shifts).map(|s| format!("S{s}")));
    let mut input = ScheduleInput::new(task_names, shift_names, days);
    for w in 0..workers {
        input = input.with_worker(
            Worker::new(format!("w{w}"))
                .with_tasks(1..=tasks)
                .with_shifts(1..=shifts),
        );
    }
    input
}

/// Two workers allowed on both shifts of one day, one seat on the night
/// shift, and a penalty for putting worker 0 on it.
pub fn night_preference(penalty: i64) -> ScheduleInput {
    ScheduleInput::new(["-", "Desk"], ["-", "Day", "Night"], 1)
        .with_worker(Worker::new("w0").with_tasks([1]).with_shifts([1, 2]))
        .with_worker(Worker::new("w1").with_tasks([1]).with_shifts([1, 2]))
        .with_requirement(0, 1, 2, 1)
        .with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, penalty))
}

/// Four workers, two tasks, day and night shifts over a week, with one day
/// seat and one night seat per day and a cap of five consecutive days.
pub fn weekly_roster() -> ScheduleInput {
    let mut input = ScheduleInput::new(["-", "Front", "Back"], ["-", "Day", "Night"], 7)
        .with_worker(Worker::new("ana").with_tasks([1, 2]).with_shifts([1, 2]).with_priority(0))
        .with_worker(Worker::new("ben").with_tasks([1]).with_shifts([1, 2]).with_priority(1))
        .with_worker(Worker::new("cai").with_tasks([2]).with_shifts([1, 2]).with_priority(1))
        .with_worker(Worker::new("dee").with_tasks([1, 2]).with_shifts([1]).with_priority(2))
        .with_soft_constraint(SoftConstraintSpec::max_consecutive_working_days(5, 20))
        .with_soft_constraint(SoftConstraintSpec::shift_sequence(0, 2, 1, 15));
    for day in 0..7 {
        input = input
            .with_requirement(day, 1, 1, 1)
            .with_requirement(day, 2, 2, 1);
    }
    input
}
