//! Hard-rule checks over solver output.

use std::collections::{BTreeMap, BTreeSet};

use shiftforge_core::{ScheduleInput, ScheduleResult};

/// Panics if any worker holds more than one cell on a day.
pub fn assert_one_cell_per_day(result: &ScheduleResult) {
    let mut seen = BTreeSet::new();
    for a in &result.assignments {
        assert!(
            seen.insert((a.worker, a.day)),
            "worker {} holds two cells on day {}",
            a.worker,
            a.day
        );
    }
}

/// Panics unless every slot holds exactly its required number of workers.
pub fn assert_exact_counts(input: &ScheduleInput, result: &ScheduleResult) {
    let mut filled: BTreeMap<(usize, usize, usize), i64> = BTreeMap::new();
    for a in &result.assignments {
        *filled.entry((a.day, a.task, a.shift)).or_default() += 1;
    }
    for r in &input.requirements {
        assert_eq!(
            filled.get(&r.slot()).copied().unwrap_or(0),
            r.count,
            "slot {:?}",
            r.slot()
        );
    }
    for (slot, n) in filled {
        assert_eq!(input.required(slot.0, slot.1, slot.2), n, "slot {slot:?}");
    }
}

/// Panics if the result breaks any hard rule of `input`.
pub fn assert_schedule_valid(input: &ScheduleInput, result: &ScheduleResult) {
    assert_one_cell_per_day(result);
    assert_exact_counts(input, result);
    for a in &result.assignments {
        let worker = &input.workers[a.worker];
        assert!(
            worker.can_work(a.task, a.shift),
            "{} placed on task {} shift {}",
            worker.id,
            a.task,
            a.shift
        );
    }
    let penalties: i64 = result.violated.iter().map(|v| v.penalty).sum();
    assert_eq!(penalties, result.cost);
}
