//! Properties that must hold for every generated roster.

use proptest::prelude::*;
use shiftforge::prelude::*;
use shiftforge_test::{assert_schedule_valid, uniform_roster};

fn bits(mask: u8) -> impl Iterator<Item = usize> {
    (0..8).filter(move |i| mask & (1 << i) != 0).map(|i| i + 1)
}

#[allow(clippy::too_many_arguments)]
fn roster(
    workers: usize,
    tasks: usize,
    shifts: usize,
    days: usize,
    masks: Vec<(u8, u8)>,
    demand: Vec<i64>,
    prefs: Vec<(usize, usize, usize, i64)>,
    streak_cap: bool,
) -> ScheduleInput {
    let mut input = uniform_roster(workers, tasks, shifts, days);
    for (worker, (task_mask, shift_mask)) in input.workers.iter_mut().zip(masks) {
        worker.allowed_tasks = bits(task_mask).collect();
        worker.allowed_shifts = bits(shift_mask).collect();
    }
    for day in 0..days {
        for task in 0..tasks {
            for shift in 0..shifts {
                let count = demand[(day * tasks + task) * shifts + shift];
                if count > 0 {
                    input = input.with_requirement(day, task + 1, shift + 1, count);
                }
            }
        }
    }
    for (worker, day, shift, penalty) in prefs {
        input = input.with_soft_constraint(SoftConstraintSpec::shift_not_equal(
            worker, day, shift, penalty,
        ));
    }
    if streak_cap {
        input = input.with_soft_constraint(SoftConstraintSpec::max_consecutive_working_days(1, 7));
    }
    input
}

fn problem() -> impl Strategy<Value = ScheduleInput> {
    (1usize..=3, 1usize..=2, 1usize..=2, 1usize..=2)
        .prop_flat_map(|(workers, tasks, shifts, days)| {
            (
                Just((workers, tasks, shifts, days)),
                prop::collection::vec((1u8..(1u8 << tasks), 1u8..(1u8 << shifts)), workers),
                prop::collection::vec(0i64..=1, days * tasks * shifts),
                prop::collection::vec((0..workers, 0..days, 0..=shifts, 0i64..=20), 0..=3),
                any::<bool>(),
            )
        })
        .prop_map(|((workers, tasks, shifts, days), masks, demand, prefs, cap)| {
            roster(workers, tasks, shifts, days, masks, demand, prefs, cap)
        })
}

fn config() -> SolverConfig {
    SolverConfig::default().with_time_limit_millis(20_000)
}

// Proven optimum, or `None` when no schedule exists.
fn optimum(input: &ScheduleInput, config: SolverConfig) -> Option<i64> {
    match Scheduler::new(config).solve(input) {
        Ok(result) => {
            assert_ne!(result.search_status, SearchStatus::TimedOut);
            result.solution_found.then_some(result.cost)
        }
        Err(ShiftForgeError::Infeasible(_)) => None,
        Err(other) => panic!("unexpected error: {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_solutions_respect_hard_rules(input in problem()) {
        match Scheduler::new(config()).solve(&input) {
            Ok(result) if result.solution_found => assert_schedule_valid(&input, &result),
            Ok(result) => prop_assert_eq!(result.search_status, SearchStatus::Infeasible),
            Err(err) => prop_assert!(matches!(err, ShiftForgeError::Infeasible(_))),
        }
    }

    #[test]
    fn prop_tightening_never_lowers_cost(input in problem(), tasks in any::<bool>()) {
        let mut tighter = input.clone();
        let worker = &mut tighter.workers[0];
        if tasks {
            worker.allowed_tasks.pop_first();
        } else {
            worker.allowed_shifts.pop_first();
        }

        let before = optimum(&input, config());
        let after = optimum(&tighter, config());
        match (before, after) {
            (None, after) => prop_assert_eq!(after, None),
            (Some(_), None) => {}
            (Some(b), Some(a)) => prop_assert!(a >= b, "tightened cost {} < {}", a, b),
        }
    }

    #[test]
    fn prop_resolving_gives_same_cost(input in problem()) {
        prop_assert_eq!(optimum(&input, config()), optimum(&input, config()));
    }

    #[test]
    fn prop_pruning_keeps_optimum(input in problem(), ordering in 0usize..3) {
        let ordering = [
            VariableOrdering::FirstUnbound,
            VariableOrdering::MinDomainLowestMin,
            VariableOrdering::MinDomainHighestMax,
        ][ordering];
        let base = config().with_variable_ordering(ordering);
        prop_assert_eq!(
            optimum(&input, base.clone()),
            optimum(&input, base.with_pruning(false))
        );
    }
}
