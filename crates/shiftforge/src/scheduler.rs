//! Validate, build, solve and report.

use shiftforge_config::SolverConfig;
use shiftforge_core::{
    validate, AssignmentRecord, Result, ScheduleInput, ScheduleResult, ShiftForgeError,
    ViolationRecord,
};
use shiftforge_solver::{SolveOutcome, Solver};
use tracing::info;

use crate::builder::ScheduleModel;
use crate::layout::VariableLayout;

/// Entry point for scheduling one input.
///
/// Each call to [`Scheduler::solve`] owns its model, search state and
/// collector; nothing is shared between calls.
///
/// # Example
///
/// ```
/// use shiftforge::prelude::*;
///
/// let input = ScheduleInput::new(["-", "Desk"], ["-", "Day"], 1)
///     .with_worker(Worker::new("ann").with_tasks([1]).with_shifts([1]))
///     .with_worker(Worker::new("bob").with_tasks([1]).with_shifts([1]))
///     .with_requirement(0, 1, 1, 1);
///
/// let result = Scheduler::new(SolverConfig::default()).solve(&input).unwrap();
/// assert!(result.solution_found);
/// assert_eq!(result.search_status, SearchStatus::Exhausted);
/// assert_eq!(result.cost, 0);
/// assert_eq!(result.assignments.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SolverConfig,
}

impl Scheduler {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds the cheapest schedule for `input` within the time budget.
    ///
    /// Fails with `InvalidInput` before any model is built, with `Config`
    /// for phases that do not fit the input, with `Infeasible` when the hard
    /// rules fail before the first decision, and with
    /// `InternalInconsistency` on a broken invariant. A time out is not an
    /// error; it is reported in the result's status.
    pub fn solve(&self, input: &ScheduleInput) -> Result<ScheduleResult> {
        validate(input)?;
        self.config.validate()?;

        let built = ScheduleModel::build(input, &self.config);
        let stages = built.stages(input, &self.config)?;
        let ScheduleModel { model, layout } = built;

        let outcome = Solver::new(self.config.clone()).solve(model, stages)?;
        if let Some(conflict) = outcome.root_conflict {
            return Err(ShiftForgeError::Infeasible(conflict.to_string()));
        }

        let result = report(input, &layout, outcome);
        info!(
            event = "schedule_reported",
            status = ?result.search_status,
            cost = result.cost,
            assignments = result.assignments.len(),
            violated = result.violated.len(),
        );
        Ok(result)
    }
}

/// Solves `input` with `config`.
pub fn solve(input: &ScheduleInput, config: SolverConfig) -> Result<ScheduleResult> {
    Scheduler::new(config).solve(input)
}

fn report(input: &ScheduleInput, layout: &VariableLayout, outcome: SolveOutcome) -> ScheduleResult {
    let statistics = outcome.stats.to_report();
    let Some(best) = outcome.best else {
        return ScheduleResult::empty(outcome.status, statistics);
    };

    let mut assignments: Vec<AssignmentRecord> = layout
        .cells()
        .iter()
        .filter(|c| best.value(c.var) == 1)
        .map(|c| AssignmentRecord {
            day: c.day,
            task: c.task,
            shift: c.shift,
            worker: c.worker,
            worker_id: input.workers[c.worker].id.clone(),
        })
        .collect();
    assignments.sort();

    let violated = outcome
        .violated
        .iter()
        .map(|sc| ViolationRecord {
            constraint_id: sc.id,
            rule_kind: sc.locator.rule_kind,
            worker: sc.locator.worker,
            worker_id: input.workers[sc.locator.worker].id.clone(),
            day: sc.locator.day,
            penalty: sc.penalty,
        })
        .collect();

    ScheduleResult {
        solution_found: true,
        cost: best.cost(),
        assignments,
        violated,
        search_status: outcome.status,
        statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftforge_config::{PhaseConfig, PhaseSelection};
    use shiftforge_core::{SearchStatus, Worker};

    fn two_workers() -> ScheduleInput {
        ScheduleInput::new(["-", "A"], ["-", "Day"], 1)
            .with_worker(Worker::new("w0").with_tasks([1]).with_shifts([1]))
            .with_worker(Worker::new("w1").with_tasks([1]).with_shifts([1]))
            .with_requirement(0, 1, 1, 1)
    }

    #[test]
    fn test_invalid_input_never_builds() {
        let input = ScheduleInput::new(["-", "A"], ["-", "Day"], 0);
        let err = Scheduler::default().solve(&input).unwrap_err();
        assert!(matches!(err, ShiftForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_phase_is_config_error() {
        let config = SolverConfig::default()
            .with_phase(PhaseConfig::new(PhaseSelection::Workers { workers: vec![9] }));
        let err = Scheduler::new(config).solve(&two_workers()).unwrap_err();
        assert!(matches!(err, ShiftForgeError::Config(_)));
    }

    #[test]
    fn test_report_uses_worker_ids() {
        let result = Scheduler::default().solve(&two_workers()).unwrap();
        assert_eq!(result.search_status, SearchStatus::Exhausted);
        assert_eq!(result.assignments.len(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.worker_id, two_workers().workers[a.worker].id);
        assert!(result.statistics.nodes >= 1);
    }
}
