//! Solver entry point: runs one branch-and-bound search over a model.

use shiftforge_config::SolverConfig;
use shiftforge_core::SearchStatus;
use tracing::info;

use crate::collector::{Solution, SolutionCollector};
use crate::cost::SoftConstraint;
use crate::error::Conflict;
use crate::model::Model;
use crate::search::{BranchAndBound, SearchOutcome, SearchStage};
use crate::stats::SearchStats;
use crate::termination::TimeTermination;

/// What a solve produced.
#[derive(Debug)]
pub struct SolveOutcome {
    pub status: SearchStatus,
    /// Set when propagation failed before the first decision.
    pub root_conflict: Option<Conflict>,
    pub best: Option<Solution>,
    /// Soft constraints the best solution violates, in id order.
    pub violated: Vec<SoftConstraint>,
    pub stats: SearchStats,
}

/// Runs searches according to a [`SolverConfig`].
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Searches `model` using `stages` for branching.
    ///
    /// Only fatal conflicts are returned as errors; infeasibility and time
    /// outs are reported in the outcome's status.
    pub fn solve(&self, mut model: Model, stages: Vec<SearchStage>) -> Result<SolveOutcome, Conflict> {
        let mut stats = SearchStats::default();
        stats.start();

        info!(
            event = "solve_start",
            variables = model.var_count(),
            decisions = model.decision_vars().len(),
            propagators = model.registry.len(),
            soft_constraints = model.cost.constraints().len(),
            stages = stages.len(),
            time_limit_ms = self.config.time_limit_millis,
        );

        let mut search = BranchAndBound::new(
            stages,
            TimeTermination::new(self.config.time_limit()),
            self.config.enable_pruning,
        );
        let mut collector = SolutionCollector::new();
        let outcome = search.search(&mut model, &mut collector, &mut stats)?;

        let timed_out = outcome == SearchOutcome::TimedOut;
        let root_conflict = match outcome {
            SearchOutcome::RootInfeasible(conflict) => {
                info!(event = "root_infeasible", reason = %conflict);
                Some(conflict)
            }
            _ => None,
        };
        let status = if root_conflict.is_some() {
            SearchStatus::Infeasible
        } else if timed_out {
            SearchStatus::TimedOut
        } else if collector.best().is_none() {
            SearchStatus::Infeasible
        } else {
            SearchStatus::Exhausted
        };

        let violated = collector
            .best()
            .map(|best| {
                collector
                    .violated_constraints(best, &model.cost)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let best = collector.into_best();

        info!(
            event = "solve_end",
            status = ?status,
            cost = best.as_ref().map(Solution::cost),
            nodes = stats.nodes,
            failures = stats.failures,
            prunes = stats.bound_prunes,
            duration_ms = stats.elapsed().as_millis() as u64,
        );

        Ok(SolveOutcome {
            status,
            root_conflict,
            best,
            violated,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Condition;
    use crate::model::ModelBuilder;
    use crate::propagator::SumEquals;
    use crate::search::StagePlan;
    use shiftforge_core::{Locator, RuleKind};

    fn solve(builder: ModelBuilder, config: SolverConfig) -> SolveOutcome {
        let model = builder.build();
        let stages = StagePlan::new(&config).finish(model.decision_vars());
        Solver::new(config).solve(model, stages).unwrap()
    }

    #[test]
    fn test_status_exhausted_with_violations() {
        let mut builder = ModelBuilder::new();
        let cell = builder.decision_var();
        let need = builder.int_var(1, 1);
        builder.post(SumEquals::exact_count(vec![cell], need));
        builder.soft(
            Condition::any_equal(vec![cell], 1),
            30,
            Locator::new(RuleKind::ShiftNotEqual, 0, 0),
        );

        let outcome = solve(builder, SolverConfig::default());
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert_eq!(outcome.best.as_ref().map(Solution::cost), Some(30));
        assert_eq!(outcome.violated.len(), 1);
        assert_eq!(outcome.violated[0].penalty, 30);
    }

    #[test]
    fn test_status_root_infeasible() {
        let mut builder = ModelBuilder::new();
        let cell = builder.decision_var();
        let need = builder.int_var(2, 2);
        builder.post(SumEquals::exact_count(vec![cell], need));

        let outcome = solve(builder, SolverConfig::default());
        assert_eq!(outcome.status, SearchStatus::Infeasible);
        assert!(outcome.root_conflict.is_some());
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_status_timed_out() {
        let mut builder = ModelBuilder::new();
        let cells: Vec<_> = (0..4).map(|_| builder.decision_var()).collect();
        let need = builder.int_var(2, 2);
        builder.post(SumEquals::exact_count(cells, need));

        let outcome = solve(builder, SolverConfig::default().with_time_limit_millis(0));
        assert_eq!(outcome.status, SearchStatus::TimedOut);
        assert!(outcome.root_conflict.is_none());
    }
}
