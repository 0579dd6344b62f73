//! Depth-first branch and bound.
//!
//! Each node is a propagation fixpoint. The search picks an unbound decision
//! variable from the current stage, snapshots the store and tries its values
//! in order, restoring the snapshot before each attempt. A node whose cost
//! lower bound already meets the best known cost is abandoned without being
//! expanded. The time budget is polled at every node and before every
//! decision.

mod ordering;
mod stage;

pub use ordering::{
    ordered_values, variable_selector, BoundTieBreak, FirstUnbound, MinDomain, RandomUnbound,
    VariableSelector,
};
pub use stage::{SearchStage, StagePlan};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::collector::SolutionCollector;
use crate::error::Conflict;
use crate::model::Model;
use crate::propagation::PropagationEngine;
use crate::stats::SearchStats;
use crate::store::{Snapshot, VarId};
use crate::termination::TimeTermination;

/// Where the search currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Root,
    Branching,
    FeasibleLeaf,
    InfeasibleLeaf,
    BoundExceeded,
    Backtrack,
    Exhausted,
    TimedOut,
}

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The whole tree was explored.
    Exhausted,
    /// The time budget ran out first.
    TimedOut,
    /// Propagation failed before the first decision.
    RootInfeasible(Conflict),
}

// One decision level.
#[derive(Debug)]
struct Frame {
    snapshot: Snapshot,
    var: VarId,
    values: SmallVec<[i64; 2]>,
    next: usize,
}

enum Step {
    Descended,
    Exhausted,
    TimedOut,
}

/// Branch-and-bound search over a [`Model`].
#[derive(Debug)]
pub struct BranchAndBound {
    stages: Vec<SearchStage>,
    termination: TimeTermination,
    enable_pruning: bool,
    state: SearchState,
    exhausted_stages: Vec<bool>,
}

impl BranchAndBound {
    pub fn new(stages: Vec<SearchStage>, termination: TimeTermination, enable_pruning: bool) -> Self {
        let exhausted_stages = vec![false; stages.len()];
        Self {
            stages,
            termination,
            enable_pruning,
            state: SearchState::Root,
            exhausted_stages,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Runs the search, offering every improving leaf to `collector`.
    ///
    /// Returns `Err` only for fatal conflicts.
    pub fn search(
        &mut self,
        model: &mut Model,
        collector: &mut SolutionCollector,
        stats: &mut SearchStats,
    ) -> Result<SearchOutcome, Conflict> {
        let mut engine = PropagationEngine::new(model.registry.len());
        self.state = SearchState::Root;

        if let Err(conflict) = engine.propagate_all(&mut model.store, &model.registry) {
            stats.propagator_runs += engine.runs();
            if conflict.is_fatal() {
                return Err(conflict);
            }
            self.state = SearchState::Exhausted;
            return Ok(SearchOutcome::RootInfeasible(conflict));
        }

        let mut stack: Vec<Frame> = Vec::new();
        let result = loop {
            stats.record_node(stack.len());
            if self.termination.is_terminated(stats) {
                break Ok(SearchOutcome::TimedOut);
            }

            match self.expand(model, collector, stats, stack.len()) {
                Ok(Some(frame)) => stack.push(frame),
                Ok(None) => {}
                Err(conflict) => break Err(conflict),
            }

            match self.next_child(&mut stack, model, &mut engine, stats) {
                Ok(Step::Descended) => {}
                Ok(Step::Exhausted) => break Ok(SearchOutcome::Exhausted),
                Ok(Step::TimedOut) => break Ok(SearchOutcome::TimedOut),
                Err(conflict) => break Err(conflict),
            }
        };

        stats.propagator_runs += engine.runs();
        match &result {
            Ok(SearchOutcome::TimedOut) => self.state = SearchState::TimedOut,
            Ok(_) => self.state = SearchState::Exhausted,
            Err(_) => {}
        }
        result
    }

    // Handles a node at fixpoint: prune, record a leaf, or open a decision.
    fn expand(
        &mut self,
        model: &mut Model,
        collector: &mut SolutionCollector,
        stats: &mut SearchStats,
        depth: usize,
    ) -> Result<Option<Frame>, Conflict> {
        if self.enable_pruning {
            if let Some(best) = collector.best_cost() {
                let bound = model.cost.lower_bound(&model.store);
                if bound >= best {
                    self.state = SearchState::BoundExceeded;
                    stats.record_prune();
                    trace!(event = "bound_exceeded", depth = depth, bound = bound, best = best);
                    return Ok(None);
                }
            }
        }

        let Some((stage, var)) = self.select(model) else {
            self.state = SearchState::FeasibleLeaf;
            self.accept_leaf(model, collector, stats, depth)?;
            return Ok(None);
        };

        self.state = SearchState::Branching;
        let values = self.stages[stage].values(&model.store, var);
        Ok(Some(Frame {
            snapshot: model.store.snapshot(),
            var,
            values,
            next: 0,
        }))
    }

    fn select(&mut self, model: &Model) -> Option<(usize, VarId)> {
        for (i, stage) in self.stages.iter_mut().enumerate() {
            if let Some(var) = stage.select(&model.store) {
                return Some((i, var));
            }
            if !self.exhausted_stages[i] {
                self.exhausted_stages[i] = true;
                debug!(event = "phase_exhausted", stage = stage.index(), vars = stage.vars().len());
            }
        }
        None
    }

    fn accept_leaf(
        &mut self,
        model: &Model,
        collector: &mut SolutionCollector,
        stats: &mut SearchStats,
        depth: usize,
    ) -> Result<(), Conflict> {
        model.registry.verify(&model.store)?;
        let values = model
            .store
            .values()
            .ok_or_else(|| Conflict::Inconsistent("unbound variable at a leaf".to_string()))?;
        let cost = model
            .cost
            .cost(&model.store)
            .ok_or_else(|| Conflict::Inconsistent("cost unbound at a leaf".to_string()))?;
        let recomputed = model.cost.evaluate(&values);
        if recomputed != cost {
            return Err(Conflict::Inconsistent(format!(
                "cost variable holds {cost} but violated soft constraints sum to {recomputed}"
            )));
        }

        let improved = collector.offer(values, cost);
        stats.record_solution(improved);
        if improved {
            debug!(event = "new_best", cost = cost, depth = depth, nodes = stats.nodes);
        }
        Ok(())
    }

    // Moves to the next child that survives propagation, backtracking over
    // exhausted levels.
    fn next_child(
        &mut self,
        stack: &mut Vec<Frame>,
        model: &mut Model,
        engine: &mut PropagationEngine,
        stats: &mut SearchStats,
    ) -> Result<Step, Conflict> {
        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                return Ok(Step::Exhausted);
            };

            if frame.next == frame.values.len() {
                let snapshot = frame.snapshot;
                stack.pop();
                model.store.restore(snapshot);
                self.state = SearchState::Backtrack;
                stats.record_backtrack();
                continue;
            }
            if self.termination.is_terminated(stats) {
                return Ok(Step::TimedOut);
            }

            let value = frame.values[frame.next];
            frame.next += 1;
            let var = frame.var;
            model.store.restore(frame.snapshot);
            trace!(event = "decision", depth = depth, var = %var, value = value);

            let outcome = model
                .store
                .assign(var, value)
                .and_then(|_| engine.propagate_changes(&mut model.store, &model.registry));
            match outcome {
                Ok(()) => return Ok(Step::Descended),
                Err(conflict) if conflict.is_fatal() => return Err(conflict),
                Err(conflict) => {
                    self.state = SearchState::InfeasibleLeaf;
                    stats.record_failure();
                    trace!(event = "branch_failed", depth = depth, reason = %conflict);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
