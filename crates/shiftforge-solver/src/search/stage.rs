//! Ordered variable-ordering stages.
//!
//! The search consumes stages in sequence: it branches on the first stage
//! that still has an unbound variable. Decision variables no configured
//! stage covers are gathered into a final stage so every one of them is
//! eventually branched on.

use std::collections::HashSet;

use shiftforge_config::{SolverConfig, ValueOrdering, VariableOrdering};
use smallvec::SmallVec;

use super::ordering::{ordered_values, variable_selector, VariableSelector};
use crate::store::{DomainStore, VarId};

/// A group of decision variables with its own orderings.
#[derive(Debug)]
pub struct SearchStage {
    index: usize,
    vars: Vec<VarId>,
    selector: Box<dyn VariableSelector>,
    value_ordering: ValueOrdering,
}

impl SearchStage {
    pub fn new(
        index: usize,
        vars: Vec<VarId>,
        selector: Box<dyn VariableSelector>,
        value_ordering: ValueOrdering,
    ) -> Self {
        Self {
            index,
            vars,
            selector,
            value_ordering,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vars(&self) -> &[VarId] {
        &self.vars
    }

    /// Next unbound variable of this stage.
    pub fn select(&mut self, store: &DomainStore) -> Option<VarId> {
        self.selector.select(store, &self.vars)
    }

    /// Values of `var` in try order.
    pub fn values(&self, store: &DomainStore, var: VarId) -> SmallVec<[i64; 2]> {
        ordered_values(self.value_ordering, store.domain(var))
    }
}

/// Builder for the stage list of one search.
#[derive(Debug)]
pub struct StagePlan {
    variable_ordering: VariableOrdering,
    value_ordering: ValueOrdering,
    seed: Option<u64>,
    stages: Vec<SearchStage>,
    covered: HashSet<VarId>,
}

impl StagePlan {
    /// Starts a plan using the configuration's default orderings.
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            variable_ordering: config.variable_ordering,
            value_ordering: config.value_ordering,
            seed: config.random_seed,
            stages: Vec::new(),
            covered: HashSet::new(),
        }
    }

    /// Appends a stage; `None` orderings fall back to the defaults.
    pub fn stage(
        mut self,
        vars: Vec<VarId>,
        variable_ordering: Option<VariableOrdering>,
        value_ordering: Option<ValueOrdering>,
    ) -> Self {
        let index = self.stages.len();
        self.covered.extend(vars.iter().copied());
        let seed = self.seed.map(|s| s.wrapping_add(index as u64));
        let selector =
            variable_selector(variable_ordering.unwrap_or(self.variable_ordering), seed);
        let values = value_ordering.unwrap_or(self.value_ordering);
        self.stages
            .push(SearchStage::new(index, vars, selector, values));
        self
    }

    /// Closes the plan, adding a final stage for uncovered `decisions`.
    pub fn finish(self, decisions: &[VarId]) -> Vec<SearchStage> {
        let rest: Vec<VarId> = decisions
            .iter()
            .copied()
            .filter(|v| !self.covered.contains(v))
            .collect();
        if rest.is_empty() && !self.stages.is_empty() {
            return self.stages;
        }
        self.stage(rest, None, None).stages
    }
}
