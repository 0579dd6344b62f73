//! Best-solution bookkeeping.

use crate::cost::{CostModel, SoftConstraint};
use crate::store::VarId;

/// A complete, feasible assignment of every variable and its cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    values: Vec<i64>,
    cost: i64,
}

impl Solution {
    pub fn new(values: Vec<i64>, cost: i64) -> Self {
        Self { values, cost }
    }

    pub fn value(&self, var: VarId) -> i64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }
}

/// Holds the best solution offered so far.
///
/// Only strict improvements replace the held solution, so among equal-cost
/// solutions the first one found is kept.
#[derive(Debug, Default)]
pub struct SolutionCollector {
    best: Option<Solution>,
}

impl SolutionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the assignment if it strictly improves on the best.
    ///
    /// Returns whether it was accepted.
    pub fn offer(&mut self, values: Vec<i64>, cost: i64) -> bool {
        if self.best.as_ref().is_some_and(|b| cost >= b.cost) {
            return false;
        }
        self.best = Some(Solution::new(values, cost));
        true
    }

    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn best_cost(&self) -> Option<i64> {
        self.best.as_ref().map(Solution::cost)
    }

    pub fn into_best(self) -> Option<Solution> {
        self.best
    }

    /// Soft constraints `solution` violates, in id order.
    pub fn violated_constraints<'a>(
        &self,
        solution: &'a Solution,
        cost: &'a CostModel,
    ) -> Vec<&'a SoftConstraint> {
        cost.violated(solution.values()).collect()
    }
}
