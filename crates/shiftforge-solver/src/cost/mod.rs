//! Soft constraints and the objective.
//!
//! Each soft constraint owns a 0/1 indicator that a [`Reification`]
//! propagator fixes once its [`Condition`] is decided. [`CostSum`] keeps the
//! cost variable within `Σ penalty * indicator`, so the cost's lower bound
//! is the penalty already committed by the partial assignment.

mod condition;

pub use condition::{Condition, Truth};

use shiftforge_core::Locator;

use crate::error::Conflict;
use crate::propagator::Propagator;
use crate::store::{DomainStore, VarId};

/// A penalized preference with its indicator variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftConstraint {
    pub id: usize,
    pub indicator: VarId,
    pub penalty: i64,
    pub locator: Locator,
    pub condition: Condition,
}

/// Fixes an indicator to the truth of its condition.
///
/// One-directional: the indicator never narrows the referenced variables.
#[derive(Debug, Clone)]
pub struct Reification {
    indicator: VarId,
    condition: Condition,
    watched: Vec<VarId>,
}

impl Reification {
    pub fn new(indicator: VarId, condition: Condition) -> Self {
        let watched = condition.variables();
        Self {
            indicator,
            condition,
            watched,
        }
    }
}

impl Propagator for Reification {
    fn name(&self) -> &'static str {
        "reification"
    }

    fn variables(&self) -> &[VarId] {
        &self.watched
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        if store.is_bound(self.indicator) {
            return Ok(());
        }
        match self.condition.evaluate(store) {
            Truth::True => store.assign(self.indicator, 1)?,
            Truth::False => store.assign(self.indicator, 0)?,
            Truth::Unknown => false,
        };
        Ok(())
    }

    fn is_satisfied(&self, store: &DomainStore) -> bool {
        let expected = match self.condition.evaluate(store) {
            Truth::True => 1,
            Truth::False => 0,
            Truth::Unknown => return false,
        };
        store.value(self.indicator) == Some(expected)
    }
}

/// Enforces `cost ∈ [Σ p·min(b), Σ p·max(b)]`.
#[derive(Debug, Clone)]
pub struct CostSum {
    cost: VarId,
    terms: Vec<(VarId, i64)>,
    watched: Vec<VarId>,
}

impl CostSum {
    pub fn new(cost: VarId, terms: Vec<(VarId, i64)>) -> Self {
        let watched = terms.iter().map(|&(v, _)| v).collect();
        Self {
            cost,
            terms,
            watched,
        }
    }
}

impl Propagator for CostSum {
    fn name(&self) -> &'static str {
        "cost_sum"
    }

    fn variables(&self) -> &[VarId] {
        &self.watched
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let (lo, hi) = self.terms.iter().fold((0i64, 0i64), |(lo, hi), &(b, p)| {
            (
                lo.saturating_add(p.saturating_mul(store.min(b))),
                hi.saturating_add(p.saturating_mul(store.max(b))),
            )
        });
        store.restrict_bounds(self.cost, lo, hi)?;
        Ok(())
    }

    fn is_satisfied(&self, store: &DomainStore) -> bool {
        let total = self.terms.iter().try_fold(0i64, |acc, &(b, p)| {
            store.value(b).map(|v| acc.saturating_add(p.saturating_mul(v)))
        });
        matches!((total, store.value(self.cost)), (Some(t), Some(c)) if t == c)
    }
}

/// The objective: the cost variable and every soft constraint feeding it.
#[derive(Debug, Clone)]
pub struct CostModel {
    cost_var: VarId,
    soft: Vec<SoftConstraint>,
}

impl CostModel {
    pub fn new(cost_var: VarId, soft: Vec<SoftConstraint>) -> Self {
        Self { cost_var, soft }
    }

    pub fn cost_var(&self) -> VarId {
        self.cost_var
    }

    pub fn constraints(&self) -> &[SoftConstraint] {
        &self.soft
    }

    /// Penalty already committed by the current partial assignment.
    pub fn lower_bound(&self, store: &DomainStore) -> i64 {
        store.min(self.cost_var)
    }

    /// The cost, once the cost variable is bound.
    pub fn cost(&self, store: &DomainStore) -> Option<i64> {
        store.value(self.cost_var)
    }

    /// Recomputes the cost of a complete assignment from the conditions
    /// themselves, bypassing the indicators.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.soft
            .iter()
            .filter(|c| c.condition.holds(values))
            .fold(0i64, |acc, c| acc.saturating_add(c.penalty))
    }

    /// Soft constraints whose indicator is 1 in `values`, in id order.
    pub fn violated<'a>(&'a self, values: &'a [i64]) -> impl Iterator<Item = &'a SoftConstraint> {
        self.soft
            .iter()
            .filter(move |c| values[c.indicator.index()] == 1)
    }
}
