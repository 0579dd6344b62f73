//! Constraint registry and model assembly.

use shiftforge_core::Locator;
use smallvec::SmallVec;

use crate::cost::{Condition, CostModel, CostSum, Reification, SoftConstraint};
use crate::error::Conflict;
use crate::propagator::Propagator;
use crate::store::{Domain, DomainStore, VarId};

/// Index of a propagator in a [`ConstraintRegistry`].
pub type PropagatorId = usize;

/// Holds the propagators and, per variable, the propagators watching it.
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    propagators: Vec<Box<dyn Propagator>>,
    watchers: Vec<SmallVec<[PropagatorId; 4]>>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a propagator and subscribes it to its variables.
    pub fn register(&mut self, propagator: Box<dyn Propagator>) -> PropagatorId {
        let id = self.propagators.len();
        for var in propagator.variables() {
            let idx = var.index();
            if idx >= self.watchers.len() {
                self.watchers.resize_with(idx + 1, SmallVec::new);
            }
            if !self.watchers[idx].contains(&id) {
                self.watchers[idx].push(id);
            }
        }
        self.propagators.push(propagator);
        id
    }

    pub fn len(&self) -> usize {
        self.propagators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propagators.is_empty()
    }

    pub fn get(&self, id: PropagatorId) -> &dyn Propagator {
        self.propagators[id].as_ref()
    }

    /// Propagators woken by a change to `var`.
    pub fn watchers(&self, var: VarId) -> &[PropagatorId] {
        self.watchers
            .get(var.index())
            .map(|w| w.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Propagator> {
        self.propagators.iter().map(|p| p.as_ref())
    }

    /// Re-checks every constraint on a fully bound store.
    pub fn verify(&self, store: &DomainStore) -> Result<(), Conflict> {
        if let Some(var) = store.vars().find(|&v| !store.is_bound(v)) {
            return Err(Conflict::Inconsistent(format!(
                "{var} still unbound at a leaf"
            )));
        }
        match self.iter().find(|p| !p.is_satisfied(store)) {
            Some(p) => Err(Conflict::Inconsistent(format!(
                "{} violated at a leaf that passed propagation",
                p.name()
            ))),
            None => Ok(()),
        }
    }
}

/// Incrementally assembles a [`Model`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    store: DomainStore,
    registry: ConstraintRegistry,
    decisions: Vec<VarId>,
    soft: Vec<SoftConstraint>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a 0/1 variable the search branches on.
    pub fn decision_var(&mut self) -> VarId {
        let var = self.store.new_var(Domain::boolean());
        self.decisions.push(var);
        var
    }

    /// Adds a derived variable; never branched on.
    pub fn int_var(&mut self, lo: i64, hi: i64) -> VarId {
        self.store.new_var(Domain::range(lo, hi))
    }

    pub fn post(&mut self, propagator: impl Propagator + 'static) -> PropagatorId {
        self.registry.register(Box::new(propagator))
    }

    /// Adds a soft constraint violated when `condition` holds.
    pub fn soft(&mut self, condition: Condition, penalty: i64, locator: Locator) -> usize {
        let id = self.soft.len();
        let indicator = self.store.new_var(Domain::boolean());
        self.registry
            .register(Box::new(Reification::new(indicator, condition.clone())));
        self.soft.push(SoftConstraint {
            id,
            indicator,
            penalty,
            locator,
            condition,
        });
        id
    }

    pub fn decision_vars(&self) -> &[VarId] {
        &self.decisions
    }

    /// Adds the cost variable and its sum propagator.
    pub fn build(mut self) -> Model {
        let ceiling = self
            .soft
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.penalty.max(0)));
        let cost_var = self.store.new_var(Domain::range(0, ceiling));
        let terms = self.soft.iter().map(|c| (c.indicator, c.penalty)).collect();
        self.registry.register(Box::new(CostSum::new(cost_var, terms)));
        Model {
            store: self.store,
            registry: self.registry,
            cost: CostModel::new(cost_var, self.soft),
            decisions: self.decisions,
        }
    }
}

/// Everything one solve call owns: domains, constraints and objective.
#[derive(Debug)]
pub struct Model {
    pub store: DomainStore,
    pub registry: ConstraintRegistry,
    pub cost: CostModel,
    decisions: Vec<VarId>,
}

impl Model {
    pub fn decision_vars(&self) -> &[VarId] {
        &self.decisions
    }

    pub fn var_count(&self) -> usize {
        self.store.len()
    }
}
