//! Propagation engine: runs propagators to a fixpoint.
//!
//! A queue of propagator ids is seeded either with every propagator (at the
//! root) or with the watchers of the variables changed by a decision. Each
//! run's changes wake the watchers of the changed variables; when the queue
//! drains the node is at its fixpoint.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::Conflict;
use crate::model::{ConstraintRegistry, PropagatorId};
use crate::store::DomainStore;

/// Engine state for the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationState {
    Propagating,
    #[default]
    Fixpoint,
}

/// Fixpoint driver over a [`ConstraintRegistry`].
#[derive(Debug, Default)]
pub struct PropagationEngine {
    queue: VecDeque<PropagatorId>,
    queued: Vec<bool>,
    state: PropagationState,
    runs: u64,
}

impl PropagationEngine {
    pub fn new(propagators: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(propagators),
            queued: vec![false; propagators],
            state: PropagationState::Fixpoint,
            runs: 0,
        }
    }

    pub fn state(&self) -> PropagationState {
        self.state
    }

    /// Total propagator invocations so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Runs every propagator, then continues to a fixpoint.
    pub fn propagate_all(
        &mut self,
        store: &mut DomainStore,
        registry: &ConstraintRegistry,
    ) -> Result<(), Conflict> {
        if let Some(var) = store.first_empty() {
            return Err(Conflict::Wipeout { var });
        }
        store.clear_changes();
        for id in 0..registry.len() {
            self.enqueue(id);
        }
        self.run(store, registry)
    }

    /// Wakes the watchers of variables changed since the last call, then
    /// continues to a fixpoint.
    pub fn propagate_changes(
        &mut self,
        store: &mut DomainStore,
        registry: &ConstraintRegistry,
    ) -> Result<(), Conflict> {
        self.schedule_changes(store, registry);
        self.run(store, registry)
    }

    fn enqueue(&mut self, id: PropagatorId) {
        if id >= self.queued.len() {
            self.queued.resize(id + 1, false);
        }
        if !self.queued[id] {
            self.queued[id] = true;
            self.queue.push_back(id);
        }
    }

    fn schedule_changes(&mut self, store: &mut DomainStore, registry: &ConstraintRegistry) {
        for var in store.take_changes() {
            for &id in registry.watchers(var) {
                self.enqueue(id);
            }
        }
    }

    fn run(&mut self, store: &mut DomainStore, registry: &ConstraintRegistry) -> Result<(), Conflict> {
        while let Some(id) = self.queue.pop_front() {
            self.state = PropagationState::Propagating;
            self.queued[id] = false;
            self.runs += 1;

            let propagator = registry.get(id);
            if let Err(conflict) = propagator.propagate(store) {
                trace!(
                    event = "propagation_failed",
                    propagator = propagator.name(),
                    reason = %conflict,
                );
                self.reset(store);
                return Err(conflict);
            }
            self.schedule_changes(store, registry);
        }
        self.state = PropagationState::Fixpoint;
        Ok(())
    }

    fn reset(&mut self, store: &mut DomainStore) {
        for id in self.queue.drain(..) {
            self.queued[id] = false;
        }
        store.clear_changes();
        self.state = PropagationState::Fixpoint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;
    use crate::propagator::{AllowedSet, SumEquals};

    #[test]
    fn test_chained_fixpoint() {
        // Two slots of one worker-day: slot 1 is forbidden and slot 0 needs
        // one worker, so the cell of slot 0 and the working flag follow.
        let mut builder = ModelBuilder::new();
        let c0 = builder.decision_var();
        let c1 = builder.decision_var();
        let working = builder.int_var(0, 1);
        let need = builder.int_var(1, 1);
        builder.post(SumEquals::channel(vec![c0, c1], working));
        builder.post(SumEquals::exact_count(vec![c0], need));
        builder.post(AllowedSet::new(vec![c1]));
        let mut model = builder.build();

        let mut engine = PropagationEngine::new(model.registry.len());
        engine
            .propagate_all(&mut model.store, &model.registry)
            .unwrap();

        assert_eq!(engine.state(), PropagationState::Fixpoint);
        assert_eq!(model.store.value(c0), Some(1));
        assert_eq!(model.store.value(c1), Some(0));
        assert_eq!(model.store.value(working), Some(1));
        assert!(engine.runs() >= model.registry.len() as u64);
    }

    #[test]
    fn test_decision_wakes_watchers() {
        let mut builder = ModelBuilder::new();
        let c0 = builder.decision_var();
        let c1 = builder.decision_var();
        let working = builder.int_var(0, 1);
        builder.post(SumEquals::channel(vec![c0, c1], working));
        let mut model = builder.build();

        let mut engine = PropagationEngine::new(model.registry.len());
        engine
            .propagate_all(&mut model.store, &model.registry)
            .unwrap();
        assert!(!model.store.is_bound(working));

        model.store.assign(c1, 1).unwrap();
        engine
            .propagate_changes(&mut model.store, &model.registry)
            .unwrap();
        assert_eq!(model.store.value(c0), Some(0));
        assert_eq!(model.store.value(working), Some(1));
    }

    #[test]
    fn test_conflict_leaves_engine_idle() {
        let mut builder = ModelBuilder::new();
        let c0 = builder.decision_var();
        let need = builder.int_var(2, 2);
        builder.post(SumEquals::exact_count(vec![c0], need));
        let mut model = builder.build();

        let mut engine = PropagationEngine::new(model.registry.len());
        let err = engine
            .propagate_all(&mut model.store, &model.registry)
            .unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(engine.state(), PropagationState::Fixpoint);
        assert!(model.store.take_changes().is_empty());
    }
}
