//! Linear sum propagation: `Σ terms = target`.
//!
//! One bounds-consistent propagator backs three hard rules that all link a
//! group of 0/1 cells to an integer: channeling (at most one cell per
//! worker-day, tied to the worker's working flag), exact slot counts, and
//! the per-day total.

use crate::error::Conflict;
use crate::store::{DomainStore, VarId};

use super::Propagator;

/// Which hard rule a [`SumEquals`] instance enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumKind {
    /// Cells of one worker-day sum to the worker's `working` flag.
    Channel,
    /// Cells of one slot sum to the slot's requirement.
    ExactCount,
    /// All cells of one day sum to the day's total requirement.
    DayTotal,
}

/// Enforces `Σ terms = target`.
#[derive(Debug, Clone)]
pub struct SumEquals {
    kind: SumKind,
    terms: Vec<VarId>,
    target: VarId,
    // terms followed by target
    watched: Vec<VarId>,
}

impl SumEquals {
    pub fn new(kind: SumKind, terms: Vec<VarId>, target: VarId) -> Self {
        let mut watched = terms.clone();
        watched.push(target);
        Self {
            kind,
            terms,
            target,
            watched,
        }
    }

    pub fn channel(cells: Vec<VarId>, working: VarId) -> Self {
        Self::new(SumKind::Channel, cells, working)
    }

    pub fn exact_count(cells: Vec<VarId>, count: VarId) -> Self {
        Self::new(SumKind::ExactCount, cells, count)
    }

    pub fn day_total(cells: Vec<VarId>, total: VarId) -> Self {
        Self::new(SumKind::DayTotal, cells, total)
    }

    pub fn kind(&self) -> SumKind {
        self.kind
    }

    pub fn target(&self) -> VarId {
        self.target
    }
}

impl Propagator for SumEquals {
    fn name(&self) -> &'static str {
        match self.kind {
            SumKind::Channel => "channel",
            SumKind::ExactCount => "exact_count",
            SumKind::DayTotal => "day_total",
        }
    }

    fn variables(&self) -> &[VarId] {
        &self.watched
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let (lo, hi) = self.terms.iter().fold((0i64, 0i64), |(lo, hi), &x| {
            (lo + store.min(x), hi + store.max(x))
        });

        store.restrict_bounds(self.target, lo, hi)?;
        if lo == hi {
            return Ok(());
        }

        let (t_min, t_max) = (store.min(self.target), store.max(self.target));
        for &x in &self.terms {
            if store.is_bound(x) {
                continue;
            }
            let (x_min, x_max) = (store.min(x), store.max(x));
            // Others contribute at most hi - x_max and at least lo - x_min.
            let floor = t_min - (hi - x_max);
            let ceiling = t_max - (lo - x_min);
            store.restrict_bounds(x, floor, ceiling)?;
        }
        Ok(())
    }

    fn is_satisfied(&self, store: &DomainStore) -> bool {
        let sum: Option<i64> = self.terms.iter().map(|&x| store.value(x)).sum();
        matches!((sum, store.value(self.target)), (Some(s), Some(t)) if s == t)
    }
}
