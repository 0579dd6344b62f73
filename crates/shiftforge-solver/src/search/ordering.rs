//! Variable and value ordering policies.

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shiftforge_config::{ValueOrdering, VariableOrdering};
use smallvec::SmallVec;

use crate::store::{Domain, DomainStore, VarId};

/// Picks the next unbound variable to branch on.
pub trait VariableSelector: Send + Debug {
    /// Returns an unbound variable among `candidates`, or `None` if all are
    /// bound.
    fn select(&mut self, store: &DomainStore, candidates: &[VarId]) -> Option<VarId>;
}

/// Picks the first unbound candidate in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUnbound;

impl VariableSelector for FirstUnbound {
    fn select(&mut self, store: &DomainStore, candidates: &[VarId]) -> Option<VarId> {
        candidates.iter().copied().find(|&v| !store.is_bound(v))
    }
}

/// Tie-break among equally small domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundTieBreak {
    HighestMax,
    LowestMax,
    HighestMin,
    LowestMin,
}

impl BoundTieBreak {
    // True if `a` should be preferred over `b`.
    fn prefers(self, a: &Domain, b: &Domain) -> bool {
        match self {
            BoundTieBreak::HighestMax => a.max() > b.max(),
            BoundTieBreak::LowestMax => a.max() < b.max(),
            BoundTieBreak::HighestMin => a.min() > b.min(),
            BoundTieBreak::LowestMin => a.min() < b.min(),
        }
    }
}

/// Picks the unbound candidate with the smallest domain.
///
/// Remaining ties go to the earliest candidate.
#[derive(Debug, Clone, Copy)]
pub struct MinDomain {
    tie: BoundTieBreak,
}

impl MinDomain {
    pub fn new(tie: BoundTieBreak) -> Self {
        Self { tie }
    }
}

impl VariableSelector for MinDomain {
    fn select(&mut self, store: &DomainStore, candidates: &[VarId]) -> Option<VarId> {
        let mut best: Option<VarId> = None;
        for &var in candidates {
            let domain = store.domain(var);
            if domain.size() <= 1 {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let held = store.domain(current);
                    domain.size() < held.size()
                        || (domain.size() == held.size() && self.tie.prefers(domain, held))
                }
            };
            if better {
                best = Some(var);
            }
        }
        best
    }
}

/// Picks a uniformly random unbound candidate.
#[derive(Debug, Clone)]
pub struct RandomUnbound {
    rng: StdRng,
}

impl RandomUnbound {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl VariableSelector for RandomUnbound {
    fn select(&mut self, store: &DomainStore, candidates: &[VarId]) -> Option<VarId> {
        let unbound: SmallVec<[VarId; 32]> = candidates
            .iter()
            .copied()
            .filter(|&v| !store.is_bound(v))
            .collect();
        if unbound.is_empty() {
            return None;
        }
        Some(unbound[self.rng.random_range(0..unbound.len())])
    }
}

/// Builds the selector for a configured ordering.
pub fn variable_selector(ordering: VariableOrdering, seed: Option<u64>) -> Box<dyn VariableSelector> {
    match ordering {
        VariableOrdering::FirstUnbound => Box::new(FirstUnbound),
        VariableOrdering::MinDomainHighestMax => Box::new(MinDomain::new(BoundTieBreak::HighestMax)),
        VariableOrdering::MinDomainLowestMax => Box::new(MinDomain::new(BoundTieBreak::LowestMax)),
        VariableOrdering::MinDomainHighestMin => Box::new(MinDomain::new(BoundTieBreak::HighestMin)),
        VariableOrdering::MinDomainLowestMin => Box::new(MinDomain::new(BoundTieBreak::LowestMin)),
        VariableOrdering::Random => Box::new(RandomUnbound::new(seed)),
    }
}

/// Values of `domain` in the order they should be tried.
pub fn ordered_values(ordering: ValueOrdering, domain: &Domain) -> SmallVec<[i64; 2]> {
    let mut values: SmallVec<[i64; 2]> = domain.iter().collect();
    if ordering == ValueOrdering::PreferOne {
        values.reverse();
    }
    values
}
