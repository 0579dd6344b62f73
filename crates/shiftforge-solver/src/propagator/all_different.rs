//! All-different-except-sentinel over one day.
//!
//! Every seat of every non-sentinel slot on a day must be filled by a
//! different worker. The check builds a maximum matching between workers
//! and slot seats (slot `s` has `min(count_s)` seats) with augmenting paths;
//! if the matching cannot cover every seat the day is infeasible, even when
//! each slot on its own still has enough candidates.

use crate::error::Conflict;
use crate::store::{DomainStore, VarId};

use super::Propagator;

/// The cells of one slot on the constrained day.
#[derive(Debug, Clone)]
pub struct SlotCells {
    /// Number of workers the slot needs.
    pub count: VarId,
    /// `(worker index, cell variable)` pairs.
    pub cells: Vec<(usize, VarId)>,
}

/// Distinct workers across all slots of one day.
#[derive(Debug, Clone)]
pub struct AllDifferentExceptSentinel {
    workers: usize,
    slots: Vec<SlotCells>,
    watched: Vec<VarId>,
}

impl AllDifferentExceptSentinel {
    pub fn new(workers: usize, slots: Vec<SlotCells>) -> Self {
        let watched = slots
            .iter()
            .flat_map(|s| s.cells.iter().map(|&(_, v)| v).chain([s.count]))
            .collect();
        Self {
            workers,
            slots,
            watched,
        }
    }

    fn conflict() -> Conflict {
        Conflict::Infeasible {
            propagator: "all_different_except_sentinel",
        }
    }
}

struct Matching {
    adjacency: Vec<Vec<usize>>,
    capacity: Vec<usize>,
    matched: Vec<Vec<usize>>,
}

impl Matching {
    // Places `worker`, possibly moving already placed workers along an
    // augmenting path.
    fn augment(&mut self, worker: usize, visited: &mut [bool]) -> bool {
        for i in 0..self.adjacency[worker].len() {
            let slot = self.adjacency[worker][i];
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            if self.matched[slot].len() < self.capacity[slot] {
                self.matched[slot].push(worker);
                return true;
            }
            for j in 0..self.matched[slot].len() {
                let other = self.matched[slot][j];
                if self.augment(other, visited) {
                    self.matched[slot][j] = worker;
                    return true;
                }
            }
        }
        false
    }
}

impl Propagator for AllDifferentExceptSentinel {
    fn name(&self) -> &'static str {
        "all_different_except_sentinel"
    }

    fn variables(&self) -> &[VarId] {
        &self.watched
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let capacity: Vec<usize> = self
            .slots
            .iter()
            .map(|s| usize::try_from(store.min(s.count)).unwrap_or(0))
            .collect();
        let seats = capacity.iter().fold(0usize, |acc, &c| acc.saturating_add(c));
        if seats == 0 {
            return Ok(());
        }

        let mut adjacency = vec![Vec::new(); self.workers];
        let mut forced: Vec<Option<usize>> = vec![None; self.workers];
        for (s, slot) in self.slots.iter().enumerate() {
            for &(w, cell) in &slot.cells {
                if store.min(cell) == 1 {
                    if forced[w].is_some() {
                        return Err(Self::conflict());
                    }
                    forced[w] = Some(s);
                }
                if store.contains(cell, 1) {
                    adjacency[w].push(s);
                }
            }
        }
        for (w, slot) in forced.iter().enumerate() {
            if let Some(s) = *slot {
                adjacency[w] = vec![s];
            }
        }

        let candidates = adjacency.iter().filter(|a| !a.is_empty()).count();
        if candidates < seats {
            return Err(Self::conflict());
        }

        let mut matching = Matching {
            adjacency,
            matched: vec![Vec::new(); capacity.len()],
            capacity,
        };
        let mut visited = vec![false; self.slots.len()];
        let mut placed = 0;
        for w in 0..self.workers {
            if placed == seats {
                break;
            }
            visited.iter_mut().for_each(|v| *v = false);
            if matching.augment(w, &mut visited) {
                placed += 1;
            }
        }

        if placed < seats {
            return Err(Self::conflict());
        }
        Ok(())
    }

    fn is_satisfied(&self, store: &DomainStore) -> bool {
        let mut used = vec![false; self.workers];
        for slot in &self.slots {
            for &(w, cell) in &slot.cells {
                match store.value(cell) {
                    Some(1) if used[w] => return false,
                    Some(1) => used[w] = true,
                    Some(_) => {}
                    None => return false,
                }
            }
        }
        true
    }
}
