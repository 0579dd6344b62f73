//! Domain store with trail-based backtracking.
//!
//! Every variable owns a finite, ordered set of admissible integers. Domains
//! only shrink between a [`DomainStore::snapshot`] and the matching
//! [`DomainStore::restore`]; each variable's old domain is written to the
//! trail at most once per snapshot level, so restoring costs
//! O(changed variables) rather than a full copy.

use std::fmt;

use smallvec::SmallVec;

use crate::error::Conflict;

/// Identifier of a variable in a [`DomainStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Bit set over `base..base + 64 * bits.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Holes {
    base: i64,
    bits: SmallVec<[u64; 2]>,
}

impl Holes {
    fn test(&self, value: i64) -> bool {
        let Ok(idx) = usize::try_from(value - self.base) else {
            return false;
        };
        self.bits
            .get(idx / 64)
            .is_some_and(|word| (word >> (idx % 64)) & 1 == 1)
    }
}

/// A finite set of integers.
///
/// Stored as an interval; a bit set is materialized only once a value
/// strictly between the bounds is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    min: i64,
    max: i64,
    size: u64,
    holes: Option<Holes>,
}

impl Domain {
    /// The interval `lo..=hi`; empty when `lo > hi`.
    pub fn range(lo: i64, hi: i64) -> Self {
        if lo > hi {
            return Self::empty();
        }
        Self {
            min: lo,
            max: hi,
            size: hi.abs_diff(lo) + 1,
            holes: None,
        }
    }

    pub fn boolean() -> Self {
        Self::range(0, 1)
    }

    pub fn singleton(value: i64) -> Self {
        Self::range(value, value)
    }

    pub fn empty() -> Self {
        Self {
            min: 0,
            max: -1,
            size: 0,
            holes: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_bound(&self) -> bool {
        self.size == 1
    }

    /// The single remaining value, if bound.
    pub fn value(&self) -> Option<i64> {
        self.is_bound().then_some(self.min)
    }

    pub fn contains(&self, value: i64) -> bool {
        !self.is_empty()
            && value >= self.min
            && value <= self.max
            && self.holes.as_ref().map_or(true, |h| h.test(value))
    }

    /// Remaining values in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (self.min..=self.max).filter(move |&v| self.contains(v))
    }

    /// Intersection with `lo..=hi`.
    pub fn with_bounds(&self, lo: i64, hi: i64) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let mut min = self.min.max(lo);
        let mut max = self.max.min(hi);
        let Some(holes) = &self.holes else {
            return Self::range(min, max);
        };
        while min <= max && !holes.test(min) {
            min += 1;
        }
        while max >= min && !holes.test(max) {
            max -= 1;
        }
        if min > max {
            return Self::empty();
        }
        let size = (min..=max).filter(|&v| holes.test(v)).count() as u64;
        Self {
            min,
            max,
            size,
            holes: Some(holes.clone()),
        }
    }

    /// The subset of values satisfying `keep`.
    pub fn retain(&self, mut keep: impl FnMut(i64) -> bool) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let span = self.max.abs_diff(self.min) as usize + 1;
        let mut bits: SmallVec<[u64; 2]> = SmallVec::from_elem(0, span.div_ceil(64));
        let mut first = None;
        let mut last = self.min;
        let mut size = 0u64;
        for v in self.iter() {
            if keep(v) {
                let idx = v.abs_diff(self.min) as usize;
                bits[idx / 64] |= 1u64 << (idx % 64);
                first.get_or_insert(v);
                last = v;
                size += 1;
            }
        }
        let Some(first) = first else {
            return Self::empty();
        };
        if size == self.size {
            return self.clone();
        }
        if last.abs_diff(first) + 1 == size {
            return Self::range(first, last);
        }
        Self {
            min: first,
            max: last,
            size,
            holes: Some(Holes {
                base: self.min,
                bits,
            }),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{{}}");
        }
        if self.holes.is_none() {
            return write!(f, "[{}..{}]", self.min, self.max);
        }
        let values: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", values.join(", "))
    }
}

/// Marks a point the store can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    trail_len: usize,
}

/// Owns the current domain of every variable.
#[derive(Debug, Default)]
pub struct DomainStore {
    domains: Vec<Domain>,
    trail: Vec<(VarId, Domain)>,
    // Epoch in which each variable last wrote its old domain to the trail.
    stamps: Vec<u64>,
    epoch: u64,
    epochs_issued: u64,
    changes: Vec<VarId>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable with the given initial domain.
    pub fn new_var(&mut self, domain: Domain) -> VarId {
        let id = VarId(self.domains.len() as u32);
        self.domains.push(domain);
        self.stamps.push(u64::MAX);
        id
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = VarId> {
        (0..self.domains.len() as u32).map(VarId)
    }

    pub fn domain(&self, var: VarId) -> &Domain {
        &self.domains[var.index()]
    }

    pub fn min(&self, var: VarId) -> i64 {
        self.domain(var).min()
    }

    pub fn max(&self, var: VarId) -> i64 {
        self.domain(var).max()
    }

    pub fn size(&self, var: VarId) -> u64 {
        self.domain(var).size()
    }

    pub fn contains(&self, var: VarId, value: i64) -> bool {
        self.domain(var).contains(value)
    }

    pub fn is_bound(&self, var: VarId) -> bool {
        self.domain(var).is_bound()
    }

    pub fn value(&self, var: VarId) -> Option<i64> {
        self.domain(var).value()
    }

    /// First variable whose domain is empty, if any.
    pub fn first_empty(&self) -> Option<VarId> {
        self.vars().find(|&v| self.domain(v).is_empty())
    }

    /// Values of every variable, or `None` if any is still unbound.
    pub fn values(&self) -> Option<Vec<i64>> {
        self.domains.iter().map(Domain::value).collect()
    }

    /// Keeps only the values satisfying `keep`.
    ///
    /// Returns whether the domain changed.
    pub fn restrict(&mut self, var: VarId, keep: impl FnMut(i64) -> bool) -> Result<bool, Conflict> {
        let next = self.domain(var).retain(keep);
        self.replace(var, next)
    }

    /// Intersects the domain with `lo..=hi`.
    pub fn restrict_bounds(&mut self, var: VarId, lo: i64, hi: i64) -> Result<bool, Conflict> {
        let current = self.domain(var);
        if !current.is_empty() && lo <= current.min() && hi >= current.max() {
            return Ok(false);
        }
        let next = current.with_bounds(lo, hi);
        self.replace(var, next)
    }

    /// Restricts the domain to `{value}`.
    pub fn assign(&mut self, var: VarId, value: i64) -> Result<bool, Conflict> {
        self.restrict_bounds(var, value, value)
    }

    /// Removes a single value.
    pub fn remove(&mut self, var: VarId, value: i64) -> Result<bool, Conflict> {
        if !self.contains(var, value) {
            return Ok(false);
        }
        let domain = self.domain(var);
        if let Some(next) = value.checked_add(1).filter(|_| value == domain.min()) {
            return self.restrict_bounds(var, next, i64::MAX);
        }
        if let Some(prev) = value.checked_sub(1).filter(|_| value == domain.max()) {
            return self.restrict_bounds(var, i64::MIN, prev);
        }
        self.restrict(var, |v| v != value)
    }

    fn replace(&mut self, var: VarId, next: Domain) -> Result<bool, Conflict> {
        let current = &self.domains[var.index()];
        if current.is_empty() {
            return Err(Conflict::Wipeout { var });
        }
        if next.size() == current.size() {
            return Ok(false);
        }
        self.save(var);
        let wiped = next.is_empty();
        self.domains[var.index()] = next;
        if wiped {
            return Err(Conflict::Wipeout { var });
        }
        self.changes.push(var);
        Ok(true)
    }

    fn save(&mut self, var: VarId) {
        let idx = var.index();
        if self.stamps[idx] != self.epoch {
            self.trail.push((var, self.domains[idx].clone()));
            self.stamps[idx] = self.epoch;
        }
    }

    fn next_epoch(&mut self) {
        self.epochs_issued += 1;
        self.epoch = self.epochs_issued;
    }

    /// Marks the current state for a later [`DomainStore::restore`].
    pub fn snapshot(&mut self) -> Snapshot {
        self.next_epoch();
        Snapshot {
            trail_len: self.trail.len(),
        }
    }

    /// Rolls every domain back to its state at `snapshot`.
    ///
    /// A snapshot can be restored any number of times while no older
    /// snapshot has been restored in between.
    pub fn restore(&mut self, snapshot: Snapshot) {
        while self.trail.len() > snapshot.trail_len {
            if let Some((var, domain)) = self.trail.pop() {
                self.domains[var.index()] = domain;
            }
        }
        self.changes.clear();
        self.next_epoch();
    }

    /// Drains the variables modified since the last call.
    pub fn take_changes(&mut self) -> Vec<VarId> {
        std::mem::take(&mut self.changes)
    }

    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
