//! Allowed-set rule: cells outside a worker's allowed tasks or shifts are 0.

use crate::error::Conflict;
use crate::store::{DomainStore, VarId};

use super::Propagator;

/// Forces every listed cell to 0.
#[derive(Debug, Clone)]
pub struct AllowedSet {
    forbidden: Vec<VarId>,
}

impl AllowedSet {
    pub fn new(forbidden: Vec<VarId>) -> Self {
        Self { forbidden }
    }

    pub fn forbidden(&self) -> &[VarId] {
        &self.forbidden
    }
}

impl Propagator for AllowedSet {
    fn name(&self) -> &'static str {
        "allowed_set"
    }

    fn variables(&self) -> &[VarId] {
        &self.forbidden
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        for &x in &self.forbidden {
            store.assign(x, 0)?;
        }
        Ok(())
    }

    fn is_satisfied(&self, store: &DomainStore) -> bool {
        self.forbidden.iter().all(|&x| store.value(x) == Some(0))
    }
}
