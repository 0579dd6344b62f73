//! Propagation failures.

use shiftforge_core::ShiftForgeError;
use thiserror::Error;

use crate::store::VarId;

/// Why a search node failed.
///
/// `Wipeout` and `Infeasible` are branch-local and recovered by
/// backtracking. `Inconsistent` means a derived-variable invariant broke and
/// is always fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Conflict {
    #[error("domain of {var} became empty")]
    Wipeout { var: VarId },

    #[error("propagator {propagator} found no support")]
    Infeasible { propagator: &'static str },

    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl Conflict {
    /// Returns true if the failure must abort the whole solve.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Conflict::Inconsistent(_))
    }
}

impl From<Conflict> for ShiftForgeError {
    fn from(conflict: Conflict) -> Self {
        match conflict {
            Conflict::Inconsistent(msg) => ShiftForgeError::InternalInconsistency(msg),
            other => ShiftForgeError::Infeasible(other.to_string()),
        }
    }
}
