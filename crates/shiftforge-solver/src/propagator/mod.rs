//! Hard-constraint propagators.
//!
//! A propagator removes values that cannot take part in any solution of its
//! constraint, or reports a [`Conflict`]. Propagators keep no state of their
//! own: everything they know is read back from the [`DomainStore`], so
//! backtracking only has to restore domains.

mod all_different;
mod allowed;
mod sum;

use std::fmt::Debug;

use crate::error::Conflict;
use crate::store::{DomainStore, VarId};

pub use all_different::{AllDifferentExceptSentinel, SlotCells};
pub use allowed::AllowedSet;
pub use sum::{SumEquals, SumKind};

/// A constraint that narrows domains.
pub trait Propagator: Send + Debug {
    /// Short name used in conflicts and logs.
    fn name(&self) -> &'static str;

    /// Variables whose changes should wake this propagator.
    fn variables(&self) -> &[VarId];

    /// Narrows domains until this propagator alone can prune no further,
    /// or fails.
    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict>;

    /// Checks the constraint on a store where every variable it reads is
    /// bound.
    fn is_satisfied(&self, store: &DomainStore) -> bool;
}
