//! ShiftForge Solver Engine
//!
//! This crate provides the constraint engine behind the scheduler:
//! - Domain store with trail-based snapshots
//! - Hard propagators and the constraint registry
//! - Reified soft constraints and the cost model
//! - Fixpoint propagation engine
//! - Depth-first branch and bound with staged orderings
//! - Time termination and search statistics

pub mod collector;
pub mod cost;
pub mod error;
pub mod model;
pub mod propagation;
pub mod propagator;
pub mod search;
pub mod solver;
pub mod stats;
pub mod store;
pub mod termination;

pub use collector::{Solution, SolutionCollector};
pub use cost::{Condition, CostModel, CostSum, Reification, SoftConstraint, Truth};
pub use error::Conflict;
pub use model::{ConstraintRegistry, Model, ModelBuilder, PropagatorId};
pub use propagation::{PropagationEngine, PropagationState};
pub use propagator::{
    AllDifferentExceptSentinel, AllowedSet, Propagator, SlotCells, SumEquals, SumKind,
};
pub use search::{
    BranchAndBound, SearchOutcome, SearchStage, SearchState, StagePlan, VariableSelector,
};
pub use solver::{SolveOutcome, Solver};
pub use stats::SearchStats;
pub use store::{Domain, DomainStore, Snapshot, VarId};
pub use termination::TimeTermination;
