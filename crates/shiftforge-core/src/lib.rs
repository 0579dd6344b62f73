//! Core types for ShiftForge
//!
//! This crate holds the typed contract between input loaders, the solver and
//! reporters:
//! - [`Worker`], [`Requirement`], [`ScheduleInput`]: the problem data
//! - [`SoftConstraintSpec`] and [`SoftRule`]: penalized preferences
//! - [`ScheduleResult`]: what a solve call returns
//! - [`ShiftForgeError`]: the error taxonomy
//!
//! Serialization is behind the `serde` feature.

pub mod constraint;
pub mod domain;
pub mod error;
pub mod report;
pub mod validation;

pub use constraint::{Comparison, Locator, RuleKind, SoftConstraintSpec, SoftRule};
pub use domain::{LeaveRequest, Requirement, ScheduleInput, Worker, SENTINEL_SHIFT, SENTINEL_TASK};
pub use error::{Result, ShiftForgeError};
pub use report::{
    AssignmentRecord, ScheduleResult, SearchStatistics, SearchStatus, ViolationRecord,
};
pub use validation::validate;
