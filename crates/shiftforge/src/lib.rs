//! ShiftForge - Worker Shift Scheduling
//!
//! Hand a [`ScheduleInput`] to a [`Scheduler`] and get back the cheapest
//! schedule the search could prove or find within its time budget.
//!
//! # Example
//!
//! ```rust
//! use shiftforge::prelude::*;
//!
//! let input = ScheduleInput::new(["-", "Desk"], ["-", "Day", "Night"], 1)
//!     .with_worker(Worker::new("ann").with_tasks([1]).with_shifts([1, 2]))
//!     .with_requirement(0, 1, 2, 1)
//!     .with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, 30));
//!
//! let result = solve(&input, SolverConfig::default()).unwrap();
//! assert_eq!(result.cost, 30);
//! assert_eq!(result.violated.len(), 1);
//! ```

pub mod builder;
pub mod layout;
mod scheduler;

pub use builder::ScheduleModel;
pub use layout::{Cell, VariableLayout};
pub use scheduler::{solve, Scheduler};

pub use shiftforge_config::{
    PhaseConfig, PhaseSelection, SolverConfig, ValueOrdering, VariableOrdering,
};
pub use shiftforge_core::{
    AssignmentRecord, Comparison, LeaveRequest, Locator, Requirement, RuleKind, ScheduleInput,
    ScheduleResult, SearchStatistics, SearchStatus, ShiftForgeError, SoftConstraintSpec, SoftRule,
    ViolationRecord, Worker,
};

pub mod prelude {
    pub use super::{
        solve, Comparison, LeaveRequest, PhaseConfig, PhaseSelection, ScheduleInput,
        ScheduleResult, Scheduler, SearchStatus, ShiftForgeError, SoftConstraintSpec, SoftRule,
        SolverConfig, ValueOrdering, VariableOrdering, Worker,
    };
}
