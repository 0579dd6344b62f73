//! Result structures handed back to reporters.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constraint::RuleKind;

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStatus {
    /// The whole tree was explored; the returned cost is optimal.
    Exhausted,
    /// The time budget ran out; the returned solution is best-so-far.
    TimedOut,
    /// No feasible assignment exists.
    Infeasible,
}

impl SearchStatus {
    /// Returns true if the reported cost is proven optimal.
    pub fn is_optimal(self) -> bool {
        matches!(self, SearchStatus::Exhausted)
    }
}

/// One worker placed into one (task, shift, day) slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssignmentRecord {
    pub day: usize,
    pub task: usize,
    pub shift: usize,
    /// Worker index into the input roster.
    pub worker: usize,
    pub worker_id: String,
}

/// A soft rule the returned solution violates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ViolationRecord {
    pub constraint_id: usize,
    pub rule_kind: RuleKind,
    pub worker: usize,
    pub worker_id: String,
    pub day: usize,
    pub penalty: i64,
}

/// Counters gathered during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SearchStatistics {
    pub nodes: u64,
    pub failures: u64,
    pub bound_prunes: u64,
    pub backtracks: u64,
    pub solutions_offered: u64,
    pub improvements: u64,
    pub max_depth: u64,
    pub propagator_runs: u64,
    pub elapsed_millis: u64,
}

impl SearchStatistics {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_millis)
    }
}

/// The outcome of one solve call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScheduleResult {
    pub solution_found: bool,
    pub cost: i64,
    pub assignments: Vec<AssignmentRecord>,
    pub violated: Vec<ViolationRecord>,
    pub search_status: SearchStatus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statistics: SearchStatistics,
}

impl ScheduleResult {
    /// A result carrying no solution.
    pub fn empty(search_status: SearchStatus, statistics: SearchStatistics) -> Self {
        Self {
            solution_found: false,
            cost: 0,
            assignments: Vec::new(),
            violated: Vec::new(),
            search_status,
            statistics,
        }
    }

    /// Assignments of one worker, in day order.
    pub fn assignments_of(&self, worker: usize) -> impl Iterator<Item = &AssignmentRecord> {
        self.assignments.iter().filter(move |a| a.worker == worker)
    }

    /// Workers placed on one slot.
    pub fn workers_on(&self, day: usize, task: usize, shift: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .filter(|a| a.day == day && a.task == task && a.shift == shift)
            .map(|a| a.worker)
            .collect()
    }

    /// The (task, shift) a worker holds on `day`, if any.
    pub fn cell_of(&self, worker: usize, day: usize) -> Option<(usize, usize)> {
        self.assignments
            .iter()
            .find(|a| a.worker == worker && a.day == day)
            .map(|a| (a.task, a.shift))
    }
}
