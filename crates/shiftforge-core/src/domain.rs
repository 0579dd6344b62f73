//! Input data model: workers, requirements and the schedule problem.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constraint::{SoftConstraintSpec, SoftRule};

/// Index of the reserved "unassigned" task.
pub const SENTINEL_TASK: usize = 0;

/// Index of the reserved "not working" shift.
pub const SENTINEL_SHIFT: usize = 0;

/// A worker that can be placed into (task, shift, day) slots.
///
/// Immutable once loaded. `priority` orders branching (lower first) and
/// `affinity` breaks ties between equal priorities; neither changes cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Worker {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub allowed_tasks: BTreeSet<usize>,
    pub allowed_shifts: BTreeSet<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affinity: BTreeMap<usize, i32>,
}

impl Worker {
    /// Creates a worker with no allowed tasks or shifts.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            allowed_tasks: BTreeSet::new(),
            allowed_shifts: BTreeSet::new(),
            priority: 0,
            affinity: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = usize>) -> Self {
        self.allowed_tasks.extend(tasks);
        self
    }

    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = usize>) -> Self {
        self.allowed_shifts.extend(shifts);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_affinity(mut self, task: usize, score: i32) -> Self {
        self.affinity.insert(task, score);
        self
    }

    /// Returns true if the worker may be placed into `(task, shift)`.
    pub fn can_work(&self, task: usize, shift: usize) -> bool {
        self.allowed_tasks.contains(&task) && self.allowed_shifts.contains(&shift)
    }

    /// Affinity score for `task`, 0 when none was declared.
    pub fn affinity_for(&self, task: usize) -> i32 {
        self.affinity.get(&task).copied().unwrap_or(0)
    }
}

/// Exact number of workers needed on one (day, task, shift) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Requirement {
    pub day: usize,
    pub task: usize,
    pub shift: usize,
    pub count: i64,
}

impl Requirement {
    pub fn new(day: usize, task: usize, shift: usize, count: i64) -> Self {
        Self {
            day,
            task,
            shift,
            count,
        }
    }

    pub fn slot(&self) -> (usize, usize, usize) {
        (self.day, self.task, self.shift)
    }
}

/// A worker asking not to work a given day, or a given shift on that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeaveRequest {
    pub worker: usize,
    pub day: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shift: Option<usize>,
    pub penalty: i64,
}

impl LeaveRequest {
    /// The soft rule this request expands into.
    ///
    /// A request without a shift asks for the whole day off, which is the
    /// same as asking to be placed on the sentinel shift.
    pub fn to_spec(&self) -> SoftConstraintSpec {
        let rule = match self.shift {
            Some(shift) => SoftRule::ShiftNotEqual {
                worker: self.worker,
                day: self.day,
                shift,
            },
            None => SoftRule::ShiftExact {
                worker: self.worker,
                day: self.day,
                shift: SENTINEL_SHIFT,
                present: true,
            },
        };
        SoftConstraintSpec::new(rule, self.penalty)
    }
}

/// A complete scheduling problem as supplied by an input loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScheduleInput {
    /// Task display names; index 0 is the sentinel.
    pub task_names: Vec<String>,
    /// Shift display names; index 0 is the sentinel.
    pub shift_names: Vec<String>,
    pub workers: Vec<Worker>,
    pub requirements: Vec<Requirement>,
    pub horizon_days: usize,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "softConstraintSpecs", alias = "softConstraints")
    )]
    pub soft_constraints: Vec<SoftConstraintSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub leave_requests: Vec<LeaveRequest>,
}

impl ScheduleInput {
    /// Creates an empty problem over the given name tables.
    pub fn new<T, S>(task_names: T, shift_names: S, horizon_days: usize) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            task_names: task_names.into_iter().map(Into::into).collect(),
            shift_names: shift_names.into_iter().map(Into::into).collect(),
            horizon_days,
            ..Self::default()
        }
    }

    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    pub fn with_requirement(mut self, day: usize, task: usize, shift: usize, count: i64) -> Self {
        self.requirements
            .push(Requirement::new(day, task, shift, count));
        self
    }

    pub fn with_soft_constraint(mut self, spec: SoftConstraintSpec) -> Self {
        self.soft_constraints.push(spec);
        self
    }

    pub fn with_leave_request(mut self, request: LeaveRequest) -> Self {
        self.leave_requests.push(request);
        self
    }

    pub fn task_count(&self) -> usize {
        self.task_names.len()
    }

    pub fn shift_count(&self) -> usize {
        self.shift_names.len()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Requirement count for a slot; slots without a row need nobody.
    pub fn required(&self, day: usize, task: usize, shift: usize) -> i64 {
        self.requirements
            .iter()
            .find(|r| r.slot() == (day, task, shift))
            .map(|r| r.count)
            .unwrap_or(0)
    }

    /// Sum of all requirement counts on `day`.
    pub fn day_total(&self, day: usize) -> i64 {
        self.requirements
            .iter()
            .filter(|r| r.day == day)
            .fold(0i64, |acc, r| acc.saturating_add(r.count))
    }

    /// Every soft rule, explicit ones first, then expanded leave requests.
    pub fn all_soft_constraints(&self) -> Vec<SoftConstraintSpec> {
        self.soft_constraints
            .iter()
            .cloned()
            .chain(self.leave_requests.iter().map(LeaveRequest::to_spec))
            .collect()
    }
}
