//! Placement of assignment and derived variables.
//!
//! Assignment cells are created day-major, then by task, then by shift, and
//! within a slot by worker priority (lower first), higher task affinity,
//! then roster index. Sentinel tasks and shifts get no cells.

use std::collections::HashMap;
use std::ops::Range;

use shiftforge_core::{ScheduleInput, SENTINEL_SHIFT, SENTINEL_TASK};
use shiftforge_solver::{ModelBuilder, VarId};

/// One assignment variable and the tuple it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub worker: usize,
    pub task: usize,
    pub shift: usize,
    pub day: usize,
    pub var: VarId,
}

/// Index from `(worker, task, shift, day)` to model variables.
#[derive(Debug, Clone)]
pub struct VariableLayout {
    workers: usize,
    days: usize,
    cells: Vec<Cell>,
    by_tuple: HashMap<(usize, usize, usize, usize), usize>,
    // Cell indices per `worker * days + day`, in layout order.
    by_worker_day: Vec<Vec<usize>>,
    by_slot: HashMap<(usize, usize, usize), Vec<usize>>,
    day_ranges: Vec<Range<usize>>,
    working: Vec<VarId>,
    counts: HashMap<(usize, usize, usize), VarId>,
    totals: Vec<VarId>,
}

impl VariableLayout {
    /// Creates every variable of `input` in `builder`.
    ///
    /// Slot counts and day totals are created already fixed to their
    /// requirement.
    pub fn create(input: &ScheduleInput, builder: &mut ModelBuilder) -> Self {
        let workers = input.worker_count();
        let days = input.horizon_days;
        let mut cells = Vec::new();
        let mut by_tuple = HashMap::new();
        let mut by_worker_day = vec![Vec::new(); workers * days];
        let mut by_slot: HashMap<_, Vec<usize>> = HashMap::new();
        let mut day_ranges = Vec::with_capacity(days);

        for day in 0..days {
            let day_start = cells.len();
            for task in slot_range(input.task_count(), SENTINEL_TASK) {
                let order = priority_order(input, task);
                for shift in slot_range(input.shift_count(), SENTINEL_SHIFT) {
                    for &worker in &order {
                        let index = cells.len();
                        by_tuple.insert((worker, task, shift, day), index);
                        by_worker_day[worker * days + day].push(index);
                        by_slot.entry((day, task, shift)).or_default().push(index);
                        cells.push(Cell {
                            worker,
                            task,
                            shift,
                            day,
                            var: builder.decision_var(),
                        });
                    }
                }
            }
            day_ranges.push(day_start..cells.len());
        }

        let working = (0..workers * days).map(|_| builder.int_var(0, 1)).collect();

        let mut counts = HashMap::new();
        for day in 0..days {
            for task in slot_range(input.task_count(), SENTINEL_TASK) {
                for shift in slot_range(input.shift_count(), SENTINEL_SHIFT) {
                    let need = input.required(day, task, shift);
                    counts.insert((day, task, shift), builder.int_var(need, need));
                }
            }
        }

        let totals = (0..days)
            .map(|day| {
                let total = input.day_total(day);
                builder.int_var(total, total)
            })
            .collect();

        Self {
            workers,
            days,
            cells,
            by_tuple,
            by_worker_day,
            by_slot,
            day_ranges,
            working,
            counts,
            totals,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// All cells in layout order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, worker: usize, task: usize, shift: usize, day: usize) -> Option<&Cell> {
        self.by_tuple
            .get(&(worker, task, shift, day))
            .map(|&i| &self.cells[i])
    }

    /// Cells of one worker on one day.
    pub fn worker_day(&self, worker: usize, day: usize) -> Vec<VarId> {
        self.worker_day_cells(worker, day).map(|c| c.var).collect()
    }

    /// Cells of one worker on one day whose shift is in `shifts`.
    pub fn worker_day_shifts(&self, worker: usize, day: usize, shifts: &[usize]) -> Vec<VarId> {
        self.worker_day_cells(worker, day)
            .filter(|c| shifts.contains(&c.shift))
            .map(|c| c.var)
            .collect()
    }

    fn worker_day_cells(&self, worker: usize, day: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.by_worker_day
            .get(worker * self.days + day)
            .into_iter()
            .flatten()
            .map(|&i| &self.cells[i])
    }

    /// Cells of one slot as `(worker, var)` pairs.
    pub fn slot(&self, day: usize, task: usize, shift: usize) -> Vec<(usize, VarId)> {
        self.by_slot
            .get(&(day, task, shift))
            .into_iter()
            .flatten()
            .map(|&i| (self.cells[i].worker, self.cells[i].var))
            .collect()
    }

    /// Every cell on `day`.
    pub fn day(&self, day: usize) -> Vec<VarId> {
        self.day_ranges
            .get(day)
            .map(|r| self.cells[r.clone()].iter().map(|c| c.var).collect())
            .unwrap_or_default()
    }

    /// The 0/1 "works this day" variable.
    pub fn working(&self, worker: usize, day: usize) -> VarId {
        self.working[worker * self.days + day]
    }

    /// Working variables of `worker` over `days`.
    pub fn working_span(&self, worker: usize, days: Range<usize>) -> Vec<VarId> {
        days.map(|d| self.working(worker, d)).collect()
    }

    /// Count variable of a non-sentinel slot.
    pub fn count(&self, day: usize, task: usize, shift: usize) -> Option<VarId> {
        self.counts.get(&(day, task, shift)).copied()
    }

    pub fn total(&self, day: usize) -> VarId {
        self.totals[day]
    }
}

fn slot_range(len: usize, sentinel: usize) -> impl Iterator<Item = usize> {
    (0..len).filter(move |&i| i != sentinel)
}

// Worker indices in branching order for `task`.
fn priority_order(input: &ScheduleInput, task: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..input.worker_count()).collect();
    order.sort_by_key(|&w| {
        let worker = &input.workers[w];
        (worker.priority, std::cmp::Reverse(worker.affinity_for(task)), w)
    });
    order
}
