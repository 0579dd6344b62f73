//! Translation of a [`ScheduleInput`] into a solver [`Model`].

use shiftforge_config::{PhaseSelection, SolverConfig};
use shiftforge_core::{
    Comparison, Locator, Result, RuleKind, ScheduleInput, ShiftForgeError, SoftRule,
    SENTINEL_SHIFT,
};
use shiftforge_solver::{
    AllDifferentExceptSentinel, AllowedSet, Condition, Model, ModelBuilder, SearchStage, SlotCells,
    StagePlan, SumEquals, VarId,
};
use tracing::debug;

use crate::layout::VariableLayout;

/// A built model together with the layout that explains its variables.
#[derive(Debug)]
pub struct ScheduleModel {
    pub model: Model,
    pub layout: VariableLayout,
}

impl ScheduleModel {
    /// Builds the model for an already validated input.
    pub fn build(input: &ScheduleInput, config: &SolverConfig) -> Self {
        let mut builder = ModelBuilder::new();
        let layout = VariableLayout::create(input, &mut builder);

        post_hard_rules(input, &layout, &mut builder);

        let mut soft = SoftRules {
            input,
            layout: &layout,
            builder: &mut builder,
            default_violation: config.min_non_working_violation,
        };
        for spec in input.all_soft_constraints() {
            soft.expand(&spec.rule, spec.penalty);
        }

        let model = builder.build();
        debug!(
            event = "model_built",
            cells = layout.cells().len(),
            variables = model.var_count(),
            propagators = model.registry.len(),
            soft_constraints = model.cost.constraints().len(),
        );
        Self { model, layout }
    }

    /// Turns the configured phases into search stages.
    ///
    /// Phases naming days, tasks, shifts or workers outside the input fail
    /// with [`ShiftForgeError::Config`].
    pub fn stages(&self, input: &ScheduleInput, config: &SolverConfig) -> Result<Vec<SearchStage>> {
        let mut plan = StagePlan::new(config);
        for (i, phase) in config.phases.iter().enumerate() {
            check_selection(i, &phase.select, input)?;
            let vars: Vec<VarId> = self
                .layout
                .cells()
                .iter()
                .filter(|c| phase.select.matches(c.worker, c.task, c.shift, c.day))
                .map(|c| c.var)
                .collect();
            plan = plan.stage(vars, phase.variable_ordering, phase.value_ordering);
        }
        Ok(plan.finish(self.model.decision_vars()))
    }
}

fn check_selection(phase: usize, select: &PhaseSelection, input: &ScheduleInput) -> Result<()> {
    let (what, indices, limit) = match select {
        PhaseSelection::All => return Ok(()),
        PhaseSelection::Days { days } => ("day", days, input.horizon_days),
        PhaseSelection::Tasks { tasks } => ("task", tasks, input.task_count()),
        PhaseSelection::Shifts { shifts } => ("shift", shifts, input.shift_count()),
        PhaseSelection::Workers { workers } => ("worker", workers, input.worker_count()),
    };
    match indices.iter().find(|&&i| i >= limit) {
        Some(bad) => Err(ShiftForgeError::Config(format!(
            "phase {phase} selects unknown {what} {bad}"
        ))),
        None => Ok(()),
    }
}

fn post_hard_rules(input: &ScheduleInput, layout: &VariableLayout, builder: &mut ModelBuilder) {
    let forbidden = layout
        .cells()
        .iter()
        .filter(|c| !input.workers[c.worker].can_work(c.task, c.shift))
        .map(|c| c.var)
        .collect::<Vec<_>>();
    if !forbidden.is_empty() {
        builder.post(AllowedSet::new(forbidden));
    }

    for day in 0..layout.days() {
        for worker in 0..layout.workers() {
            builder.post(SumEquals::channel(
                layout.worker_day(worker, day),
                layout.working(worker, day),
            ));
        }

        let mut slots = Vec::new();
        for task in 1..input.task_count() {
            for shift in 1..input.shift_count() {
                let Some(count) = layout.count(day, task, shift) else {
                    continue;
                };
                let cells = layout.slot(day, task, shift);
                builder.post(SumEquals::exact_count(
                    cells.iter().map(|&(_, v)| v).collect(),
                    count,
                ));
                slots.push(SlotCells { count, cells });
            }
        }

        builder.post(SumEquals::day_total(layout.day(day), layout.total(day)));
        builder.post(AllDifferentExceptSentinel::new(layout.workers(), slots));
    }
}

// Expands soft rules into reified conditions.
struct SoftRules<'a> {
    input: &'a ScheduleInput,
    layout: &'a VariableLayout,
    builder: &'a mut ModelBuilder,
    default_violation: Comparison,
}

impl SoftRules<'_> {
    fn expand(&mut self, rule: &SoftRule, penalty: i64) {
        let kind = rule.kind();
        match *rule {
            SoftRule::ShiftNotEqual { worker, day, shift } => {
                let on = self.on_shift(worker, day, shift);
                self.add(on, penalty, kind, worker, day);
            }
            SoftRule::ShiftExact {
                worker,
                day,
                shift,
                present,
            } => {
                let condition = if present {
                    self.off_shift(worker, day, shift)
                } else {
                    self.on_shift(worker, day, shift)
                };
                self.add(condition, penalty, kind, worker, day);
            }
            SoftRule::ShiftSequence {
                worker,
                from_shift,
                to_shift,
            } => {
                for day in 0..self.layout.days().saturating_sub(1) {
                    let condition = Condition::All(vec![
                        self.on_shift(worker, day, from_shift),
                        self.on_shift(worker, day + 1, to_shift),
                    ]);
                    self.add(condition, penalty, kind, worker, day);
                }
            }
            SoftRule::AllowedShiftSet { worker, ref shifts } => {
                let outside: Vec<usize> = (1..self.input.shift_count())
                    .filter(|s| !shifts.contains(s))
                    .collect();
                if outside.is_empty() {
                    return;
                }
                for day in 0..self.layout.days() {
                    let cells = self.layout.worker_day_shifts(worker, day, &outside);
                    self.add(Condition::any_equal(cells, 1), penalty, kind, worker, day);
                }
            }
            SoftRule::MaxConsecutiveWorkingDays { worker, max_days } => {
                let days = self.layout.days();
                let Some(span) = max_days.checked_add(1).filter(|&span| span <= days) else {
                    return;
                };
                for w in self.targets(worker) {
                    for start in 0..=days - span {
                        let vars = self.layout.working_span(w, start..start + span);
                        let condition =
                            Condition::count(vars, 1, Comparison::Greater, max_days as i64);
                        self.add(condition, penalty, kind, w, start);
                    }
                }
            }
            SoftRule::MinNonWorkingDays {
                worker,
                window,
                min_days,
                violation,
            } => {
                let days = self.layout.days();
                let span = window.min(days);
                let cmp = violation.unwrap_or(self.default_violation);
                let limit = i64::try_from(min_days).unwrap_or(i64::MAX);
                for w in self.targets(worker) {
                    for start in 0..=days - span {
                        let vars = self.layout.working_span(w, start..start + span);
                        let condition = Condition::count(vars, 0, cmp, limit);
                        self.add(condition, penalty, kind, w, start);
                    }
                }
            }
        }
    }

    fn targets(&self, worker: Option<usize>) -> Vec<usize> {
        match worker {
            Some(w) => vec![w],
            None => (0..self.layout.workers()).collect(),
        }
    }

    // Holds when `worker` is on `shift` that day; shift 0 means off.
    fn on_shift(&self, worker: usize, day: usize, shift: usize) -> Condition {
        if shift == SENTINEL_SHIFT {
            Condition::any_equal(vec![self.layout.working(worker, day)], 0)
        } else {
            Condition::any_equal(self.layout.worker_day_shifts(worker, day, &[shift]), 1)
        }
    }

    fn off_shift(&self, worker: usize, day: usize, shift: usize) -> Condition {
        if shift == SENTINEL_SHIFT {
            Condition::any_equal(vec![self.layout.working(worker, day)], 1)
        } else {
            Condition::none_equal(self.layout.worker_day_shifts(worker, day, &[shift]), 1)
        }
    }

    fn add(&mut self, condition: Condition, penalty: i64, kind: RuleKind, worker: usize, day: usize) {
        self.builder
            .soft(condition, penalty, Locator::new(kind, worker, day));
    }
}
