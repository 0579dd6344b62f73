//! Soft rule specifications and violation locators.
//!
//! A [`SoftConstraintSpec`] is the external description of a penalized
//! preference. The facade expands it into one or more indicator
//! variables; each indicator carries a [`Locator`] so a violated rule can be
//! reported as `(rule kind, worker, day)`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a count comparison.
///
/// Used by rules whose violation test compares a count against a bound,
/// where the direction is a parameter rather than a fixed choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Comparison {
    /// `lhs < rhs`
    #[default]
    Less,
    /// `lhs <= rhs`
    LessOrEqual,
    /// `lhs > rhs`
    Greater,
    /// `lhs >= rhs`
    GreaterOrEqual,
}

impl Comparison {
    /// Evaluates `lhs <cmp> rhs`.
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessOrEqual => lhs <= rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Less => write!(f, "<"),
            Comparison::LessOrEqual => write!(f, "<="),
            Comparison::Greater => write!(f, ">"),
            Comparison::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// The family a soft rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RuleKind {
    ShiftNotEqual,
    ShiftExact,
    ShiftSequence,
    AllowedShiftSet,
    MaxConsecutiveWorkingDays,
    MinNonWorkingDays,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::ShiftNotEqual => "ShiftNotEqual",
            RuleKind::ShiftExact => "ShiftExact",
            RuleKind::ShiftSequence => "ShiftSequence",
            RuleKind::AllowedShiftSet => "AllowedShiftSet",
            RuleKind::MaxConsecutiveWorkingDays => "MaxConsecutiveWorkingDays",
            RuleKind::MinNonWorkingDays => "MinNonWorkingDays",
        };
        write!(f, "{name}")
    }
}

/// Where a soft constraint applies: rule family, worker index and day.
///
/// For window rules `day` is the first day of the window; for sequence rules
/// it is the day the transition starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Locator {
    pub rule_kind: RuleKind,
    pub worker: usize,
    pub day: usize,
}

impl Locator {
    pub fn new(rule_kind: RuleKind, worker: usize, day: usize) -> Self {
        Self {
            rule_kind,
            worker,
            day,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (worker {}, day {})", self.rule_kind, self.worker, self.day)
    }
}

#[cfg(feature = "serde")]
fn default_present() -> bool {
    true
}

/// A parameterized soft rule.
///
/// Shift index 0 is the "not working" sentinel: a rule naming shift 0 talks
/// about the worker's day off rather than a concrete shift.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "params", rename_all = "snake_case")
)]
pub enum SoftRule {
    /// Violated if `worker` is scheduled into `shift` on `day`.
    ShiftNotEqual {
        worker: usize,
        day: usize,
        shift: usize,
    },

    /// With `present`, violated if `worker` is NOT scheduled into `shift` on
    /// `day`; without, violated if they are.
    ShiftExact {
        worker: usize,
        day: usize,
        shift: usize,
        #[cfg_attr(feature = "serde", serde(default = "default_present"))]
        present: bool,
    },

    /// Violated on every day `d` where `worker` works `from_shift` on `d`
    /// and `to_shift` on `d + 1`.
    ShiftSequence {
        worker: usize,
        from_shift: usize,
        to_shift: usize,
    },

    /// Violated on every day `worker` works a shift outside `shifts`.
    AllowedShiftSet { worker: usize, shifts: Vec<usize> },

    /// Violated for every window of `max_days + 1` consecutive days in which
    /// the worker works more than `max_days` days. `worker: None` applies the
    /// rule to every worker.
    MaxConsecutiveWorkingDays {
        #[cfg_attr(feature = "serde", serde(default))]
        worker: Option<usize>,
        max_days: usize,
    },

    /// Violated for every `window`-day span in which
    /// `non_working_days <violation> min_days` holds. `violation: None`
    /// falls back to the solver configuration's default comparison.
    MinNonWorkingDays {
        #[cfg_attr(feature = "serde", serde(default))]
        worker: Option<usize>,
        window: usize,
        min_days: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        violation: Option<Comparison>,
    },
}

impl SoftRule {
    /// Returns the rule family.
    pub fn kind(&self) -> RuleKind {
        match self {
            SoftRule::ShiftNotEqual { .. } => RuleKind::ShiftNotEqual,
            SoftRule::ShiftExact { .. } => RuleKind::ShiftExact,
            SoftRule::ShiftSequence { .. } => RuleKind::ShiftSequence,
            SoftRule::AllowedShiftSet { .. } => RuleKind::AllowedShiftSet,
            SoftRule::MaxConsecutiveWorkingDays { .. } => RuleKind::MaxConsecutiveWorkingDays,
            SoftRule::MinNonWorkingDays { .. } => RuleKind::MinNonWorkingDays,
        }
    }

    /// Returns the worker this rule is bound to, if it is bound to one.
    pub fn worker(&self) -> Option<usize> {
        match self {
            SoftRule::ShiftNotEqual { worker, .. }
            | SoftRule::ShiftExact { worker, .. }
            | SoftRule::ShiftSequence { worker, .. }
            | SoftRule::AllowedShiftSet { worker, .. } => Some(*worker),
            SoftRule::MaxConsecutiveWorkingDays { worker, .. }
            | SoftRule::MinNonWorkingDays { worker, .. } => *worker,
        }
    }
}

/// A soft rule together with its penalty weight.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftConstraintSpec {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub rule: SoftRule,
    pub penalty: i64,
}

impl SoftConstraintSpec {
    pub fn new(rule: SoftRule, penalty: i64) -> Self {
        Self { rule, penalty }
    }

    /// `worker` should not work `shift` on `day`.
    pub fn shift_not_equal(worker: usize, day: usize, shift: usize, penalty: i64) -> Self {
        Self::new(SoftRule::ShiftNotEqual { worker, day, shift }, penalty)
    }

    /// `worker` should work `shift` on `day`.
    pub fn shift_exact(worker: usize, day: usize, shift: usize, penalty: i64) -> Self {
        Self::new(
            SoftRule::ShiftExact {
                worker,
                day,
                shift,
                present: true,
            },
            penalty,
        )
    }

    /// `worker` should not follow `from_shift` with `to_shift` the next day.
    pub fn shift_sequence(worker: usize, from_shift: usize, to_shift: usize, penalty: i64) -> Self {
        Self::new(
            SoftRule::ShiftSequence {
                worker,
                from_shift,
                to_shift,
            },
            penalty,
        )
    }

    /// `worker` should only work shifts in `shifts`.
    pub fn allowed_shifts(worker: usize, shifts: Vec<usize>, penalty: i64) -> Self {
        Self::new(SoftRule::AllowedShiftSet { worker, shifts }, penalty)
    }

    /// Nobody should work more than `max_days` days in a row.
    pub fn max_consecutive_working_days(max_days: usize, penalty: i64) -> Self {
        Self::new(
            SoftRule::MaxConsecutiveWorkingDays {
                worker: None,
                max_days,
            },
            penalty,
        )
    }

    /// Everybody should get at least `min_days` off in every `window` days.
    pub fn min_non_working_days(window: usize, min_days: usize, penalty: i64) -> Self {
        Self::new(
            SoftRule::MinNonWorkingDays {
                worker: None,
                window,
                min_days,
                violation: None,
            },
            penalty,
        )
    }

    pub fn kind(&self) -> RuleKind {
        self.rule.kind()
    }
}
