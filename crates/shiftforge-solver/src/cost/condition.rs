//! Typed violation predicates over variable values.

use shiftforge_core::Comparison;

use crate::store::{DomainStore, VarId};

/// Three-valued result of evaluating a [`Condition`] on a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }
}

/// When a soft constraint counts as violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `#{v in vars : v == value} <cmp> threshold`
    Count {
        vars: Vec<VarId>,
        value: i64,
        cmp: Comparison,
        threshold: i64,
    },
    /// Every sub-condition holds.
    All(Vec<Condition>),
}

impl Condition {
    /// At least one of `vars` equals `value`.
    pub fn any_equal(vars: Vec<VarId>, value: i64) -> Self {
        Condition::Count {
            vars,
            value,
            cmp: Comparison::GreaterOrEqual,
            threshold: 1,
        }
    }

    /// None of `vars` equals `value`.
    pub fn none_equal(vars: Vec<VarId>, value: i64) -> Self {
        Condition::Count {
            vars,
            value,
            cmp: Comparison::Less,
            threshold: 1,
        }
    }

    pub fn count(vars: Vec<VarId>, value: i64, cmp: Comparison, threshold: i64) -> Self {
        Condition::Count {
            vars,
            value,
            cmp,
            threshold,
        }
    }

    /// Variables the condition reads.
    pub fn variables(&self) -> Vec<VarId> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<VarId>) {
        match self {
            Condition::Count { vars, .. } => out.extend_from_slice(vars),
            Condition::All(parts) => parts.iter().for_each(|p| p.collect_vars(out)),
        }
    }

    /// Decides the condition where the current domains allow it.
    pub fn evaluate(&self, store: &DomainStore) -> Truth {
        match self {
            Condition::Count {
                vars,
                value,
                cmp,
                threshold,
            } => {
                let mut certain = 0i64;
                let mut possible = 0i64;
                for &v in vars {
                    if store.contains(v, *value) {
                        possible += 1;
                        if store.is_bound(v) {
                            certain += 1;
                        }
                    }
                }
                // The comparisons are monotone, so the interval
                // [certain, possible] decides at its end points.
                match (cmp.holds(certain, *threshold), cmp.holds(possible, *threshold)) {
                    (true, true) => Truth::True,
                    (false, false) => Truth::False,
                    _ => Truth::Unknown,
                }
            }
            Condition::All(parts) => parts
                .iter()
                .fold(Truth::True, |acc, p| acc.and(p.evaluate(store))),
        }
    }

    /// Evaluates the condition on a complete assignment.
    pub fn holds(&self, values: &[i64]) -> bool {
        match self {
            Condition::Count {
                vars,
                value,
                cmp,
                threshold,
            } => {
                let n = vars.iter().filter(|v| values[v.index()] == *value).count() as i64;
                cmp.holds(n, *threshold)
            }
            Condition::All(parts) => parts.iter().all(|p| p.holds(values)),
        }
    }
}
