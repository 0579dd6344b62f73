//! Input validation run before any model is built.

use std::collections::HashSet;

use crate::constraint::{SoftConstraintSpec, SoftRule};
use crate::domain::{ScheduleInput, SENTINEL_SHIFT, SENTINEL_TASK};
use crate::error::{Result, ShiftForgeError};

/// Checks a problem for malformed or inconsistent data.
///
/// Returns the first problem found as [`ShiftForgeError::InvalidInput`].
pub fn validate(input: &ScheduleInput) -> Result<()> {
    if input.horizon_days == 0 {
        return Err(ShiftForgeError::invalid("horizon must span at least one day"));
    }
    if input.task_names.len() < 2 {
        return Err(ShiftForgeError::invalid(
            "task table needs the sentinel entry and at least one task",
        ));
    }
    if input.shift_names.len() < 2 {
        return Err(ShiftForgeError::invalid(
            "shift table needs the sentinel entry and at least one shift",
        ));
    }

    validate_workers(input)?;
    validate_requirements(input)?;

    for (id, spec) in input.soft_constraints.iter().enumerate() {
        validate_soft(input, id, spec)?;
    }
    for (i, leave) in input.leave_requests.iter().enumerate() {
        if leave.penalty < 0 {
            return Err(ShiftForgeError::invalid(format!(
                "leave request {i} has negative penalty {}",
                leave.penalty
            )));
        }
        check_worker(input, leave.worker, "leave request")?;
        check_day(input, leave.day, "leave request")?;
        if let Some(shift) = leave.shift {
            check_shift(input, shift, "leave request")?;
        }
    }
    validate_penalty_total(input)
}

fn validate_workers(input: &ScheduleInput) -> Result<()> {
    let mut seen = HashSet::new();
    for worker in &input.workers {
        if !seen.insert(worker.id.as_str()) {
            return Err(ShiftForgeError::invalid(format!(
                "duplicate worker id '{}'",
                worker.id
            )));
        }
        let context = format!("worker '{}'", worker.id);
        for &task in worker.allowed_tasks.iter().chain(worker.affinity.keys()) {
            check_task(input, task, &context)?;
        }
        for &shift in &worker.allowed_shifts {
            check_shift(input, shift, &context)?;
        }
    }
    Ok(())
}

fn validate_requirements(input: &ScheduleInput) -> Result<()> {
    let mut seen = HashSet::new();
    for req in &input.requirements {
        check_day(input, req.day, "requirement")?;
        check_task(input, req.task, "requirement")?;
        check_shift(input, req.shift, "requirement")?;
        if req.task == SENTINEL_TASK || req.shift == SENTINEL_SHIFT {
            return Err(ShiftForgeError::invalid(format!(
                "requirement on day {} targets the sentinel task or shift",
                req.day
            )));
        }
        if req.count < 0 {
            return Err(ShiftForgeError::invalid(format!(
                "requirement ({}, {}, {}) has negative count {}",
                req.day, req.task, req.shift, req.count
            )));
        }
        if !seen.insert(req.slot()) {
            return Err(ShiftForgeError::invalid(format!(
                "duplicate requirement for slot ({}, {}, {})",
                req.day, req.task, req.shift
            )));
        }
    }

    let mut totals = vec![0i64; input.horizon_days];
    for req in &input.requirements {
        totals[req.day] = totals[req.day].checked_add(req.count).ok_or_else(|| {
            ShiftForgeError::invalid(format!("requirement counts on day {} overflow", req.day))
        })?;
    }
    Ok(())
}

// Every indicator a rule can expand to firing at once must still fit the
// cost variable.
fn validate_penalty_total(input: &ScheduleInput) -> Result<()> {
    let days = input.horizon_days;
    let workers = input.worker_count();
    let overflow = || ShiftForgeError::invalid("total soft constraint penalty overflows");

    let mut total = 0i64;
    for spec in input.all_soft_constraints() {
        let indicators = match &spec.rule {
            SoftRule::ShiftNotEqual { .. } | SoftRule::ShiftExact { .. } => 1,
            SoftRule::ShiftSequence { .. } | SoftRule::AllowedShiftSet { .. } => days,
            SoftRule::MaxConsecutiveWorkingDays { worker, .. }
            | SoftRule::MinNonWorkingDays { worker, .. } => match worker {
                Some(_) => days,
                None => days.saturating_mul(workers),
            },
        };
        let indicators = i64::try_from(indicators).map_err(|_| overflow())?;
        let worst = spec.penalty.checked_mul(indicators).ok_or_else(overflow)?;
        total = total.checked_add(worst).ok_or_else(overflow)?;
    }
    Ok(())
}

fn validate_soft(input: &ScheduleInput, id: usize, spec: &SoftConstraintSpec) -> Result<()> {
    let context = format!("soft constraint {id} ({})", spec.kind());
    if spec.penalty < 0 {
        return Err(ShiftForgeError::invalid(format!(
            "{context} has negative penalty {}",
            spec.penalty
        )));
    }
    if let Some(worker) = spec.rule.worker() {
        check_worker(input, worker, &context)?;
    }
    match &spec.rule {
        SoftRule::ShiftNotEqual { day, shift, .. } | SoftRule::ShiftExact { day, shift, .. } => {
            check_day(input, *day, &context)?;
            check_shift(input, *shift, &context)?;
        }
        SoftRule::ShiftSequence {
            from_shift,
            to_shift,
            ..
        } => {
            check_shift(input, *from_shift, &context)?;
            check_shift(input, *to_shift, &context)?;
        }
        SoftRule::AllowedShiftSet { shifts, .. } => {
            for &shift in shifts {
                check_shift(input, shift, &context)?;
            }
        }
        SoftRule::MaxConsecutiveWorkingDays { .. } => {}
        SoftRule::MinNonWorkingDays {
            window, min_days, ..
        } => {
            if *window == 0 {
                return Err(ShiftForgeError::invalid(format!("{context} has a zero-length window")));
            }
            if min_days > window {
                return Err(ShiftForgeError::invalid(format!(
                    "{context} asks for {min_days} days off in a {window}-day window"
                )));
            }
        }
    }
    Ok(())
}

fn check_worker(input: &ScheduleInput, worker: usize, context: &str) -> Result<()> {
    if worker >= input.workers.len() {
        return Err(ShiftForgeError::invalid(format!(
            "{context} references unknown worker {worker}"
        )));
    }
    Ok(())
}

fn check_day(input: &ScheduleInput, day: usize, context: &str) -> Result<()> {
    if day >= input.horizon_days {
        return Err(ShiftForgeError::invalid(format!(
            "{context} references day {day} outside horizon of {} days",
            input.horizon_days
        )));
    }
    Ok(())
}

fn check_task(input: &ScheduleInput, task: usize, context: &str) -> Result<()> {
    if task >= input.task_names.len() {
        return Err(ShiftForgeError::invalid(format!(
            "{context} references unknown task {task}"
        )));
    }
    Ok(())
}

fn check_shift(input: &ScheduleInput, shift: usize, context: &str) -> Result<()> {
    if shift >= input.shift_names.len() {
        return Err(ShiftForgeError::invalid(format!(
            "{context} references unknown shift {shift}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeaveRequest, Worker};

    fn base() -> ScheduleInput {
        ScheduleInput::new(["-", "A"], ["-", "M", "N"], 2)
            .with_worker(Worker::new("w0").with_tasks([1]).with_shifts([1, 2]))
            .with_worker(Worker::new("w1").with_tasks([1]).with_shifts([1]))
            .with_requirement(0, 1, 1, 1)
    }

    fn assert_invalid(input: &ScheduleInput) {
        assert!(matches!(
            validate(input),
            Err(ShiftForgeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_valid_input() {
        assert!(validate(&base()).is_ok());
    }

    #[test]
    fn test_zero_horizon() {
        let mut input = base();
        input.horizon_days = 0;
        input.requirements.clear();
        assert_invalid(&input);
    }

    #[test]
    fn test_sentinel_only_tables() {
        let mut input = base();
        input.shift_names = vec!["-".into()];
        assert_invalid(&input);
    }

    #[test]
    fn test_requirement_day_out_of_horizon() {
        assert_invalid(&base().with_requirement(2, 1, 1, 1));
    }

    #[test]
    fn test_requirement_unknown_task_or_shift() {
        assert_invalid(&base().with_requirement(1, 5, 1, 1));
        assert_invalid(&base().with_requirement(1, 1, 3, 1));
    }

    #[test]
    fn test_requirement_on_sentinel() {
        assert_invalid(&base().with_requirement(1, 0, 1, 1));
        assert_invalid(&base().with_requirement(1, 1, 0, 1));
    }

    #[test]
    fn test_negative_and_duplicate_requirements() {
        assert_invalid(&base().with_requirement(1, 1, 1, -1));
        assert_invalid(&base().with_requirement(0, 1, 1, 2));
    }

    #[test]
    fn test_duplicate_worker_id() {
        assert_invalid(&base().with_worker(Worker::new("w0")));
    }

    #[test]
    fn test_worker_references_unknown_shift() {
        assert_invalid(&base().with_worker(Worker::new("w2").with_shifts([7])));
        assert_invalid(&base().with_worker(Worker::new("w2").with_affinity(9, 1)));
    }

    #[test]
    fn test_negative_penalty() {
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, -30)),
        );
        assert_invalid(&base().with_leave_request(LeaveRequest {
            worker: 0,
            day: 0,
            shift: None,
            penalty: -1,
        }));
    }

    #[test]
    fn test_soft_rule_references() {
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::shift_not_equal(4, 0, 2, 30)),
        );
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::shift_exact(0, 5, 1, 30)),
        );
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::shift_sequence(0, 2, 9, 30)),
        );
    }

    #[test]
    fn test_zero_window() {
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::min_non_working_days(0, 0, 10)),
        );
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::min_non_working_days(2, 3, 10)),
        );
    }

    #[test]
    fn test_day_total_overflow() {
        let input = base()
            .with_requirement(1, 1, 1, i64::MAX)
            .with_requirement(1, 1, 2, 1);
        assert_invalid(&input);
        assert!(validate(&base().with_requirement(1, 1, 1, i64::MAX)).is_ok());
    }

    #[test]
    fn test_penalty_total_overflow() {
        let big = i64::MAX / 2 + 1;
        assert!(validate(
            &base().with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, big))
        )
        .is_ok());
        assert_invalid(
            &base()
                .with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, big))
                .with_soft_constraint(SoftConstraintSpec::shift_exact(1, 1, 1, big)),
        );
        // one indicator per day for each of the two days
        assert_invalid(
            &base().with_soft_constraint(SoftConstraintSpec::allowed_shifts(0, vec![1], big)),
        );
        let leave = LeaveRequest {
            worker: 1,
            day: 1,
            shift: None,
            penalty: i64::MAX,
        };
        assert_invalid(
            &base()
                .with_leave_request(leave)
                .with_soft_constraint(SoftConstraintSpec::shift_not_equal(0, 0, 2, 1)),
        );
    }

    #[test]
    fn test_huge_streak_limit_is_valid() {
        let input = base()
            .with_soft_constraint(SoftConstraintSpec::max_consecutive_working_days(usize::MAX, 5));
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_sentinel_shift_in_soft_rule_is_valid() {
        let input = base().with_soft_constraint(SoftConstraintSpec::shift_not_equal(1, 1, 0, 5));
        assert!(validate(&input).is_ok());
    }
}
