//! Consistency-checker backed tests for whether a set of constraints is a (minimal) diagnosis or a
//! (minimal) conflict.
//!
//! Minimality is tested by removing one constraint at a time, which is sufficient as long as the
//! checker is monotone: every superset of an inconsistent set is inconsistent.

use crate::basic_types::ConstraintSet;
use crate::basic_types::OracleError;
use crate::engine::CheckerContext;

/// Whether removing `diagnosis` from `background` makes it consistent.
pub fn is_diagnosis(
    diagnosis: &ConstraintSet,
    background: &ConstraintSet,
    context: &mut CheckerContext<'_>,
) -> Result<bool, OracleError> {
    let remaining = context.difference(background, diagnosis);
    context.is_consistent(&remaining)
}

/// Whether `diagnosis` is a diagnosis of `background` of which no proper subset is a diagnosis.
pub fn is_minimal_diagnosis(
    diagnosis: &ConstraintSet,
    background: &ConstraintSet,
    context: &mut CheckerContext<'_>,
) -> Result<bool, OracleError> {
    if diagnosis.is_empty() || !is_diagnosis(diagnosis, background, context)? {
        return Ok(false);
    }

    for &constraint in diagnosis {
        if is_diagnosis(&diagnosis.without(constraint), background, context)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Whether `conflict` is inconsistent together with `background`.
pub fn is_conflict(
    conflict: &ConstraintSet,
    background: &ConstraintSet,
    context: &mut CheckerContext<'_>,
) -> Result<bool, OracleError> {
    let all = context.union(background, conflict);
    Ok(!context.is_consistent(&all)?)
}

/// Whether `conflict` is a conflict with respect to `background` of which no proper subset is a
/// conflict.
pub fn is_minimal_conflict(
    conflict: &ConstraintSet,
    background: &ConstraintSet,
    context: &mut CheckerContext<'_>,
) -> Result<bool, OracleError> {
    if conflict.is_empty() || !is_conflict(conflict, background, context)? {
        return Ok(false);
    }

    for &constraint in conflict {
        if is_conflict(&conflict.without(constraint), background, context)? {
            return Ok(false);
        }
    }

    Ok(true)
}
