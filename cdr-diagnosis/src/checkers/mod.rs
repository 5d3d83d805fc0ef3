//! Contains the [`ConsistencyChecker`] trait, the decision procedure which the diagnosis
//! algorithms consult, and two implementations of it.
//!
//! The algorithms in [`crate::diagnosis`] know nothing about the meaning of a constraint; the only
//! question they ever ask is whether a set of constraints can be satisfied together. Any
//! decision procedure (a SAT solver, a CP solver, a hand-written predicate) can answer it by
//! implementing [`ConsistencyChecker`].
mod bounded_integer;

use std::fmt::Debug;
use std::fmt::Formatter;

pub use bounded_integer::*;

use crate::basic_types::ConstraintSet;
use crate::basic_types::OracleError;

/// A decision procedure which determines whether a set of constraints is jointly satisfiable.
///
/// Implementations are expected to be deterministic for a fixed set of constraints and to
/// terminate. Errors are not retried; they abort the diagnosis request which triggered the check.
pub trait ConsistencyChecker: Debug {
    /// Returns `Ok(true)` if all `constraints` can be satisfied at the same time.
    fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError>;
}

impl<Checker: ConsistencyChecker + ?Sized> ConsistencyChecker for &mut Checker {
    fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError> {
        (**self).is_consistent(constraints)
    }
}

impl<Checker: ConsistencyChecker + ?Sized> ConsistencyChecker for Box<Checker> {
    fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError> {
        (**self).is_consistent(constraints)
    }
}

/// A [`ConsistencyChecker`] backed by a closure.
pub struct FnChecker<F> {
    check: F,
}

impl<F> FnChecker<F>
where
    F: FnMut(&ConstraintSet) -> Result<bool, OracleError>,
{
    pub fn new(check: F) -> Self {
        FnChecker { check }
    }
}

impl FnChecker<fn(&ConstraintSet) -> Result<bool, OracleError>> {
    /// Creates a checker from an infallible predicate.
    pub fn infallible<P>(
        mut predicate: P,
    ) -> FnChecker<impl FnMut(&ConstraintSet) -> Result<bool, OracleError>>
    where
        P: FnMut(&ConstraintSet) -> bool,
    {
        FnChecker::new(move |constraints: &ConstraintSet| Ok(predicate(constraints)))
    }
}

impl<F> ConsistencyChecker for FnChecker<F>
where
    F: FnMut(&ConstraintSet) -> Result<bool, OracleError>,
{
    fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError> {
        (self.check)(constraints)
    }
}

impl<F> Debug for FnChecker<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnChecker").finish_non_exhaustive()
    }
}
