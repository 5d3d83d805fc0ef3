//! Consistency-based conflict detection and diagnosis.
//!
//! Given an over-constrained set of constraints, this crate finds out which of them are to blame.
//! A *conflict* is a minimal set of constraints which cannot be satisfied together; a *diagnosis*
//! is a minimal set of constraints whose removal restores consistency. The algorithms are
//! agnostic of what a constraint means: they only ever ask a
//! [`ConsistencyChecker`](checkers::ConsistencyChecker) whether a set of constraints is
//! consistent.
//!
//! ```rust
//! # use cdr_diagnosis::checkers::FnChecker;
//! # use cdr_diagnosis::diagnosis::FastDiag;
//! # use cdr_diagnosis::engine::CheckerContext;
//! # use cdr_diagnosis::ConstraintId;
//! # use cdr_diagnosis::ConstraintSet;
//! let c0 = ConstraintId::new(0);
//! let c1 = ConstraintId::new(1);
//! let c2 = ConstraintId::new(2);
//!
//! // c0 and c1 contradict each other.
//! let mut checker = FnChecker::infallible(|constraints: &ConstraintSet| {
//!     !(constraints.contains(c0) && constraints.contains(c1))
//! });
//! let mut context = CheckerContext::new(&mut checker);
//!
//! let constraints = ConstraintSet::from([c0, c1, c2]);
//! let diagnosis = FastDiag::default()
//!     .find_diagnosis(&constraints, &constraints, &mut context)
//!     .unwrap();
//!
//! assert_eq!(diagnosis, ConstraintSet::from([c1]));
//! ```
pub mod basic_types;
pub mod checkers;
pub mod containers;
pub mod diagnosis;
pub mod engine;
pub mod model;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::ConstraintId;
pub use crate::basic_types::ConstraintSet;
pub use crate::basic_types::DiagnosisError;
pub use crate::basic_types::InvalidInput;
pub use crate::basic_types::OracleError;
pub use crate::engine::termination;
