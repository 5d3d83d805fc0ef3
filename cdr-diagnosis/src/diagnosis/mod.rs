//! The diagnosis algorithms.
//!
//! - [`FastDiag`] computes one minimal diagnosis: a minimal set of constraints whose removal
//!   restores consistency.
//! - [`QuickXPlain`] computes one minimal conflict: a minimal set of constraints which cannot be
//!   satisfied together.
//! - [`hs_tree::HsTree`] enumerates all minimal diagnoses and conflicts by repeatedly calling one
//!   of the two.
//!
//! All of them consult the [`crate::checkers::ConsistencyChecker`] through a
//! [`crate::engine::CheckerContext`].
mod fastdiag;
pub mod hs_tree;
mod quickxplain;
pub mod validation;

pub use fastdiag::FastDiag;
pub use fastdiag::FastDiagOptions;
pub use quickxplain::QuickXPlain;
pub use quickxplain::QuickXPlainOptions;
