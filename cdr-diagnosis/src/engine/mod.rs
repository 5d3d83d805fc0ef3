//! The plumbing shared by all diagnosis algorithms: the [`CheckerContext`] through which every
//! consistency check and set operation is routed, and the [`termination`] conditions which bound
//! an enumeration.
mod checker_context;
pub mod termination;

pub use checker_context::CheckerContext;
