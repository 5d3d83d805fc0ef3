//! A [`TerminationCondition`] is polled by the hitting-set tree between node expansions. It tells
//! the tree to stop, even if not all diagnoses or conflicts have been found yet. The enumeration
//! can be bounded by wall-clock time ([`Deadline`]), by the number of labelled nodes
//! ([`NodeBudget`]) or by the user pressing Ctrl-C ([`Interrupt`]); [`Combinator`] joins two of
//! them.

mod combinator;
mod deadline;
mod interrupt;
mod node_budget;

pub use combinator::Combinator;
pub use deadline::Deadline;
pub use interrupt::Interrupt;
pub use node_budget::NodeBudget;

/// Decides when the enumeration should give up searching for further results.
pub trait TerminationCondition {
    /// Returns `true` when the enumeration should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
    /// Called after a node of the hitting-set tree has been labelled or has been found to be a
    /// result. Closed nodes do not count.
    fn node_has_been_expanded(&mut self) {}
}

/// Lets the enumeration run until the tree is exhausted or one of the result limits is reached.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// An absent condition never stops the enumeration.
impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(TerminationCondition::should_stop)
    }

    fn node_has_been_expanded(&mut self) {
        if let Some(condition) = self {
            condition.node_has_been_expanded()
        }
    }
}
