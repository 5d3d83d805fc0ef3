use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// An opaque handle to a constraint of a knowledge base.
///
/// The diagnosis algorithms only ever compare constraints by identity; what a constraint means
/// is known to the [`crate::checkers::ConsistencyChecker`] alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId {
    pub id: u32,
}

impl ConstraintId {
    pub const fn new(id: u32) -> Self {
        ConstraintId { id }
    }
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId { id: index as u32 }
    }
}

impl Display for ConstraintId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}
