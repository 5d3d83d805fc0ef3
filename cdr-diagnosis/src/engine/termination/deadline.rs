use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops the enumeration once a point in time has passed.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    /// [`None`] when the deadline lies beyond what an [`Instant`] can represent.
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `time_limit` from now.
    pub fn after(time_limit: Duration) -> Deadline {
        Deadline {
            at: Instant::now().checked_add(time_limit),
        }
    }
}

impl TerminationCondition for Deadline {
    fn should_stop(&mut self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}
