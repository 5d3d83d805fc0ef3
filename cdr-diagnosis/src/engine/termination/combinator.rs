use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when one of two given [`TerminationCondition`]s
/// triggers.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    t1: T1,
    t2: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    /// Combine two [`TerminationCondition`]s into one.
    pub fn new(t1: T1, t2: T2) -> Self {
        Combinator { t1, t2 }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        self.t1.should_stop() || self.t2.should_stop()
    }

    fn node_has_been_expanded(&mut self) {
        self.t1.node_has_been_expanded();
        self.t2.node_has_been_expanded();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::termination::Deadline;
    use crate::engine::termination::Indefinite;
    use crate::engine::termination::NodeBudget;

    #[test]
    fn stops_when_either_condition_stops() {
        let mut never = Combinator::new(Indefinite, None::<Deadline>);
        let mut expired = Combinator::new(Indefinite, Deadline::after(Duration::ZERO));

        assert!(!never.should_stop());
        assert!(expired.should_stop());
    }

    #[test]
    fn expansions_reach_both_conditions() {
        let mut combined = Combinator::new(Some(NodeBudget::new(1)), NodeBudget::new(2));

        combined.node_has_been_expanded();

        assert!(combined.should_stop());
        assert!(!combined.t2.should_stop());
    }
}
