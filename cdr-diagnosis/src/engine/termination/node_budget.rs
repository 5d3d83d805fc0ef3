use super::TerminationCondition;

/// Stops the enumeration after a fixed number of nodes have been expanded, which bounds the
/// number of labeler calls independently of the machine the enumeration runs on.
#[derive(Clone, Copy, Debug)]
pub struct NodeBudget {
    remaining: u64,
}

impl NodeBudget {
    pub fn new(max_nodes: u64) -> NodeBudget {
        NodeBudget {
            remaining: max_nodes,
        }
    }
}

impl TerminationCondition for NodeBudget {
    fn should_stop(&mut self) -> bool {
        self.remaining == 0
    }

    fn node_has_been_expanded(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}
