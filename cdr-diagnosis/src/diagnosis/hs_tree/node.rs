use crate::basic_types::ConstraintId;
use crate::basic_types::ConstraintSet;
use crate::containers::StorageKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    id: u32,
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId { id: index as u32 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeStatus {
    /// Generated but not yet taken from the queue.
    Open,
    Labelled,
    /// The path of the node is a result (the label of the node is empty).
    PathResult,
    /// Pruned, or the root without a label.
    Closed,
    /// Taken from the queue, but the labeler failed on it.
    Failed,
}

/// A node of the hitting-set tree. The search parameters of a node are not stored here; they
/// live in the queue of open nodes and are dropped once the node has been expanded.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) arc: Option<ConstraintId>,
    pub(crate) path: ConstraintSet,
    pub(crate) status: NodeStatus,
}

impl Node {
    pub(crate) fn root() -> Node {
        Node {
            parent: None,
            arc: None,
            path: ConstraintSet::new(),
            status: NodeStatus::Open,
        }
    }

    pub(crate) fn child(parent: NodeId, parent_path: &ConstraintSet, arc: ConstraintId) -> Node {
        Node {
            parent: Some(parent),
            arc: Some(arc),
            path: parent_path.with(arc),
            status: NodeStatus::Open,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }
}
