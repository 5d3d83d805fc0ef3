//! The hitting-set tree, which enumerates all minimal diagnoses and all minimal conflicts of a
//! set of possibly faulty constraints.
//!
//! Every node of the tree is labelled by a [`Labeler`] with either a diagnosis
//! ([`FastDiagLabeler`]) or a conflict ([`QuickXPlainLabeler`]). A node gets one child per
//! constraint of its label, and the path of a node is the set of constraints on the edges from
//! the root. When a node cannot be labelled, its path is a result of the dual kind: a conflict
//! when labelling with diagnoses, a diagnosis when labelling with conflicts. The tree is expanded
//! breadth-first, which ensures that the path results are minimal.
//!
//! See: R. Reiter, "A theory of diagnosis from first principles", Artificial Intelligence 32(1),
//! 1987.
mod labeler;
mod node;
mod parameters;

use std::collections::VecDeque;

pub use labeler::*;
use log::debug;
use log::trace;
use node::Node;
use node::NodeId;
use node::NodeStatus;
pub use parameters::*;

use crate::basic_types::ConstraintId;
use crate::basic_types::ConstraintSet;
use crate::basic_types::DiagnosisError;
use crate::basic_types::HashSet;
use crate::containers::KeyedVec;
use crate::engine::termination::TerminationCondition;
use crate::engine::CheckerContext;

/// Options which bound the enumeration of a [`HsTree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HsTreeOptions {
    /// Stop once this many diagnoses have been found.
    pub max_diagnoses: Option<usize>,
    /// Stop once this many conflicts have been found.
    pub max_conflicts: Option<usize>,
    /// Do not generate nodes whose path is longer than this.
    pub max_depth: Option<usize>,
    /// When the consistency checker fails, return the results found so far with
    /// [`EnumerationStatus::Failed`] instead of returning the error.
    pub best_effort: bool,
}

/// Why the enumeration of a [`HsTree`] stopped.
#[derive(Debug)]
pub enum EnumerationStatus {
    /// All minimal diagnoses and conflicts have been found.
    Complete,
    /// `max_diagnoses` or `max_conflicts` was reached.
    LimitReached,
    /// The tree was exhausted, but nodes beyond `max_depth` were not generated.
    DepthLimited,
    /// The [`TerminationCondition`] triggered.
    Terminated,
    /// The consistency checker failed while running with
    /// [`HsTreeOptions::best_effort`].
    Failed(DiagnosisError),
}

impl EnumerationStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, EnumerationStatus::Complete)
    }
}

/// The outcome of [`HsTree::construct`]. Every reported diagnosis and conflict is minimal, also
/// when the enumeration stopped early.
#[derive(Debug)]
pub struct HsTreeResult {
    /// The minimal diagnoses in the order in which they were found.
    pub diagnoses: Vec<ConstraintSet>,
    /// The minimal conflicts in the order in which they were found.
    pub conflicts: Vec<ConstraintSet>,
    pub status: EnumerationStatus,
    /// The number of nodes which were taken from the queue.
    pub num_expanded_nodes: usize,
    /// The number of nodes which were still waiting to be expanded. A node on which the
    /// labeler failed is not counted.
    pub num_open_nodes: usize,
}

/// Enumerates minimal diagnoses and conflicts with a hitting-set tree.
///
/// When a node is taken from the queue it is handled as follows:
/// 1. If its path contains an earlier path result, it is closed.
/// 2. If an earlier label is disjoint from its path, that label is reused.
/// 3. Otherwise the [`Labeler`] computes a label.
///
/// Children whose path (as a set) already belongs to another node are not generated.
#[derive(Debug)]
pub struct HsTree<L> {
    labeler: L,
    options: HsTreeOptions,
}

impl<L: Labeler> HsTree<L> {
    pub fn new(labeler: L) -> Self {
        Self::with_options(labeler, HsTreeOptions::default())
    }

    pub fn with_options(labeler: L, options: HsTreeOptions) -> Self {
        HsTree { labeler, options }
    }

    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    pub fn options(&self) -> HsTreeOptions {
        self.options
    }

    /// Builds the tree for the possibly faulty `candidates`, which are checked together with the
    /// fixed `background`. The two sets have to be disjoint.
    pub fn construct(
        &mut self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
        context: &mut CheckerContext<'_>,
        termination: &mut impl TerminationCondition,
    ) -> Result<HsTreeResult, DiagnosisError> {
        debug!(
            "Constructing hitting-set tree for [C={candidates}, B={background}] with {:?} labels",
            self.labeler.label_kind()
        );

        let root_parameters = self.labeler.root_parameters(candidates, background)?;

        let mut nodes: KeyedVec<NodeId, Node> = KeyedVec::default();
        let mut seen_paths: HashSet<Vec<ConstraintId>> = HashSet::default();
        let mut open: VecDeque<(NodeId, HsParameters)> = VecDeque::new();

        let root = nodes.push(Node::root());
        let _ = seen_paths.insert(Vec::new());
        open.push_back((root, root_parameters));
        context.statistics_mut().num_nodes_generated += 1;

        let mut labels: Vec<ConstraintSet> = Vec::new();
        let mut path_results: Vec<ConstraintSet> = Vec::new();
        let mut num_expanded_nodes = 0;
        let mut depth_limited = false;

        let status = loop {
            if open.is_empty() {
                break if depth_limited {
                    EnumerationStatus::DepthLimited
                } else {
                    EnumerationStatus::Complete
                };
            }
            if termination.should_stop() {
                break EnumerationStatus::Terminated;
            }
            if self.limit_reached(&labels, &path_results) {
                break EnumerationStatus::LimitReached;
            }

            let Some((node_id, parameters)) = open.pop_front() else {
                continue;
            };
            num_expanded_nodes += 1;
            context.statistics_mut().num_nodes_expanded += 1;

            let path = nodes[node_id].path.clone();
            trace!(
                "expanding node {node_id:?} [parent={:?}, arc={:?}, path={path}, {parameters}]",
                nodes[node_id].parent,
                nodes[node_id].arc,
            );

            if path_results.iter().any(|result| result.is_subset(&path)) {
                trace!("closed, the path contains an earlier result");
                nodes[node_id].status = NodeStatus::Closed;
                context.statistics_mut().num_nodes_closed += 1;
                continue;
            }

            let label_index = match labels.iter().position(|label| label.is_disjoint(&path)) {
                Some(index) => {
                    trace!("reusing label {}", labels[index]);
                    context.statistics_mut().num_labels_reused += 1;
                    Some(index)
                }
                None => match self.labeler.label(&parameters, context) {
                    Ok(label) if label.is_empty() => None,
                    Ok(label) => {
                        debug!("Found {:?} {label}", self.labeler.label_kind());
                        labels.push(label);
                        Some(labels.len() - 1)
                    }
                    Err(error) if self.options.best_effort => {
                        debug!("Stopping the enumeration after a failure: {error}");
                        nodes[node_id].status = NodeStatus::Failed;
                        break EnumerationStatus::Failed(error);
                    }
                    Err(error) => return Err(error),
                },
            };
            termination.node_has_been_expanded();

            let Some(label_index) = label_index else {
                if path.is_empty() {
                    nodes[node_id].status = NodeStatus::Closed;
                } else {
                    debug!("Found {:?} {path}", self.labeler.label_kind().dual());
                    nodes[node_id].status = NodeStatus::PathResult;
                    path_results.push(path);
                }
                continue;
            };
            nodes[node_id].status = NodeStatus::Labelled;

            if self
                .options
                .max_depth
                .is_some_and(|max_depth| nodes[node_id].depth() >= max_depth)
            {
                depth_limited = true;
                continue;
            }

            for &arc in labels[label_index].iter() {
                let child = Node::child(node_id, &path, arc);
                if !seen_paths.insert(child.path.sorted()) {
                    context.statistics_mut().num_duplicate_paths += 1;
                    continue;
                }

                let child_parameters = parameters.child(arc);
                let child_id = nodes.push(child);
                open.push_back((child_id, child_parameters));
                context.statistics_mut().num_nodes_generated += 1;
            }
        };

        let (diagnoses, conflicts) = match self.labeler.label_kind() {
            LabelKind::Diagnosis => (labels, path_results),
            LabelKind::Conflict => (path_results, labels),
        };
        let num_open_nodes = nodes
            .iter()
            .filter(|node| node.status == NodeStatus::Open)
            .count();
        debug!(
            "Finished hitting-set tree with {} diagnoses and {} conflicts [status={status:?}, \
             nodes={}, open={num_open_nodes}]",
            diagnoses.len(),
            conflicts.len(),
            nodes.len()
        );

        Ok(HsTreeResult {
            diagnoses,
            conflicts,
            status,
            num_expanded_nodes,
            num_open_nodes,
        })
    }

    fn limit_reached(&self, labels: &[ConstraintSet], path_results: &[ConstraintSet]) -> bool {
        let (num_diagnoses, num_conflicts) = match self.labeler.label_kind() {
            LabelKind::Diagnosis => (labels.len(), path_results.len()),
            LabelKind::Conflict => (path_results.len(), labels.len()),
        };

        self.options
            .max_diagnoses
            .is_some_and(|max| num_diagnoses >= max)
            || self
                .options
                .max_conflicts
                .is_some_and(|max| num_conflicts >= max)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::basic_types::OracleError;
    use crate::checkers::FnChecker;
    use crate::diagnosis::FastDiag;
    use crate::diagnosis::FastDiagOptions;
    use crate::engine::termination::Indefinite;
    use crate::engine::termination::Deadline;
    use crate::engine::termination::NodeBudget;

    fn set(ids: &[u32]) -> ConstraintSet {
        ids.iter().map(|&id| ConstraintId::new(id)).collect()
    }

    /// A set is consistent iff it contains none of the `conflicts`.
    fn conflict_checker(
        conflicts: Vec<ConstraintSet>,
    ) -> impl FnMut(&ConstraintSet) -> bool {
        move |constraints: &ConstraintSet| {
            !conflicts
                .iter()
                .any(|conflict| conflict.is_subset(constraints))
        }
    }

    /// {c0, c2} and {c1, c3} are the minimal conflicts.
    fn scenario_checker() -> impl FnMut(&ConstraintSet) -> bool {
        conflict_checker(vec![set(&[0, 2]), set(&[1, 3])])
    }

    fn assert_same_family(actual: &[ConstraintSet], expected: &[ConstraintSet]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (actual, expected) in actual.iter().zip(expected) {
            assert!(actual.same_elements(expected), "{actual} vs {expected}");
        }
    }

    fn construct<L: Labeler>(
        tree: &mut HsTree<L>,
        checker: impl FnMut(&ConstraintSet) -> bool,
    ) -> HsTreeResult {
        let mut checker = FnChecker::infallible(checker);
        let mut context = CheckerContext::new(&mut checker);
        tree.construct(
            &set(&[0, 1, 2, 3]),
            &ConstraintSet::new(),
            &mut context,
            &mut Indefinite,
        )
        .unwrap()
    }

    #[test]
    fn fastdiag_labels_enumerate_everything() {
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = construct(&mut tree, scenario_checker());

        assert!(result.status.is_complete());
        assert_same_family(
            &result.diagnoses,
            &[set(&[2, 3]), set(&[0, 3]), set(&[1, 2]), set(&[0, 1])],
        );
        assert_eq!(result.conflicts, vec![set(&[2, 0]), set(&[3, 1])]);
        assert_eq!(result.num_open_nodes, 0);
    }

    #[test]
    fn quickxplain_labels_enumerate_everything() {
        let mut tree = HsTree::new(QuickXPlainLabeler::default());

        let result = construct(&mut tree, scenario_checker());

        assert!(result.status.is_complete());
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.conflicts[0], set(&[2, 0]));
        assert!(result.conflicts[1].same_elements(&set(&[1, 3])));

        assert_eq!(result.diagnoses.len(), 4);
        for expected in [set(&[2, 3]), set(&[0, 3]), set(&[1, 2]), set(&[0, 1])] {
            assert!(result
                .diagnoses
                .iter()
                .any(|diagnosis| diagnosis.same_elements(&expected)));
        }
    }

    #[test]
    fn pruning_is_counted() {
        let mut checker = FnChecker::infallible(scenario_checker());
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = tree
            .construct(
                &set(&[0, 1, 2, 3]),
                &ConstraintSet::new(),
                &mut context,
                &mut Indefinite,
            )
            .unwrap();

        let statistics = context.statistics();
        // [c3, c2] duplicates [c2, c3]; [c2, c3, c0] and [c2, c3, c1] contain a conflict. No
        // earlier label is disjoint from the path of a node which is not closed.
        assert_eq!(statistics.num_duplicate_paths, 1);
        assert_eq!(statistics.num_nodes_closed, 2);
        assert_eq!(statistics.num_labels_reused, 0);
        assert_eq!(statistics.num_nodes_generated, 8);
        assert_eq!(statistics.num_nodes_expanded, 8);
        assert_eq!(result.num_expanded_nodes, 8);
    }

    #[test]
    fn quickxplain_labels_are_reused() {
        let mut checker = FnChecker::infallible(scenario_checker());
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(QuickXPlainLabeler::default());

        let _ = tree
            .construct(
                &set(&[0, 1, 2, 3]),
                &ConstraintSet::new(),
                &mut context,
                &mut Indefinite,
            )
            .unwrap();

        // The node [c0] reuses the conflict computed for [c2].
        assert!(context.statistics().num_labels_reused >= 1);
    }

    #[test]
    fn background_constraints_are_never_part_of_a_result() {
        // c9 is fixed; together with c0 it forms the only conflict.
        let mut checker = FnChecker::infallible(conflict_checker(vec![set(&[0, 9])]));
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = tree
            .construct(&set(&[0, 1]), &set(&[9]), &mut context, &mut Indefinite)
            .unwrap();

        assert_eq!(result.diagnoses, vec![set(&[0])]);
        assert_eq!(result.conflicts, vec![set(&[0])]);
    }

    #[test]
    fn consistent_constraints_have_no_results() {
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = construct(&mut tree, |_| true);

        assert!(result.status.is_complete());
        assert!(result.diagnoses.is_empty());
        assert!(result.conflicts.is_empty());
        assert_eq!(result.num_expanded_nodes, 1);
    }

    #[test]
    fn overlapping_sets_are_rejected_before_checking() {
        let mut checker = FnChecker::infallible(|_| true);
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(QuickXPlainLabeler::default());

        let result = tree.construct(&set(&[0, 1]), &set(&[1]), &mut context, &mut Indefinite);

        assert!(matches!(result, Err(DiagnosisError::InvalidInput(_))));
        assert_eq!(context.statistics().num_consistency_checks, 0);
    }

    #[test]
    fn diagnosis_limit_stops_the_enumeration() {
        let mut tree = HsTree::with_options(
            FastDiagLabeler::default(),
            HsTreeOptions {
                max_diagnoses: Some(2),
                ..Default::default()
            },
        );

        let result = construct(&mut tree, scenario_checker());

        assert!(matches!(result.status, EnumerationStatus::LimitReached));
        assert_same_family(&result.diagnoses, &[set(&[2, 3]), set(&[0, 3])]);
        assert!(result.conflicts.is_empty());
        assert!(result.num_open_nodes > 0);
    }

    #[test]
    fn conflict_limit_stops_the_enumeration() {
        let mut tree = HsTree::with_options(
            QuickXPlainLabeler::default(),
            HsTreeOptions {
                max_conflicts: Some(1),
                ..Default::default()
            },
        );

        let result = construct(&mut tree, scenario_checker());

        assert!(matches!(result.status, EnumerationStatus::LimitReached));
        assert_eq!(result.conflicts, vec![set(&[2, 0])]);
        assert!(result.diagnoses.is_empty());
    }

    #[test]
    fn depth_limit_bounds_the_tree() {
        let mut tree = HsTree::with_options(
            FastDiagLabeler::default(),
            HsTreeOptions {
                max_depth: Some(1),
                ..Default::default()
            },
        );

        let result = construct(&mut tree, scenario_checker());

        assert!(matches!(result.status, EnumerationStatus::DepthLimited));
        assert_same_family(
            &result.diagnoses,
            &[set(&[2, 3]), set(&[0, 3]), set(&[1, 2])],
        );
        assert!(result.conflicts.is_empty());
        assert_eq!(result.num_expanded_nodes, 3);
    }

    #[test]
    fn passed_deadline_terminates_before_the_root() {
        let mut checker = FnChecker::infallible(scenario_checker());
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = tree
            .construct(
                &set(&[0, 1, 2, 3]),
                &ConstraintSet::new(),
                &mut context,
                &mut Deadline::after(Duration::ZERO),
            )
            .unwrap();

        assert!(matches!(result.status, EnumerationStatus::Terminated));
        assert!(result.diagnoses.is_empty());
        assert_eq!(result.num_expanded_nodes, 0);
        assert_eq!(result.num_open_nodes, 1);
        assert_eq!(context.statistics().num_consistency_checks, 0);
    }

    #[test]
    fn node_budget_bounds_the_labeler_calls() {
        let mut checker = FnChecker::infallible(scenario_checker());
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = tree
            .construct(
                &set(&[0, 1, 2, 3]),
                &ConstraintSet::new(),
                &mut context,
                &mut NodeBudget::new(3),
            )
            .unwrap();

        assert!(matches!(result.status, EnumerationStatus::Terminated));
        assert_same_family(
            &result.diagnoses,
            &[set(&[2, 3]), set(&[0, 3]), set(&[1, 2])],
        );
        assert_eq!(result.num_expanded_nodes, 3);
        // [c2, c0], [c2, c3] and [c3, c1]
        assert_eq!(result.num_open_nodes, 3);
    }

    /// Fails every check after the first `budget` checks.
    fn failing_after(budget: u64) -> impl FnMut(&ConstraintSet) -> Result<bool, OracleError> {
        let mut is_consistent = scenario_checker();
        let mut num_checks = 0;
        move |constraints: &ConstraintSet| {
            num_checks += 1;
            if num_checks > budget {
                Err(OracleError::new("out of budget"))
            } else {
                Ok(is_consistent(constraints))
            }
        }
    }

    fn checks_for_root_label() -> u64 {
        let mut checker = FnChecker::infallible(scenario_checker());
        let mut context = CheckerContext::new(&mut checker);
        let all = set(&[0, 1, 2, 3]);
        let _ = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();
        context.statistics().num_consistency_checks
    }

    #[test]
    fn best_effort_keeps_the_results_found_before_a_failure() {
        let mut checker = FnChecker::new(failing_after(checks_for_root_label()));
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::with_options(
            FastDiagLabeler::default(),
            HsTreeOptions {
                best_effort: true,
                ..Default::default()
            },
        );

        let result = tree
            .construct(
                &set(&[0, 1, 2, 3]),
                &ConstraintSet::new(),
                &mut context,
                &mut Indefinite,
            )
            .unwrap();

        assert!(matches!(
            result.status,
            EnumerationStatus::Failed(DiagnosisError::Oracle(_))
        ));
        assert_same_family(&result.diagnoses, &[set(&[2, 3])]);
        assert_eq!(result.num_expanded_nodes, 2);
        // [c2] failed, only [c3] is still waiting.
        assert_eq!(result.num_open_nodes, 1);
    }

    #[test]
    fn failures_abort_the_enumeration_by_default() {
        let mut checker = FnChecker::new(failing_after(checks_for_root_label()));
        let mut context = CheckerContext::new(&mut checker);
        let mut tree = HsTree::new(FastDiagLabeler::default());

        let result = tree.construct(
            &set(&[0, 1, 2, 3]),
            &ConstraintSet::new(),
            &mut context,
            &mut Indefinite,
        );

        assert!(matches!(result, Err(DiagnosisError::Oracle(_))));
    }

    #[test]
    fn results_do_not_depend_on_the_skip_shortcut() {
        let mut with_shortcut = HsTree::new(FastDiagLabeler::default());
        let mut without_shortcut = HsTree::new(FastDiagLabeler::new(FastDiag::with_options(
            FastDiagOptions {
                skip_redundant_checks: false,
            },
        )));

        let expected = construct(&mut with_shortcut, scenario_checker());
        let actual = construct(&mut without_shortcut, scenario_checker());

        assert_eq!(actual.diagnoses, expected.diagnoses);
        assert_eq!(actual.conflicts, expected.conflicts);
    }
}
