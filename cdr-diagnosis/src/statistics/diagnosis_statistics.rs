use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters and timers of a single diagnosis request.
    ///
    /// The counters are only ever incremented; they never influence which diagnoses or conflicts
    /// are found.
    DiagnosisStatistics {
        /// The number of calls to the consistency checker
        num_consistency_checks: u64,
        /// The number of (recursive) FastDiag calls
        num_fastdiag_calls: u64,
        /// The number of (recursive) QuickXPlain calls
        num_quickxplain_calls: u64,
        /// The number of calls into the first half of a split candidate set
        num_left_branch_calls: u64,
        /// The number of calls into the second half of a split candidate set
        num_right_branch_calls: u64,
        /// The number of set unions
        num_union_operations: u64,
        /// The number of set differences
        num_difference_operations: u64,
        /// The number of ordered splits
        num_split_operations: u64,
        /// The number of hitting-set tree nodes which have been generated
        num_nodes_generated: u64,
        /// The number of hitting-set tree nodes which have been labelled or closed
        num_nodes_expanded: u64,
        /// The number of nodes closed because their path contains an earlier path result
        num_nodes_closed: u64,
        /// The number of nodes which reused an existing label instead of computing one
        num_labels_reused: u64,
        /// The number of children which were not generated because their path already exists
        num_duplicate_paths: u64,
        /// The time spent in the consistency checker, in nanoseconds
        time_spent_checking_ns: u64,
        /// The time spent in top-level FastDiag calls, in nanoseconds
        time_spent_in_fastdiag_ns: u64,
        /// The time spent in top-level QuickXPlain calls, in nanoseconds
        time_spent_in_quickxplain_ns: u64,
});
