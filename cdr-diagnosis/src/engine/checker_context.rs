use std::time::Instant;

use log::trace;

use crate::basic_types::ConstraintSet;
use crate::basic_types::OracleError;
use crate::checkers::ConsistencyChecker;
use crate::statistics::DiagnosisStatistics;

/// The per-request context of the diagnosis algorithms.
///
/// It owns the mutable borrow of the [`ConsistencyChecker`], which serialises all consistency
/// checks of a request, and accumulates the [`DiagnosisStatistics`] of the request. The
/// algorithms route every check and every set operation through the context; the statistics are
/// a pure side channel and are never read by the algorithms.
#[derive(Debug)]
pub struct CheckerContext<'checker> {
    checker: &'checker mut dyn ConsistencyChecker,
    statistics: DiagnosisStatistics,
}

impl<'checker> CheckerContext<'checker> {
    pub fn new(checker: &'checker mut dyn ConsistencyChecker) -> Self {
        CheckerContext {
            checker,
            statistics: DiagnosisStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &DiagnosisStatistics {
        &self.statistics
    }

    /// Consumes the context, returning the statistics gathered so far.
    pub fn into_statistics(self) -> DiagnosisStatistics {
        self.statistics
    }

    pub(crate) fn statistics_mut(&mut self) -> &mut DiagnosisStatistics {
        &mut self.statistics
    }

    /// Asks the consistency checker whether `constraints` are jointly satisfiable.
    pub fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError> {
        self.statistics.num_consistency_checks += 1;

        let started_at = Instant::now();
        let result = self.checker.is_consistent(constraints);
        self.statistics.time_spent_checking_ns += started_at.elapsed().as_nanos() as u64;

        trace!("consistency check of {constraints}: {result:?}");
        result
    }

    pub(crate) fn union(&mut self, left: &ConstraintSet, right: &ConstraintSet) -> ConstraintSet {
        self.statistics.num_union_operations += 1;
        left.union(right)
    }

    pub(crate) fn difference(
        &mut self,
        left: &ConstraintSet,
        right: &ConstraintSet,
    ) -> ConstraintSet {
        self.statistics.num_difference_operations += 1;
        left.difference(right)
    }

    pub(crate) fn split(&mut self, constraints: &ConstraintSet) -> (ConstraintSet, ConstraintSet) {
        self.statistics.num_split_operations += 1;
        constraints.ordered_split()
    }
}
