use std::time::Instant;

use log::debug;
use log::trace;

use crate::basic_types::ConstraintSet;
use crate::basic_types::DiagnosisError;
use crate::basic_types::InvalidInput;
use crate::basic_types::OracleError;
use crate::engine::CheckerContext;

/// Options which determine how [`FastDiag`] spends consistency checks.
#[derive(Debug, Clone, Copy)]
pub struct FastDiagOptions {
    /// Only check the consistency of the background in a recursive call if the sibling call
    /// returned a non-empty diagnosis. When the sibling's diagnosis is empty the background is
    /// the one of the parent call, which is known to be inconsistent.
    ///
    /// Disabling this only increases the number of consistency checks; the returned diagnosis
    /// stays the same.
    pub skip_redundant_checks: bool,
}

impl Default for FastDiagOptions {
    fn default() -> Self {
        Self {
            skip_redundant_checks: true,
        }
    }
}

/// Computes one minimal diagnosis by divide-and-conquer.
///
/// ```text
/// FastDiag(C ⊆ AC, AC): Δ
///   if isEmpty(C) or consistent(AC) or inconsistent(AC - C) return Φ
///   else return FD(Φ, C, AC)
///
/// FD(D, C = {c1..cq}, AC): Δ
///   if D != Φ and consistent(AC) return Φ
///   if singleton(C) return C
///   C1 = {c1..ck}, C2 = {ck+1..cq} with k = ⌈q/2⌉
///   D1 = FD(C2, C1, AC - C2)
///   D2 = FD(D1, C2, AC - D1)
///   return D1 ∪ D2
/// ```
///
/// The returned diagnosis is preferred according to the order of `C`: constraints at the end of
/// `C` are the first ones to end up in the diagnosis. A diagnosis of size `k` out of `n`
/// candidates takes `O(2k·log(n/k) + 2k)` consistency checks.
///
/// See: A. Felfernig, M. Schubert, and C. Zehentner, "An efficient diagnosis algorithm for
/// inconsistent constraint sets", AI EDAM 26(1), 2012.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastDiag {
    options: FastDiagOptions,
}

impl FastDiag {
    pub fn with_options(options: FastDiagOptions) -> Self {
        FastDiag { options }
    }

    pub fn options(&self) -> FastDiagOptions {
        self.options
    }

    /// Returns a minimal subset of `candidates` whose removal makes `background` consistent, or
    /// an empty set if there is none: when `candidates` is empty, when `background` is already
    /// consistent, or when `background` without `candidates` is inconsistent by itself.
    ///
    /// `candidates` has to be a subset of `background`.
    pub fn find_diagnosis(
        &self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
        context: &mut CheckerContext<'_>,
    ) -> Result<ConstraintSet, DiagnosisError> {
        debug!("Identifying diagnosis for [C={candidates}, AC={background}]");

        if !candidates.is_subset(background) {
            return Err(InvalidInput::CandidatesNotInBackground {
                candidates: candidates.clone(),
            }
            .into());
        }

        if candidates.is_empty() || context.is_consistent(background)? {
            debug!("No diagnosis found");
            return Ok(ConstraintSet::new());
        }

        let background_without_candidates = context.difference(background, candidates);
        if !background_without_candidates.is_empty()
            && !context.is_consistent(&background_without_candidates)?
        {
            debug!("No diagnosis found, the constraints outside of C are inconsistent");
            return Ok(ConstraintSet::new());
        }

        context.statistics_mut().num_fastdiag_calls += 1;
        let started_at = Instant::now();
        let diagnosis = self.fd(&ConstraintSet::new(), candidates, background, context, 0)?;
        let elapsed_ns = started_at.elapsed().as_nanos() as u64;
        context.statistics_mut().time_spent_in_fastdiag_ns += elapsed_ns;

        debug!("Found diagnosis [diag={diagnosis}]");
        Ok(diagnosis)
    }

    fn fd(
        &self,
        sibling_diagnosis: &ConstraintSet,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
        context: &mut CheckerContext<'_>,
        depth: usize,
    ) -> Result<ConstraintSet, OracleError> {
        trace!(
            "{:depth$}FD [D={sibling_diagnosis}, C={candidates}, AC={background}]",
            ""
        );

        let needs_check = !sibling_diagnosis.is_empty() || !self.options.skip_redundant_checks;
        if needs_check && context.is_consistent(background)? {
            trace!("{:depth$}return Φ", "");
            return Ok(ConstraintSet::new());
        }

        if candidates.len() == 1 {
            trace!("{:depth$}return {candidates}", "");
            return Ok(candidates.clone());
        }

        let (first_half, second_half) = context.split(candidates);
        trace!("{:depth$}split C into [C1={first_half}, C2={second_half}]", "");

        let background_without_second = context.difference(background, &second_half);
        context.statistics_mut().num_left_branch_calls += 1;
        context.statistics_mut().num_fastdiag_calls += 1;
        let first_diagnosis = self.fd(
            &second_half,
            &first_half,
            &background_without_second,
            context,
            depth + 1,
        )?;

        let background_without_first = context.difference(background, &first_diagnosis);
        context.statistics_mut().num_right_branch_calls += 1;
        context.statistics_mut().num_fastdiag_calls += 1;
        let second_diagnosis = self.fd(
            &first_diagnosis,
            &second_half,
            &background_without_first,
            context,
            depth + 1,
        )?;

        trace!("{:depth$}return [D1={first_diagnosis} ∪ D2={second_diagnosis}]", "");
        Ok(context.union(&first_diagnosis, &second_diagnosis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::ConstraintId;
    use crate::checkers::FnChecker;
    use crate::diagnosis::validation::is_minimal_diagnosis;

    fn set(ids: &[u32]) -> ConstraintSet {
        ids.iter().map(|&id| ConstraintId::new(id)).collect()
    }

    /// A set is consistent iff it contains none of the given conflicts.
    fn conflicts_checker(
        conflicts: Vec<ConstraintSet>,
    ) -> FnChecker<impl FnMut(&ConstraintSet) -> Result<bool, OracleError>> {
        FnChecker::infallible(move |constraints: &ConstraintSet| {
            !conflicts
                .iter()
                .any(|conflict| conflict.is_subset(constraints))
        })
    }

    #[test]
    fn empty_candidates_give_empty_diagnosis_without_checks() {
        let mut checker = conflicts_checker(vec![set(&[0])]);
        let mut context = CheckerContext::new(&mut checker);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&ConstraintSet::new(), &set(&[0, 1]), &mut context)
            .unwrap();

        assert!(diagnosis.is_empty());
        assert_eq!(context.statistics().num_consistency_checks, 0);
    }

    #[test]
    fn consistent_background_gives_empty_diagnosis() {
        let mut checker = conflicts_checker(vec![set(&[5])]);
        let mut context = CheckerContext::new(&mut checker);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&set(&[0, 1]), &set(&[0, 1, 2]), &mut context)
            .unwrap();

        assert!(diagnosis.is_empty());
    }

    #[test]
    fn inconsistency_outside_of_candidates_gives_empty_diagnosis() {
        let mut checker = conflicts_checker(vec![set(&[2, 3])]);
        let mut context = CheckerContext::new(&mut checker);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&set(&[0, 1]), &set(&[0, 1, 2, 3]), &mut context)
            .unwrap();

        assert!(diagnosis.is_empty());
    }

    #[test]
    fn candidates_outside_of_background_are_rejected_before_any_check() {
        let mut checker = conflicts_checker(vec![]);
        let mut context = CheckerContext::new(&mut checker);

        let result =
            FastDiag::default().find_diagnosis(&set(&[0, 4]), &set(&[0, 1]), &mut context);

        assert!(matches!(
            result,
            Err(DiagnosisError::InvalidInput(
                InvalidInput::CandidatesNotInBackground { .. }
            ))
        ));
        assert_eq!(context.statistics().num_consistency_checks, 0);
    }

    #[test]
    fn single_faulty_constraint_is_found() {
        let mut checker = conflicts_checker(vec![set(&[3])]);
        let mut context = CheckerContext::new(&mut checker);
        let all = set(&[0, 1, 2, 3, 4, 5]);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();

        assert_eq!(diagnosis, set(&[3]));
    }

    #[test]
    fn later_constraints_are_preferred_for_removal() {
        // Any single constraint of {0, 1, 2, 3} resolves the conflict.
        let conflict = set(&[0, 1, 2, 3]);
        let mut checker = conflicts_checker(vec![conflict.clone()]);
        let mut context = CheckerContext::new(&mut checker);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&conflict, &conflict, &mut context)
            .unwrap();
        let reversed = conflict.reversed();
        let diagnosis_of_reversed = FastDiag::default()
            .find_diagnosis(&reversed, &reversed, &mut context)
            .unwrap();

        assert_eq!(diagnosis, set(&[3]));
        assert_eq!(diagnosis_of_reversed, set(&[0]));
    }

    #[test]
    fn diagnosis_is_minimal_and_sufficient() {
        let conflicts = vec![set(&[0, 4]), set(&[1, 2, 6]), set(&[3, 5]), set(&[2, 7])];
        let mut checker = conflicts_checker(conflicts);
        let mut context = CheckerContext::new(&mut checker);
        let all = set(&[0, 1, 2, 3, 4, 5, 6, 7]);

        let diagnosis = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();

        assert!(!diagnosis.is_empty());
        assert!(is_minimal_diagnosis(&diagnosis, &all, &mut context).unwrap());
    }

    #[test]
    fn repeated_calls_return_identical_diagnoses() {
        let conflicts = vec![set(&[0, 4]), set(&[1, 6]), set(&[3, 5, 6])];
        let mut checker = conflicts_checker(conflicts);
        let mut context = CheckerContext::new(&mut checker);
        let all = set(&[0, 1, 2, 3, 4, 5, 6]);

        let first = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();
        let second = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn skipping_redundant_checks_does_not_change_the_diagnosis() {
        let conflicts = vec![
            set(&[0, 9]),
            set(&[1, 2, 8]),
            set(&[3, 7]),
            set(&[4, 5]),
            set(&[6, 9, 2]),
        ];
        let all: ConstraintSet = (0..10).map(ConstraintId::new).collect();

        let mut checker = conflicts_checker(conflicts.clone());
        let mut context = CheckerContext::new(&mut checker);
        let with_shortcut = FastDiag::default()
            .find_diagnosis(&all, &all, &mut context)
            .unwrap();
        let checks_with_shortcut = context.statistics().num_consistency_checks;

        let mut checker = conflicts_checker(conflicts);
        let mut context = CheckerContext::new(&mut checker);
        let without_shortcut = FastDiag::with_options(FastDiagOptions {
            skip_redundant_checks: false,
        })
        .find_diagnosis(&all, &all, &mut context)
        .unwrap();
        let checks_without_shortcut = context.statistics().num_consistency_checks;

        assert_eq!(with_shortcut, without_shortcut);
        assert!(checks_with_shortcut < checks_without_shortcut);
    }

    #[test]
    fn oracle_failure_aborts_the_computation() {
        let mut calls = 0;
        let mut checker = FnChecker::new(|_: &ConstraintSet| {
            calls += 1;
            if calls > 2 {
                Err(OracleError::new("solver crashed"))
            } else {
                Ok(false)
            }
        });
        let mut context = CheckerContext::new(&mut checker);
        let all = set(&[0, 1, 2, 3]);

        let result = FastDiag::default().find_diagnosis(&all, &all, &mut context);

        assert!(matches!(result, Err(DiagnosisError::Oracle(_))));
    }
}
