use std::time::Instant;

use log::debug;
use log::trace;

use crate::basic_types::ConstraintSet;
use crate::basic_types::DiagnosisError;
use crate::basic_types::InvalidInput;
use crate::basic_types::OracleError;
use crate::engine::CheckerContext;

/// Options which determine how [`QuickXPlain`] spends consistency checks.
#[derive(Debug, Clone, Copy)]
pub struct QuickXPlainOptions {
    /// Only check the consistency of the background in a recursive call if the sibling call
    /// returned a non-empty conflict; otherwise the background is the parent's, which is known to
    /// be consistent. Disabling this does not change the returned conflict.
    pub skip_redundant_checks: bool,
}

impl Default for QuickXPlainOptions {
    fn default() -> Self {
        Self {
            skip_redundant_checks: true,
        }
    }
}

/// Computes one minimal conflict set by divide-and-conquer; the dual of
/// [`crate::diagnosis::FastDiag`].
///
/// ```text
/// QuickXPlain(C, B): Δ
///   if isEmpty(C) or consistent(B ∪ C) or inconsistent(B) return Φ
///   else return QX(Φ, C, B)
///
/// QX(D, C = {c1..cq}, B): Δ
///   if D != Φ and inconsistent(B) return Φ
///   if singleton(C) return C
///   C1 = {c1..ck}, C2 = {ck+1..cq} with k = ⌈q/2⌉
///   D1 = QX(C1, C2, B ∪ C1)
///   D2 = QX(D1, C1, B ∪ D1)
///   return D1 ∪ D2
/// ```
///
/// Constraints at the start of `C` are preferred to be part of the conflict.
///
/// See: U. Junker, "QUICKXPLAIN: Preferred explanations and relaxations for over-constrained
/// problems", AAAI 2004.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickXPlain {
    options: QuickXPlainOptions,
}

impl QuickXPlain {
    pub fn with_options(options: QuickXPlainOptions) -> Self {
        QuickXPlain { options }
    }

    /// Returns a minimal subset of `candidates` which is inconsistent together with `background`,
    /// or an empty set if there is none: when `candidates` is empty, when `background ∪
    /// candidates` is consistent, or when `background` is inconsistent by itself.
    ///
    /// `candidates` and `background` have to be disjoint.
    pub fn find_conflict_set(
        &self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
        context: &mut CheckerContext<'_>,
    ) -> Result<ConstraintSet, DiagnosisError> {
        debug!("Identifying conflict for [C={candidates}, B={background}]");

        let shared = candidates.intersection(background);
        if !shared.is_empty() {
            return Err(InvalidInput::CandidatesOverlapBackground { shared }.into());
        }

        if candidates.is_empty() {
            debug!("No conflict found");
            return Ok(ConstraintSet::new());
        }

        let all = context.union(background, candidates);
        if context.is_consistent(&all)? {
            debug!("No conflict found");
            return Ok(ConstraintSet::new());
        }

        if !background.is_empty() && !context.is_consistent(background)? {
            debug!("No conflict found, the background is inconsistent by itself");
            return Ok(ConstraintSet::new());
        }

        context.statistics_mut().num_quickxplain_calls += 1;
        let started_at = Instant::now();
        let conflict = self.qx(&ConstraintSet::new(), candidates, background, context, 0)?;
        let elapsed_ns = started_at.elapsed().as_nanos() as u64;
        context.statistics_mut().time_spent_in_quickxplain_ns += elapsed_ns;

        debug!("Found conflict [cs={conflict}]");
        Ok(conflict)
    }

    fn qx(
        &self,
        sibling_conflict: &ConstraintSet,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
        context: &mut CheckerContext<'_>,
        depth: usize,
    ) -> Result<ConstraintSet, OracleError> {
        trace!(
            "{:depth$}QX [D={sibling_conflict}, C={candidates}, B={background}]",
            ""
        );

        let needs_check = !sibling_conflict.is_empty() || !self.options.skip_redundant_checks;
        if needs_check && !context.is_consistent(background)? {
            trace!("{:depth$}return Φ", "");
            return Ok(ConstraintSet::new());
        }

        if candidates.len() == 1 {
            trace!("{:depth$}return {candidates}", "");
            return Ok(candidates.clone());
        }

        let (first_half, second_half) = context.split(candidates);
        trace!("{:depth$}split C into [C1={first_half}, C2={second_half}]", "");

        let background_with_first = context.union(background, &first_half);
        context.statistics_mut().num_left_branch_calls += 1;
        context.statistics_mut().num_quickxplain_calls += 1;
        let first_conflict = self.qx(
            &first_half,
            &second_half,
            &background_with_first,
            context,
            depth + 1,
        )?;

        let background_with_conflict = context.union(background, &first_conflict);
        context.statistics_mut().num_right_branch_calls += 1;
        context.statistics_mut().num_quickxplain_calls += 1;
        let second_conflict = self.qx(
            &first_conflict,
            &first_half,
            &background_with_conflict,
            context,
            depth + 1,
        )?;

        trace!("{:depth$}return [D1={first_conflict} ∪ D2={second_conflict}]", "");
        Ok(context.union(&first_conflict, &second_conflict))
    }
}
