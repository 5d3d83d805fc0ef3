use std::fmt::Debug;

use super::DirectDiagParameters;
use super::HsParameters;
use super::QuickXPlainParameters;
use crate::basic_types::ConstraintSet;
use crate::basic_types::DiagnosisError;
use crate::basic_types::InvalidInput;
use crate::diagnosis::FastDiag;
use crate::diagnosis::QuickXPlain;
use crate::engine::CheckerContext;

/// What the labels computed by a [`Labeler`] are.
///
/// The paths which close the tree are always of the other kind: when nodes are labelled with
/// diagnoses, the paths with an empty label are conflicts, and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    Diagnosis,
    Conflict,
}

impl LabelKind {
    pub fn dual(self) -> LabelKind {
        match self {
            LabelKind::Diagnosis => LabelKind::Conflict,
            LabelKind::Conflict => LabelKind::Diagnosis,
        }
    }
}

/// Computes the labels of the nodes of a [`super::HsTree`].
///
/// A labeler is responsible for the parameters of the root node; the parameters of all other
/// nodes are derived from those by [`HsParameters`] itself.
pub trait Labeler: Debug {
    fn label_kind(&self) -> LabelKind;

    /// Creates the parameters of the root node. No consistency checks may be performed here.
    fn root_parameters(
        &self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
    ) -> Result<HsParameters, InvalidInput>;

    /// Computes a label for a node with the given parameters. An empty label means the node's
    /// path needs no further expansion.
    fn label(
        &mut self,
        parameters: &HsParameters,
        context: &mut CheckerContext<'_>,
    ) -> Result<ConstraintSet, DiagnosisError>;
}

fn ensure_disjoint(
    candidates: &ConstraintSet,
    background: &ConstraintSet,
) -> Result<(), InvalidInput> {
    let shared = candidates.intersection(background);
    if shared.is_empty() {
        Ok(())
    } else {
        Err(InvalidInput::CandidatesOverlapBackground { shared })
    }
}

/// Labels nodes with minimal diagnoses computed by [`FastDiag`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FastDiagLabeler {
    fastdiag: FastDiag,
}

impl FastDiagLabeler {
    pub fn new(fastdiag: FastDiag) -> Self {
        FastDiagLabeler { fastdiag }
    }
}

impl Labeler for FastDiagLabeler {
    fn label_kind(&self) -> LabelKind {
        LabelKind::Diagnosis
    }

    fn root_parameters(
        &self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
    ) -> Result<HsParameters, InvalidInput> {
        ensure_disjoint(candidates, background)?;
        Ok(HsParameters::DirectDiag(DirectDiagParameters::new(
            candidates.clone(),
            background.clone(),
        )))
    }

    fn label(
        &mut self,
        parameters: &HsParameters,
        context: &mut CheckerContext<'_>,
    ) -> Result<ConstraintSet, DiagnosisError> {
        let all_constraints = context.union(parameters.background(), parameters.candidates());
        self.fastdiag
            .find_diagnosis(parameters.candidates(), &all_constraints, context)
    }
}

/// Labels nodes with minimal conflicts computed by [`QuickXPlain`].
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickXPlainLabeler {
    quickxplain: QuickXPlain,
}

impl QuickXPlainLabeler {
    pub fn new(quickxplain: QuickXPlain) -> Self {
        QuickXPlainLabeler { quickxplain }
    }
}

impl Labeler for QuickXPlainLabeler {
    fn label_kind(&self) -> LabelKind {
        LabelKind::Conflict
    }

    fn root_parameters(
        &self,
        candidates: &ConstraintSet,
        background: &ConstraintSet,
    ) -> Result<HsParameters, InvalidInput> {
        ensure_disjoint(candidates, background)?;
        Ok(HsParameters::QuickXPlain(QuickXPlainParameters::new(
            candidates.clone(),
            background.clone(),
        )))
    }

    fn label(
        &mut self,
        parameters: &HsParameters,
        context: &mut CheckerContext<'_>,
    ) -> Result<ConstraintSet, DiagnosisError> {
        self.quickxplain
            .find_conflict_set(parameters.candidates(), parameters.background(), context)
    }
}
