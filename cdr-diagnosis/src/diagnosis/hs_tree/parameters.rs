use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::ConstraintId;
use crate::basic_types::ConstraintSet;

/// The search state of a node of the hitting-set tree.
///
/// There is one variant per kind of node; each variant knows how the state of a child is derived
/// when the child's arc is added to the path. Parameters are immutable; a child always receives
/// fresh sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HsParameters {
    DirectDiag(DirectDiagParameters),
    QuickXPlain(QuickXPlainParameters),
}

impl HsParameters {
    /// The constraints which may still be part of the node's label.
    pub fn candidates(&self) -> &ConstraintSet {
        match self {
            HsParameters::DirectDiag(parameters) => parameters.candidates(),
            HsParameters::QuickXPlain(parameters) => parameters.candidates(),
        }
    }

    /// The constraints which are always present when checking the node's candidates.
    pub fn background(&self) -> &ConstraintSet {
        match self {
            HsParameters::DirectDiag(parameters) => parameters.known_good(),
            HsParameters::QuickXPlain(parameters) => parameters.background(),
        }
    }

    /// The parameters of the child reached via the edge labelled with `arc`.
    pub(crate) fn child(&self, arc: ConstraintId) -> HsParameters {
        match self {
            HsParameters::DirectDiag(parameters) => {
                HsParameters::DirectDiag(DirectDiagParameters::new(
                    parameters.candidates.without(arc),
                    parameters.known_good.with(arc),
                ))
            }
            HsParameters::QuickXPlain(parameters) => {
                HsParameters::QuickXPlain(QuickXPlainParameters::new(
                    parameters.candidates.without(arc),
                    parameters.background.clone(),
                ))
            }
        }
    }
}

impl Display for HsParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HsParameters::DirectDiag(parameters) => write!(
                f,
                "DirectDiagParameters{{C={}, B={}}}",
                parameters.candidates, parameters.known_good
            ),
            HsParameters::QuickXPlain(parameters) => write!(
                f,
                "QuickXPlainParameters{{C={}, B={}}}",
                parameters.candidates, parameters.background
            ),
        }
    }
}

/// Node state for labelling with diagnoses.
///
/// `C` holds the constraints which may still be part of a diagnosis; `B` holds the constraints
/// which are known to be kept, i.e. the fixed background together with the constraints on the
/// node's path. A diagnosis of the node is searched for in `C` against `B ∪ C`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectDiagParameters {
    candidates: ConstraintSet,
    known_good: ConstraintSet,
}

impl DirectDiagParameters {
    pub fn new(candidates: ConstraintSet, known_good: ConstraintSet) -> Self {
        DirectDiagParameters {
            candidates,
            known_good,
        }
    }

    pub fn candidates(&self) -> &ConstraintSet {
        &self.candidates
    }

    pub fn known_good(&self) -> &ConstraintSet {
        &self.known_good
    }
}

/// Node state for labelling with conflicts.
///
/// `C` holds the constraints which have not been removed on the node's path; `B` is the fixed
/// background. A conflict of the node is searched for in `C` together with `B`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickXPlainParameters {
    candidates: ConstraintSet,
    background: ConstraintSet,
}

impl QuickXPlainParameters {
    pub fn new(candidates: ConstraintSet, background: ConstraintSet) -> Self {
        QuickXPlainParameters {
            candidates,
            background,
        }
    }

    pub fn candidates(&self) -> &ConstraintSet {
        &self.candidates
    }

    pub fn background(&self) -> &ConstraintSet {
        &self.background
    }
}
