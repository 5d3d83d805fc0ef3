//! The knowledge base which names the constraints, and the [`DiagnosisModel`] which splits them
//! into possibly faulty constraints and a fixed background.
//!
//! The diagnosis algorithms only see [`ConstraintId`]s; the model is where those identifiers get
//! a meaning for the user.
use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::ConstraintId;
use crate::basic_types::ConstraintSet;
use crate::basic_types::HashMap;
use crate::containers::KeyedVec;

/// The names of all constraints, indexed by [`ConstraintId`].
#[derive(Debug, Default, Clone)]
pub struct KnowledgeBase {
    names: KeyedVec<ConstraintId, String>,
    ids_by_name: HashMap<String, ConstraintId>,
}

impl KnowledgeBase {
    /// Registers a new constraint. Returns `None` if a constraint with the same name exists.
    pub fn new_constraint(&mut self, name: impl Into<String>) -> Option<ConstraintId> {
        let name = name.into();
        if self.ids_by_name.contains_key(&name) {
            return None;
        }

        let id = self.names.push(name.clone());
        let _ = self.ids_by_name.insert(name, id);
        Some(id)
    }

    pub fn num_constraints(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, constraint: ConstraintId) -> Option<&str> {
        self.names.get(constraint).map(String::as_str)
    }

    pub fn find(&self, name: &str) -> Option<ConstraintId> {
        self.ids_by_name.get(name).copied()
    }

    /// All constraints, in the order in which they were registered.
    pub fn constraints(&self) -> ConstraintSet {
        self.names.keys().collect()
    }

    /// Displays `constraints` by name.
    pub fn describe<'a>(&'a self, constraints: &'a ConstraintSet) -> Described<'a> {
        Described {
            knowledge_base: self,
            constraints,
        }
    }
}

/// A [`ConstraintSet`] displayed with the names from a [`KnowledgeBase`].
#[derive(Debug, Clone, Copy)]
pub struct Described<'a> {
    knowledge_base: &'a KnowledgeBase,
    constraints: &'a ConstraintSet,
}

impl Display for Described<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, &constraint) in self.constraints.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match self.knowledge_base.name(constraint) {
                Some(name) => write!(f, "{name}")?,
                None => write!(f, "{constraint}")?,
            }
        }
        write!(f, "}}")
    }
}

/// A diagnosis problem: an ordered set of possibly faulty constraints and a background of
/// constraints which are assumed to be correct.
///
/// The order of the possibly faulty constraints is the preference order of the algorithms:
/// FastDiag prefers to blame constraints at the end, QuickXPlain prefers to blame constraints at
/// the start.
#[derive(Debug, Clone)]
pub struct DiagnosisModel {
    name: String,
    knowledge_base: KnowledgeBase,
    possibly_faulty: ConstraintSet,
    background: ConstraintSet,
}

impl DiagnosisModel {
    pub fn new(name: impl Into<String>) -> Self {
        DiagnosisModel {
            name: name.into(),
            knowledge_base: KnowledgeBase::default(),
            possibly_faulty: ConstraintSet::new(),
            background: ConstraintSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Appends a possibly faulty constraint. Returns `None` if the name is already taken.
    pub fn add_possibly_faulty(&mut self, name: impl Into<String>) -> Option<ConstraintId> {
        let id = self.knowledge_base.new_constraint(name)?;
        let _ = self.possibly_faulty.insert(id);
        Some(id)
    }

    /// Appends a background constraint. Returns `None` if the name is already taken.
    pub fn add_background(&mut self, name: impl Into<String>) -> Option<ConstraintId> {
        let id = self.knowledge_base.new_constraint(name)?;
        let _ = self.background.insert(id);
        Some(id)
    }

    pub fn possibly_faulty(&self) -> &ConstraintSet {
        &self.possibly_faulty
    }

    pub fn background(&self) -> &ConstraintSet {
        &self.background
    }

    /// The background followed by the possibly faulty constraints.
    pub fn all_constraints(&self) -> ConstraintSet {
        self.background.union(&self.possibly_faulty)
    }

    /// Reverses the preference order of the possibly faulty constraints.
    pub fn reverse_possibly_faulty(&mut self) {
        self.possibly_faulty = self.possibly_faulty.reversed();
    }
}
