use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;
use log::trace;
use pumpkin_solver::constraints;
use pumpkin_solver::constraints::Constraint;
use pumpkin_solver::results::SatisfactionResult;
use pumpkin_solver::termination::Indefinite;
use pumpkin_solver::variables::AffineView;
use pumpkin_solver::variables::DomainId;
use pumpkin_solver::variables::TransformableVariable;
use pumpkin_solver::Solver;
use serde::Deserialize;
use serde::Serialize;

use super::ConsistencyChecker;
use crate::basic_types::ConstraintId;
use crate::basic_types::ConstraintSet;
use crate::basic_types::HashMap;
use crate::basic_types::OracleError;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A handle to an integer variable of a [`BoundedIntegerChecker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    pub id: u32,
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

#[derive(Clone, Debug)]
struct Domain {
    name: String,
    lower_bound: i32,
    upper_bound: i32,
}

impl Domain {
    fn is_empty(&self) -> bool {
        self.lower_bound > self.upper_bound
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl Display for Comparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::LessOrEqual => write!(f, "<="),
            Comparator::GreaterOrEqual => write!(f, ">="),
            Comparator::Equal => write!(f, "=="),
            Comparator::NotEqual => write!(f, "!="),
        }
    }
}

/// A constraint of the form `sum(coefficient * variable) <comparator> rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    terms: Vec<(i32, VariableId)>,
    comparator: Comparator,
    rhs: i32,
}

impl LinearConstraint {
    pub fn new(terms: Vec<(i32, VariableId)>, comparator: Comparator, rhs: i32) -> Self {
        LinearConstraint {
            terms,
            comparator,
            rhs,
        }
    }

    pub fn less_or_equal(terms: Vec<(i32, VariableId)>, rhs: i32) -> Self {
        Self::new(terms, Comparator::LessOrEqual, rhs)
    }

    pub fn greater_or_equal(terms: Vec<(i32, VariableId)>, rhs: i32) -> Self {
        Self::new(terms, Comparator::GreaterOrEqual, rhs)
    }

    pub fn equal(terms: Vec<(i32, VariableId)>, rhs: i32) -> Self {
        Self::new(terms, Comparator::Equal, rhs)
    }

    pub fn not_equal(terms: Vec<(i32, VariableId)>, rhs: i32) -> Self {
        Self::new(terms, Comparator::NotEqual, rhs)
    }

    fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.terms.iter().map(|&(_, variable)| variable)
    }

    /// The terms with a non-zero coefficient and the right-hand side, rewritten such that
    /// `>=` becomes `<=`. Returns [`None`] when the rewrite does not fit in an `i32`.
    fn normalised(&self) -> Option<(Vec<(i32, VariableId)>, i32)> {
        let terms = self
            .terms
            .iter()
            .filter(|&&(coefficient, _)| coefficient != 0)
            .copied();

        match self.comparator {
            Comparator::GreaterOrEqual => Some((
                terms
                    .map(|(coefficient, variable)| Some((coefficient.checked_neg()?, variable)))
                    .collect::<Option<Vec<_>>>()?,
                self.rhs.checked_neg()?,
            )),
            _ => Some((terms.collect(), self.rhs)),
        }
    }

    /// The smallest and largest value of the left-hand side of the normalised constraint, or
    /// [`None`] if one of them overflows an `i32`.
    fn left_hand_side_bounds(
        terms: &[(i32, VariableId)],
        domains: &KeyedVec<VariableId, Domain>,
    ) -> Option<(i32, i32)> {
        terms
            .iter()
            .try_fold((0_i32, 0_i32), |(lower, upper), &(coefficient, variable)| {
                let domain = &domains[variable];
                let at_lower = coefficient.checked_mul(domain.lower_bound)?;
                let at_upper = coefficient.checked_mul(domain.upper_bound)?;
                Some((
                    lower.checked_add(at_lower.min(at_upper))?,
                    upper.checked_add(at_lower.max(at_upper))?,
                ))
            })
    }

    /// Posts the constraint to `solver`; returns `false` if the solver detected that it cannot
    /// be satisfied.
    fn post(
        &self,
        solver: &mut Solver,
        variables: &HashMap<VariableId, DomainId>,
    ) -> Result<bool, OracleError> {
        let (terms, rhs) = self
            .normalised()
            .ok_or_else(|| OracleError::new("constraint overflows the integer range"))?;

        if terms.is_empty() {
            return Ok(match self.comparator {
                Comparator::LessOrEqual | Comparator::GreaterOrEqual => 0 <= rhs,
                Comparator::Equal => rhs == 0,
                Comparator::NotEqual => rhs != 0,
            });
        }

        let terms = terms
            .iter()
            .map(|&(coefficient, variable)| variables[&variable].scaled(coefficient))
            .collect::<Box<[_]>>();

        Ok(match self.comparator {
            Comparator::LessOrEqual | Comparator::GreaterOrEqual => {
                post_linear(solver, terms, rhs, constraints::less_than_or_equals)
            }
            Comparator::Equal => post_linear(solver, terms, rhs, constraints::equals),
            Comparator::NotEqual => post_linear(solver, terms, rhs, constraints::not_equals),
        })
    }
}

/// Posts `sum(terms) <comparator> rhs` to the `solver`, returning `false` if this leads to a
/// conflict at the root.
fn post_linear<C: Constraint>(
    solver: &mut Solver,
    terms: Box<[AffineView<DomainId>]>,
    rhs: i32,
    create_constraint: impl FnOnce(Box<[AffineView<DomainId>]>, i32) -> C,
) -> bool {
    create_constraint(terms, rhs).post(solver, None).is_ok()
}

/// A [`ConsistencyChecker`] for linear constraints over bounded integer variables.
///
/// Every check builds a fresh [`Solver`] which only contains the variables and constraints of the
/// checked set, so no state is shared between checks. Constraints are validated when they are
/// defined: every intermediate sum has to fit in an `i32`, which is the value type of the solver.
#[derive(Debug, Default)]
pub struct BoundedIntegerChecker {
    domains: KeyedVec<VariableId, Domain>,
    constraints: HashMap<ConstraintId, LinearConstraint>,
}

impl BoundedIntegerChecker {
    pub fn new_variable(
        &mut self,
        name: impl Into<String>,
        lower_bound: i32,
        upper_bound: i32,
    ) -> VariableId {
        self.domains.push(Domain {
            name: name.into(),
            lower_bound,
            upper_bound,
        })
    }

    pub fn variable_name(&self, variable: VariableId) -> Option<&str> {
        self.domains.get(variable).map(|domain| domain.name.as_str())
    }

    /// Defines the meaning of `constraint`, replacing an earlier definition if there was one.
    ///
    /// Fails if the definition refers to an unknown variable, or if its left-hand side can take
    /// values outside of the `i32` range.
    pub fn define(
        &mut self,
        constraint: ConstraintId,
        definition: LinearConstraint,
    ) -> Result<(), OracleError> {
        if let Some(unknown) = definition
            .variables()
            .find(|variable| variable.index() >= self.domains.len())
        {
            return Err(OracleError::new(format!(
                "constraint {constraint} refers to unknown variable {}",
                unknown.id
            )));
        }

        let fits = definition.normalised().is_some_and(|(terms, _)| {
            LinearConstraint::left_hand_side_bounds(&terms, &self.domains).is_some()
        });
        if !fits {
            return Err(OracleError::new(format!(
                "constraint {constraint} overflows the integer range of the solver"
            )));
        }

        let _ = self.constraints.insert(constraint, definition);
        Ok(())
    }
}

impl ConsistencyChecker for BoundedIntegerChecker {
    fn is_consistent(&mut self, constraints: &ConstraintSet) -> Result<bool, OracleError> {
        let definitions = constraints
            .iter()
            .map(|constraint| {
                self.constraints.get(constraint).ok_or_else(|| {
                    OracleError::new(format!("no definition for constraint {constraint}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let used = definitions
            .iter()
            .flat_map(|definition| definition.variables())
            .unique()
            .sorted()
            .collect_vec();
        if used.iter().any(|&variable| self.domains[variable].is_empty()) {
            trace!("checked {constraints}: a variable has an empty domain");
            return Ok(false);
        }

        let mut solver = Solver::default();
        let variables: HashMap<VariableId, DomainId> = used
            .iter()
            .map(|&variable| {
                let domain = &self.domains[variable];
                (
                    variable,
                    solver.new_bounded_integer(domain.lower_bound, domain.upper_bound),
                )
            })
            .collect();

        for definition in &definitions {
            if !definition.post(&mut solver, &variables)? {
                trace!("checked {constraints}: conflict at the root");
                return Ok(false);
            }
        }

        let mut brancher = solver.default_brancher_over_all_propositional_variables();
        let consistent = match solver.satisfy(&mut brancher, &mut Indefinite) {
            SatisfactionResult::Satisfiable(_) => true,
            SatisfactionResult::Unsatisfiable => false,
            SatisfactionResult::Unknown => {
                return Err(OracleError::new(format!(
                    "the solver could not decide the consistency of {constraints}"
                )))
            }
        };
        trace!("checked {constraints}: consistent={consistent}");

        Ok(consistent)
    }
}
