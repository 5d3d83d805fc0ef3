use std::fs;
use std::path::Path;

use cdr_diagnosis::checkers::BoundedIntegerChecker;
use cdr_diagnosis::checkers::Comparator;
use cdr_diagnosis::checkers::LinearConstraint;
use cdr_diagnosis::checkers::VariableId;
use cdr_diagnosis::model::DiagnosisModel;
use cdr_diagnosis::OracleError;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ModelError {
    #[error("failed to read the model: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse the model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("constraint '{constraint}' refers to undeclared variable '{variable}'")]
    UnknownVariable { constraint: String, variable: String },
    #[error("the name '{0}' is declared twice")]
    DuplicateName(String),
    #[error("variable '{name}' has an empty domain [{lb}, {ub}]")]
    EmptyDomain { name: String, lb: i32, ub: i32 },
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    name: String,
    variables: Vec<VariableDefinition>,
    constraints: Vec<ConstraintDefinition>,
    /// Reverse the order of the possibly faulty constraints.
    #[serde(default)]
    reverse: bool,
}

#[derive(Debug, Deserialize)]
struct VariableDefinition {
    name: String,
    lb: i32,
    ub: i32,
}

#[derive(Debug, Deserialize)]
struct ConstraintDefinition {
    name: String,
    /// Pairs of `[coefficient, variable name]`.
    terms: Vec<(i32, String)>,
    comparator: Comparator,
    rhs: i32,
    /// Background constraints are assumed to be correct.
    #[serde(default)]
    background: bool,
}

/// A diagnosis model together with the checker which knows what its constraints mean.
#[derive(Debug)]
pub(crate) struct LoadedModel {
    pub(crate) model: DiagnosisModel,
    pub(crate) checker: BoundedIntegerChecker,
}

pub(crate) fn load(path: impl AsRef<Path>) -> Result<LoadedModel, ModelError> {
    let json = fs::read_to_string(path)?;

    parse(&json)
}

pub(crate) fn parse(json: &str) -> Result<LoadedModel, ModelError> {
    build(serde_json::from_str(json)?)
}

fn build(model_file: ModelFile) -> Result<LoadedModel, ModelError> {
    let mut checker = BoundedIntegerChecker::default();
    let mut variables: Vec<(String, VariableId)> = Vec::new();

    for variable in model_file.variables {
        if variable.lb > variable.ub {
            return Err(ModelError::EmptyDomain {
                name: variable.name,
                lb: variable.lb,
                ub: variable.ub,
            });
        }
        if variables.iter().any(|(name, _)| *name == variable.name) {
            return Err(ModelError::DuplicateName(variable.name));
        }

        let id = checker.new_variable(variable.name.clone(), variable.lb, variable.ub);
        variables.push((variable.name, id));
    }

    let mut model = DiagnosisModel::new(model_file.name);
    for constraint in model_file.constraints {
        let terms = constraint
            .terms
            .iter()
            .map(|(coefficient, variable)| {
                variables
                    .iter()
                    .find(|(name, _)| name == variable)
                    .map(|&(_, id)| (*coefficient, id))
                    .ok_or_else(|| ModelError::UnknownVariable {
                        constraint: constraint.name.clone(),
                        variable: variable.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = if constraint.background {
            model.add_background(constraint.name.clone())
        } else {
            model.add_possibly_faulty(constraint.name.clone())
        }
        .ok_or_else(|| ModelError::DuplicateName(constraint.name.clone()))?;

        checker.define(
            id,
            LinearConstraint::new(terms, constraint.comparator, constraint.rhs),
        )?;
    }

    if model_file.reverse {
        model.reverse_possibly_faulty();
    }

    debug!(
        "Loaded model '{}' with {} possibly faulty and {} background constraints",
        model.name(),
        model.possibly_faulty().len(),
        model.background().len()
    );

    Ok(LoadedModel { model, checker })
}
