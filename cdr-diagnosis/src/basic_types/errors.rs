use std::error::Error;

use thiserror::Error;

use super::ConstraintSet;

/// The ways in which a diagnosis request can fail.
///
/// Finding no diagnosis or conflict is not an error; it is reported as an empty
/// [`ConstraintSet`].
#[derive(Debug, Error)]
pub enum DiagnosisError {
    /// The request was rejected before the consistency checker was consulted.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// The consistency checker failed; the request is aborted as a whole.
    #[error("consistency check failed: {0}")]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("the candidate set {candidates} is not a subset of the background set")]
    CandidatesNotInBackground { candidates: ConstraintSet },
    #[error("the candidate set and the background set share the constraints {shared}")]
    CandidatesOverlapBackground { shared: ConstraintSet },
}

/// An error raised by a [`crate::checkers::ConsistencyChecker`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OracleError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        OracleError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        OracleError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
