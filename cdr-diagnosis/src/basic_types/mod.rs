mod constraint_id;
mod constraint_set;
mod errors;

pub use constraint_id::ConstraintId;
pub use constraint_set::ConstraintSet;
pub use errors::DiagnosisError;
pub use errors::InvalidInput;
pub use errors::OracleError;

pub(crate) use crate::containers::HashMap;
pub(crate) use crate::containers::HashSet;
