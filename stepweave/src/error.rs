//! Error types for injection operations

use thiserror::Error;

/// Exit code for malformed or missing input.
pub const EXIT_INPUT: i32 = 2;
/// Exit code for failures while processing well-formed input.
pub const EXIT_INTERNAL: i32 = 1;

/// Shape problems of a single step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// Only metadata keys, nothing to run
    #[error("no action found")]
    NoAction,
    /// More than one non-metadata key
    #[error("multiple actions found: {}", .0.join(", "))]
    MultipleActions(Vec<String>),
}

/// Errors raised by the format registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
}

/// Errors that abort a whole injection request
#[derive(Debug, Error)]
pub enum InjectError {
    /// A required request field is absent
    #[error("Missing required fields ({0})")]
    MissingField(String),
    /// The request or spec could not be read
    #[error("{0}")]
    InvalidInput(String),
    /// A caller-supplied markup pattern does not compile
    #[error("Invalid pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    /// The request asked for something other than injection
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    /// A step could not be rendered as an inline statement
    #[error("Cannot serialize step {index}: {source}")]
    Serialization {
        index: usize,
        #[source]
        source: StepError,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl InjectError {
    /// Process exit code for this error: 2 for input-shape problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            InjectError::MissingField(_)
            | InjectError::InvalidInput(_)
            | InjectError::InvalidPattern { .. }
            | InjectError::UnknownAction(_) => EXIT_INPUT,
            InjectError::Serialization { .. } | InjectError::Format(_) => EXIT_INTERNAL,
        }
    }
}

impl From<serde_json::Error> for InjectError {
    fn from(err: serde_json::Error) -> Self {
        InjectError::InvalidInput(format!("Invalid JSON input: {err}"))
    }
}
