//! Error types for BrainrotSQL.

use thiserror::Error;

use crate::keywords::Operation;

/// The main error type for BrainrotSQL operations.
///
/// Every variant is fatal to the call that produced it: the compiler never
/// returns a partial result and never retries.
#[derive(Debug, Error)]
pub enum BrainrotError {
    /// A token did not fit the grammar at the current state.
    #[error("Brainrot Error: Expected one of [{}] but got [{actual}]", .expected.join(", "))]
    UnexpectedToken {
        expected: Vec<String>,
        actual: String,
    },

    /// The input ended while the parser still needed something.
    #[error("Brainrot Error: Unexpected end of query. Expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    /// An alias was registered under two different operations.
    #[error("Brainrot Error: Alias '{alias}' is already bound to {bound}, cannot bind it to {requested}")]
    DuplicateBinding {
        alias: String,
        bound: Operation,
        requested: Operation,
    },

    /// An alias the tokenizer could never produce as a single token.
    #[error("Brainrot Error: Invalid alias '{0}'")]
    InvalidAlias(String),

    /// The first token does not start any known statement.
    #[error("Brainrot Error: Unsupported query kind [{0}]. Brainrot intensifies!")]
    UnsupportedQueryKind(String),

    /// BEGIN with a transaction open, or COMMIT/ROLLBACK with none.
    #[error("Brainrot Error: {0}")]
    TransactionState(String),

    /// Connection error.
    #[error("Brainrot Error: Connection error: {0}")]
    Connection(String),

    /// Query execution error reported by the backend.
    #[error("Brainrot Error: Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Brainrot Error: Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("Brainrot Error: IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrainrotError {
    /// Create an unexpected-token error.
    pub fn unexpected<I, S>(expected: I, actual: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnexpectedToken {
            expected: expected.into_iter().map(Into::into).collect(),
            actual: actual.into(),
        }
    }

    /// Create an unexpected-end-of-input error.
    pub fn end_of_input(expected: impl Into<String>) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.into(),
        }
    }

    /// Whether this error came from the compiler rather than the backend.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedToken { .. }
                | Self::UnexpectedEndOfInput { .. }
                | Self::UnsupportedQueryKind(_)
        )
    }
}

impl From<sqlx::Error> for BrainrotError {
    fn from(err: sqlx::Error) -> Self {
        Self::Execution(err.to_string())
    }
}

/// Result type alias for BrainrotSQL operations.
pub type BrainrotResult<T> = Result<T, BrainrotError>;
