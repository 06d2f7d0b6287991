//! Error types for the evaluator.

use thiserror::Error;

/// Errors that can occur during evaluation.
///
/// Every variant aborts the whole `evaluate` call; no partial result is kept.
#[derive(Debug, Error)]
pub enum Error {
    /// The operator is registered neither as a function nor as a macro.
    #[error("The operator {0} is not allowed to evaluate")]
    UnsupportedOperator(String),

    /// A built-in's argument count or shape precondition was violated.
    #[error("Invalid arguments for {operator}: {message}")]
    InvalidArgument { operator: String, message: String },

    /// The tree is empty, is not a list, or its head is not a string.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// A `matches` pattern failed to compile.
    #[error("Invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Nesting or macro expansion went deeper than the configured limit.
    #[error("Recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: usize },

    /// A host-registered handler reported a failure.
    #[error("Handler error: {0}")]
    Handler(String),
}

impl Error {
    pub(crate) fn invalid_argument(operator: &str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            operator: operator.to_string(),
            message: message.into(),
        }
    }

    /// Build a [`Error::Handler`] from any displayable failure.
    pub fn handler(err: impl std::fmt::Display) -> Self {
        Error::Handler(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operator_names_operator() {
        let err = Error::UnsupportedOperator("bogus-op".to_string());
        assert_eq!(err.to_string(), "The operator bogus-op is not allowed to evaluate");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = Error::invalid_argument("matches", "expected 2 arguments, got 1");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for matches: expected 2 arguments, got 1"
        );
    }
}
