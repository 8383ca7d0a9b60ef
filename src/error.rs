// SPDX-License-Identifier: MIT

//! Typed error handling for pipeline-predicates
//!
//! `ExpressionError` covers the two construction-time failures of the
//! expression algebra. `ConditionError` is the top-level type returned by
//! the parser and the decoder.

use thiserror::Error;

/// Top-level error type for pipeline-predicates
#[derive(Debug, Error)]
pub enum ConditionError {
    /// Expression construction errors
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Condition text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A condition references a name with no placeholder bound to it
    #[error("Unknown binding '{name}'")]
    UnknownBinding { name: String },

    /// Artifact type names must be non-empty
    #[error("Invalid artifact type: {0}")]
    InvalidArtifactType(String),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building an expression tree
#[derive(Debug, Error, PartialEq)]
pub enum ExpressionError {
    /// A logical expression has the wrong operand count for its operator,
    /// or a serialized node has an unknown shape
    #[error("Malformed expression: {0}")]
    Construction(String),

    /// Right-hand side of a comparison is neither a placeholder nor an
    /// int, float or string literal
    #[error("Unsupported comparison operand: {0}")]
    ArgumentType(String),
}

pub type Result<T> = std::result::Result<T, ConditionError>;

impl ConditionError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create an unknown binding error
    pub fn unknown_binding(name: impl Into<String>) -> Self {
        Self::UnknownBinding { name: name.into() }
    }

    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Expression(ExpressionError::Construction(message.into()))
    }

    /// Create an argument type error
    pub fn argument_type(message: impl Into<String>) -> Self {
        Self::Expression(ExpressionError::ArgumentType(message.into()))
    }
}
