//! Error types for expression parsing and evaluation
//!
//! This module defines the error types used throughout the expression bridge.

use thiserror::Error;

/// Result type alias for expression operations
pub type Result<T> = std::result::Result<T, ExprError>;

/// Error type for expression parsing and evaluation
///
/// Parse errors surface when an expression is constructed; the remaining
/// variants surface when it is evaluated. Parameter macro misses never
/// appear here: the primary path reports "no result" instead of failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Parsing errors
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Runtime evaluation errors
    #[error("Evaluation error: {message}")]
    Evaluation { message: String },

    /// Division by zero or other arithmetic errors
    #[error("Arithmetic error: {message}")]
    Arithmetic { message: String },

    /// Conversion errors
    #[error("Conversion error: cannot convert {from} to {to}")]
    Conversion { from: String, to: String },
}

impl ExprError {
    /// Create a parse error
    pub fn parse_error(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an evaluation error
    pub fn evaluation_error(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    /// Create an arithmetic error
    pub fn arithmetic_error(message: impl Into<String>) -> Self {
        Self::Arithmetic {
            message: message.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion_error(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// True for errors raised while parsing, false for evaluation-time errors
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
