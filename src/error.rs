//! Error types for netlist element construction.
//!
//! This module provides a unified error type [`NetlistError`] that covers
//! every way building an element can fail. Rendering a constructed element
//! never fails.

use thiserror::Error;

/// Result type alias using [`NetlistError`].
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Unified error type for all element construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetlistError {
    // ============ Element Errors ============
    /// Behavioral source polarity is neither voltage nor current
    #[error("Invalid behavioral source type '{expr_type}' (expected 'v' or 'i')")]
    InvalidPolarity { expr_type: String },

    /// Element kind selector is not one of the accepted letters
    #[error("Invalid element kind '{kind}' (expected one of {expected})")]
    InvalidKind { kind: String, expected: String },

    /// Element name does not start with the letter its type requires
    #[error("Invalid element name '{name}' (must begin with '{expected}')")]
    InvalidName { name: String, expected: char },

    /// Polynomial source control list does not fit its kind
    #[error("Invalid {kind} polynomial controls: {message}")]
    InvalidControls { kind: String, message: String },

    // ============ Value Errors ============
    /// Magnitude could not be read as a number
    #[error("Invalid SPICE value '{value}': {message}")]
    InvalidValue { value: String, message: String },

    /// Magnitude carries a suffix with no known multiplier
    #[error("Unknown metric suffix '{suffix}' in '{value}'")]
    UnknownSuffix { suffix: String, value: String },
}

impl NetlistError {
    /// Create an invalid polarity error
    pub fn invalid_polarity(expr_type: impl Into<String>) -> Self {
        Self::InvalidPolarity {
            expr_type: expr_type.into(),
        }
    }

    /// Create an invalid kind error
    pub fn invalid_kind(kind: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidKind {
            kind: kind.into(),
            expected: expected.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, expected: char) -> Self {
        Self::InvalidName {
            name: name.into(),
            expected,
        }
    }

    /// Create an invalid controls error
    pub fn invalid_controls(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidControls {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create an unknown suffix error
    pub fn unknown_suffix(suffix: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownSuffix {
            suffix: suffix.into(),
            value: value.into(),
        }
    }
}
