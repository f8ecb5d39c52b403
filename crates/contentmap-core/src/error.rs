//! Error types for the Contentmap core library
//!
//! This module defines the error handling system for Contentmap, using
//! thiserror for ergonomic error definitions and anyhow for flexible error
//! contexts coming out of collaborators.
//!
//! Recoverable conditions (unparsable booleans and numbers, absent media,
//! missing metadata) never become errors; they degrade to defaults or to
//! "no value" inside the extractors. What remains here are structural
//! problems that must abort model construction.

use crate::value::ValueKind;
use std::fmt;
use thiserror::Error;

/// Main error type for Contentmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A raw value could not be converted into the requested type
    #[error("Conversion failed: cannot convert '{value}' to {target}: {message}")]
    Conversion {
        value: String,
        target: String,
        message: String,
    },

    /// An extractor received a raw value of the wrong variant
    #[error("Unexpected raw value for {extractor} extractor: expected {expected}, found {found}")]
    UnexpectedRawValue {
        extractor: String,
        expected: String,
        found: RawKind,
    },

    /// Invalid property or model-type configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        property: Option<String>,
    },

    /// Extractor output does not match the declared property type
    #[error("Type mismatch on property '{property}': expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// No registered model type matches the requested key
    #[error("Unknown model type: {key}")]
    UnknownModelType { key: String },

    /// Nested model construction went deeper than allowed
    #[error("Recursion limit reached while building nested models: depth {depth} exceeds {max_depth}")]
    RecursionLimit { depth: usize, max_depth: usize },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Variant tag of a raw field value, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Text,
    Number,
    Date,
    Keyword,
    Component,
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawKind::Text => write!(f, "text"),
            RawKind::Number => write!(f, "number"),
            RawKind::Date => write!(f, "date"),
            RawKind::Keyword => write!(f, "keyword"),
            RawKind::Component => write!(f, "component"),
        }
    }
}

impl Error {
    /// Shorthand for a configuration error tied to a property
    pub fn configuration(message: impl Into<String>, property: Option<&str>) -> Self {
        Error::Configuration {
            message: message.into(),
            property: property.map(str::to_string),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownModelType {
            key: "Article".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown model type: Article");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = Error::TypeMismatch {
            property: "heading".to_string(),
            expected: ValueKind::Text,
            found: ValueKind::Number,
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch on property 'heading': expected text, found number"
        );
    }

    #[test]
    fn test_raw_kind_display() {
        assert_eq!(RawKind::Keyword.to_string(), "keyword");
        assert_eq!(RawKind::Component.to_string(), "component");
    }

    #[test]
    fn test_from_anyhow() {
        let err: Error = anyhow::anyhow!("renderer exploded").into();
        assert!(matches!(err, Error::Internal { .. }));
        assert!(err.to_string().contains("renderer exploded"));
    }
}
