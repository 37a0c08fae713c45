//! Decoding and loading errors.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// DecodeError represents a document node that does not conform to the schema.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("{path}: type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("{path}: unknown field: {field}")]
    UnknownField { path: String, field: String },

    #[error("{path}: field names must be strings")]
    NonStringKey { path: String },

    #[error("{path}: sequence elements must not be null")]
    NullElement { path: String },

    #[error("{message}")]
    SchemaError { message: String },
}

impl DecodeError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        DecodeError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        DecodeError::UnknownField {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Creates a schema error.
    pub fn schema_error(message: impl Into<String>) -> Self {
        DecodeError::SchemaError {
            message: message.into(),
        }
    }
}

/// DecodeErrors is a collection of decode errors.
#[derive(Debug, Clone, Default)]
pub struct DecodeErrors {
    errors: Vec<DecodeError>,
}

impl DecodeErrors {
    pub fn new() -> Self {
        DecodeErrors { errors: Vec::new() }
    }

    pub fn add(&mut self, error: DecodeError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodeError> {
        self.errors.iter()
    }
}

impl IntoIterator for DecodeErrors {
    type Item = DecodeError;
    type IntoIter = std::vec::IntoIter<DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeErrors {}

/// ParseError is returned when a schema or a document can't be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse schema: {0}")]
    Schema(#[source] serde_yaml::Error),

    #[error("failed to parse document: {0}")]
    Syntax(#[source] serde_yaml::Error),

    #[error("document does not match the schema:\n{0}")]
    Decode(DecodeErrors),

    #[error("document is empty")]
    Empty,
}

/// FormatError is returned when an input document can't be loaded. It is
/// fatal for the comparison that needed the document.
#[derive(Debug, Error)]
#[error("'{}' is not a valid document: {cause}", .path.display())]
pub struct FormatError {
    pub path: PathBuf,
    #[source]
    pub cause: FormatCause,
}

/// FormatCause is the underlying reason a document failed to load.
#[derive(Debug, Error)]
pub enum FormatCause {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no document payload found")]
    MissingPayload,

    #[error("invalid container: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl FormatError {
    pub fn new(path: impl Into<PathBuf>, cause: impl Into<FormatCause>) -> Self {
        FormatError {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::type_mismatch(".entities[0].name", "string", "int");
        assert_eq!(
            err.to_string(),
            ".entities[0].name: type mismatch: expected string, got int"
        );
    }

    #[test]
    fn test_decode_errors_collection() {
        let mut errs = DecodeErrors::new();
        assert!(errs.is_empty());

        errs.add(DecodeError::unknown_field("", "foo"));
        errs.add(DecodeError::schema_error("no type found matching: bar"));
        assert_eq!(errs.len(), 2);
        assert_eq!(errs.to_string(), ": unknown field: foo\nno type found matching: bar");
    }

    #[test]
    fn test_format_error_names_path() {
        let err = FormatError::new("old/solution.yaml", FormatCause::MissingPayload);
        assert_eq!(
            err.to_string(),
            "'old/solution.yaml' is not a valid document: no document payload found"
        );
    }
}
