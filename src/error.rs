//! Structured error types for schema resolution and the instance codecs.

use std::fmt;
use thiserror::Error;

use crate::parser::ParserError;

/// A problem with a single field found while resolving a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A list-typed field with no element type (e.g. a bare `List`).
    #[error("{level}.{field}: no parameter type for list type `{declared}`")]
    MissingElementType {
        level: String,
        field: String,
        declared: String,
    },

    /// A declared type that is neither a scalar, a list, nor backed by a parser.
    #[error("{level}.{field}: unsupported type `{declared}`")]
    UnsupportedType {
        level: String,
        field: String,
        declared: String,
    },
}

impl SchemaError {
    /// Identifier of the offending field.
    pub fn field(&self) -> &str {
        match self {
            SchemaError::MissingElementType { field, .. }
            | SchemaError::UnsupportedType { field, .. } => field,
        }
    }
}

/// Every field-level error reported for one schema.
///
/// Resolution keeps going after the first bad field so that all of them
/// surface together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SchemaErrors {
    pub schema: String,
    pub errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema `{}` has {} error(s): ",
            self.schema,
            self.errors.len()
        )?;
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Errors raised while reading or writing the textual store format.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the instance-level operations.
///
/// Each operation either returns a complete result or one of these; there is
/// never a partially populated instance or store.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaErrors),

    /// A default literal does not parse as its declared kind.
    #[error("default value {literal:?} for `{field}` is not a valid {kind}")]
    Template {
        field: String,
        literal: String,
        kind: String,
    },

    /// A required key is absent from the store.
    #[error("No such key {0}")]
    MissingKey(String),

    /// A stored value cannot be read with the accessor its kind requires.
    #[error("value {value:?} for key `{key}` is not a valid {kind}")]
    InvalidValue {
        key: String,
        value: String,
        kind: String,
    },

    /// An instance value does not match the kind its field declares.
    #[error("value for `{field}` does not match its declared kind {expected}")]
    ValueMismatch { field: String, expected: String },

    /// An instance lacks a value for a field of its schema.
    #[error("instance has no value for field `{0}`")]
    MissingValue(String),

    /// An identifier that the schema does not declare.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub fn template(field: &str, literal: &str, kind: impl fmt::Display) -> Self {
        Error::Template {
            field: field.to_string(),
            literal: literal.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn invalid_value(key: &str, value: &str, kind: impl fmt::Display) -> Self {
        Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn mismatch(field: &str, expected: impl fmt::Display) -> Self {
        Error::ValueMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Result type for schema and codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_display_lists_every_field() {
        let errors = SchemaErrors {
            schema: "Demo".to_string(),
            errors: vec![
                SchemaError::MissingElementType {
                    level: "Demo".to_string(),
                    field: "doubles".to_string(),
                    declared: "List".to_string(),
                },
                SchemaError::UnsupportedType {
                    level: "Demo".to_string(),
                    field: "random".to_string(),
                    declared: "SomeRandomClass".to_string(),
                },
            ],
        };
        let text = errors.to_string();
        assert!(text.starts_with("schema `Demo` has 2 error(s)"));
        assert!(text.contains("Demo.doubles"));
        assert!(text.contains("`SomeRandomClass`"));
    }

    #[test]
    fn test_missing_key_message() {
        let err = Error::MissingKey("otherPrefix.randoms".to_string());
        assert_eq!(err.to_string(), "No such key otherPrefix.randoms");
    }
}
