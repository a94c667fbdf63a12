//! Error types for StableTable.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Identifier and ordering errors signal caller misuse and are returned
//! before the table is touched. Parse errors come from untrusted text and are
//! usually recovered from per cell by interchange code.

use std::fmt;

use thiserror::Error;

use crate::id::{ColumnId, RowId};
use crate::types::ColumnType;

/// Result alias used throughout StableTable.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for StableTable operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid row identifier error.
    #[must_use]
    pub fn invalid_row(id: RowId) -> Self {
        Self::new(ErrorKind::InvalidRowIdentifier(id))
    }

    /// Creates an invalid column identifier error.
    #[must_use]
    pub fn invalid_column(id: ColumnId) -> Self {
        Self::new(ErrorKind::InvalidColumnIdentifier(id))
    }

    /// Creates an invalid order argument error.
    #[must_use]
    pub fn invalid_order(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOrderArgument(message.into()))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ColumnType, actual: ColumnType) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a text parse error for a value of the given kind.
    #[must_use]
    pub fn parse(ty: ColumnType, text: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError {
            ty,
            text: text.into(),
        })
    }

    /// Creates an interchange format error.
    #[must_use]
    pub fn interchange(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Interchange(message.into()))
    }

    /// Returns true if this error reports a stale or unknown identifier.
    #[must_use]
    pub const fn is_invalid_identifier(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidRowIdentifier(_) | ErrorKind::InvalidColumnIdentifier(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Row identifier is out of range or refers to a removed row.
    #[error("invalid row identifier: {0}")]
    InvalidRowIdentifier(RowId),

    /// Column identifier is out of range or refers to a removed column.
    #[error("invalid column identifier: {0}")]
    InvalidColumnIdentifier(ColumnId),

    /// Order position or permutation is malformed.
    #[error("invalid order argument: {0}")]
    InvalidOrderArgument(String),

    /// Value kind does not match the column's declared kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The column's declared kind.
        expected: ColumnType,
        /// The kind that was supplied.
        actual: ColumnType,
    },

    /// Text could not be parsed as a value of the given kind.
    #[error("cannot parse {text:?} as {ty}")]
    ParseError {
        /// The kind the text was parsed as.
        ty: ColumnType,
        /// The offending text.
        text: String,
    },

    /// Kind name is not one of the supported kinds.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),

    /// Sort key kind has no comparator.
    #[error("unsupported sort key type: {0}")]
    UnsupportedSortKeyType(ColumnType),

    /// Malformed interchange document.
    #[error("interchange error: {0}")]
    Interchange(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
///
/// Interchange code attaches the document, record number and field so that
/// a bad cell can be located in the source file.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source document name or path.
    pub source: Option<String>,
    /// Record number in the source (1-indexed, header included).
    pub record: Option<u64>,
    /// Field (column) name.
    pub field: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source document.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the record number.
    #[must_use]
    pub fn with_record(mut self, record: u64) -> Self {
        self.record = Some(record);
        self
    }

    /// Sets the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            wrote = true;
        }
        if let Some(record) = self.record {
            if wrote {
                write!(f, " ")?;
            }
            write!(f, "at record {record}")?;
            wrote = true;
        }
        if let Some(field) = &self.field {
            if wrote {
                write!(f, " ")?;
            }
            write!(f, "field {field:?}")?;
        }
        Ok(())
    }
}
