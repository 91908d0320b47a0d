//! Error type shared by the encoder, the decoder and the table model.

use crate::schema::{DataType, SchemaRef};
use std::fmt;
use thiserror::Error;

/// Which bound an encoder limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityKind {
    /// Number of rows in one table.
    Rows,
    /// Number of flattened list values in one table.
    Values,
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Values => f.write_str("list values"),
        }
    }
}

/// Errors produced while building, encoding, decoding or converting a [`Table`](crate::Table).
///
/// Every variant is reported to the caller of the operation that detected it;
/// nothing is retried and no partial output accompanies an error.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The table's schema is not structurally equal to the one the decoder expects.
    #[error("schema mismatch: expected [{expected}], found [{actual}]")]
    SchemaMismatch {
        expected: SchemaRef,
        actual: SchemaRef,
    },

    /// The list column's offsets do not delimit the values buffer.
    #[error("offsets invariant violated at index {index}: {reason}")]
    OffsetsInvariantViolation { index: usize, reason: String },

    /// An encoder limit was hit.
    #[error("capacity exceeded: {requested} {kind} requested, limit is {limit}")]
    CapacityExceeded {
        kind: CapacityKind,
        limit: usize,
        requested: usize,
    },

    /// Number of columns differs from the number of schema fields.
    #[error("table has {actual} columns but its schema declares {expected} fields")]
    ColumnCount { expected: usize, actual: usize },

    /// Column storage does not match the logical type of its field.
    #[error("column `{field}` is declared {expected} but stores {actual}")]
    ColumnType {
        field: String,
        expected: DataType,
        actual: DataType,
    },

    /// Column row count differs from the table's row count.
    #[error("column `{field}` has {actual} rows, expected {expected}")]
    ColumnLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// An Arrow column that has no counterpart in the table model.
    #[error("arrow column `{field}` is not supported: {reason}")]
    UnsupportedArrowColumn { field: String, reason: String },

    #[cfg(feature = "record-batch")]
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

impl ConvertError {
    pub(crate) fn offsets(index: usize, reason: impl Into<String>) -> Self {
        Self::OffsetsInvariantViolation {
            index,
            reason: reason.into(),
        }
    }
}
