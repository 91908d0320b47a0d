//! # colrow
//!
//! **Row ↔ columnar conversion** for tables with a variable-length nested column.
//!
//! A [`Row`] is a record with two `int64` fields and a list of `float64` costs.
//! A [`Table`] stores the same data column by column: two contiguous `int64`
//! columns and a `list<float64>` column made of an offsets buffer and one flat
//! values buffer. The crate converts between the two without losing row order or
//! list boundaries.
//!
//! ## Key Features
//!
//! - **Single-pass encoder** - [`encode`] / [`RowEncoder`] append rows into typed
//!   column builders, then freeze them into an immutable table
//! - **Validating decoder** - [`decode`] checks the schema and the list offsets
//!   before reading a single row
//! - **Zero-copy views** - [`decode_views`] borrows cost lists straight out of
//!   the table's values buffer
//! - **Shared buffers** - columns are reference-counted Arrow buffers; tables are
//!   cheap to clone and safe to share across threads
//! - **Arrow interop** - [`Table::to_record_batch`] and `Table::try_from(&RecordBatch)`
//!   (feature `record-batch`)
//!
//! ## Quick Start
//!
//! ```
//! use colrow::{decode, encode, Row};
//!
//! let rows = vec![
//!     Row::new(1, 1, vec![10.0]),
//!     Row::new(2, 3, vec![11.0, 12.0, 13.0]),
//!     Row::new(3, 2, vec![15.0, 25.0]),
//! ];
//!
//! let table = encode(&rows)?;
//! let costs = table.column(2).and_then(|c| c.as_list()).unwrap();
//! assert_eq!(&costs.offsets()[..], &[0, 1, 4, 6]);
//!
//! assert_eq!(decode(&table)?, rows);
//! # Ok::<(), colrow::ConvertError>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Schema
//!
//! A [`Schema`] is an ordered list of [`Field`]s (name, [`DataType`], nullability).
//! [`Schema::component_costs`] is the layout the encoder produces and the decoder
//! requires:
//!
//! ```text
//! id: int64 not null, components: int64 not null, component_cost: list<float64> not null
//! ```
//!
//! ### Table
//!
//! Every [`Column`] variant fixes its storage kind: `Int64` and `Float64` hold one
//! value per row, `ListFloat64` holds `num_rows + 1` offsets and the flattened
//! values. Row `i`'s list is `values[offsets[i]..offsets[i + 1]]`.
//!
//! Tables are built append-then-freeze: the builders in [`table`] only append,
//! and `finish` consumes them. A finished table cannot be mutated.
//!
//! ### Errors
//!
//! Every failure is a [`ConvertError`]:
//! - [`ConvertError::SchemaMismatch`] - the table is not in the component-costs layout
//! - [`ConvertError::OffsetsInvariantViolation`] - the cost offsets are corrupt
//! - [`ConvertError::CapacityExceeded`] - the encoder hit a limit from [`EncoderConfig`]
//!
//! No operation returns partial output alongside an error.
//!
//! ## Logging
//!
//! The encoder and decoder emit `tracing` events: `debug` with row and value
//! counts on success, `warn` with the error on rejection. Install any
//! `tracing` subscriber to see them.
//!
//! ## Feature Flags
//!
//! - `record-batch` (default) - conversion to and from Arrow `RecordBatch`
//!
//! ## Module Overview
//!
//! - [`schema`] - fields, logical types and the component-costs schema
//! - [`row`] - owned rows and borrowed row views
//! - [`table`] - column storage, typed builders and the table type
//! - [`encode`](mod@encode) - rows to table
//! - [`decode`](mod@decode) - table to rows
//! - [`error`] - the error type
//! - [`testing`] - fixtures and assertions for tests

pub mod decode;
pub mod encode;
pub mod error;
pub mod row;
pub mod schema;
pub mod table;
pub mod testing;

#[cfg_attr(docsrs, doc(cfg(feature = "record-batch")))]
#[cfg(feature = "record-batch")]
pub mod record_batch;

// General re-exports
pub use decode::{decode, decode_views};
pub use encode::{EncoderConfig, RowEncoder, encode};
pub use error::{CapacityKind, ConvertError};
pub use row::{Row, RowView};
pub use schema::{DataType, Field, Schema, SchemaRef};
pub use table::{Column, ListColumn, Table};

// Gated re-exports
#[cfg(feature = "record-batch")]
pub use record_batch::{decode_record_batch, encode_record_batch};
