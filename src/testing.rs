//! Testing utilities for row/columnar conversion.
//!
//! - **Fixtures**: ready-made row sets, including the canonical three-row example
//!   and deterministic generated data of any size
//! - **Assertions**: order-sensitive row comparison and a structural check of a
//!   table's cost offsets
//! - **Corrupt tables**: [`table_with_costs`] assembles a component-costs table
//!   from raw offsets, bypassing the encoder, so decoder rejection paths can be
//!   exercised
//!
//! # Quick Start
//!
//! ```
//! use colrow::testing::*;
//! use colrow::{decode, encode};
//!
//! let rows = sample_rows();
//! let table = encode(&rows)?;
//! assert_offsets_well_formed(&table);
//! assert_rows_equal(&decode(&table)?, &rows);
//! # Ok::<(), colrow::ConvertError>(())
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
