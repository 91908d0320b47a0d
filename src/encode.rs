//! Row to columnar encoding.
//!
//! [`RowEncoder`] makes a single pass over its input, in order. For each row it
//! appends `id` and `component` to their `int64` builders, then appends the
//! row's costs to the list builder, which records the new cumulative value
//! count as the row's end offset. The builders are then frozen into a [`Table`]
//! with the [`Schema::component_costs`] layout.
//!
//! ```
//! use colrow::{encode, Row};
//!
//! let table = encode(&[Row::new(1, 1, vec![10.0]), Row::new(2, 3, vec![])])?;
//! assert_eq!(table.num_rows(), 2);
//! # Ok::<(), colrow::ConvertError>(())
//! ```

use crate::error::{CapacityKind, ConvertError};
use crate::row::Row;
use crate::schema::Schema;
use crate::table::{Int64ColumnBuilder, ListColumnBuilder, MAX_LIST_VALUES, Table};
use serde::{Deserialize, Serialize};

/// Upper bound on rows preallocated from an iterator's size hint; builders
/// grow past it as needed.
const PREALLOC_ROWS: usize = 64 * 1024;

/// Limits applied by a [`RowEncoder`].
///
/// Deserializes from a partial document; missing keys take their defaults:
///
/// ```
/// let cfg: colrow::EncoderConfig = serde_json::from_str(r#"{ "max_rows": 1000 }"#)?;
/// assert_eq!(cfg.max_rows, 1000);
/// assert_eq!(cfg.max_values, i32::MAX as usize);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Maximum number of rows in one table.
    pub max_rows: usize,
    /// Maximum number of flattened cost values in one table.
    /// Clamped to [`MAX_LIST_VALUES`], the reach of `i32` offsets.
    pub max_values: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_rows: usize::MAX,
            max_values: MAX_LIST_VALUES,
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub const fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    #[must_use]
    pub const fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    const fn value_limit(&self) -> usize {
        if self.max_values < MAX_LIST_VALUES {
            self.max_values
        } else {
            MAX_LIST_VALUES
        }
    }
}

/// Encodes rows into [`Table`]s. Holds no state between calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct RowEncoder {
    config: EncoderConfig,
}

/// The three typed builders for the component-costs layout.
struct ComponentCostsBuilder {
    ids: Int64ColumnBuilder,
    components: Int64ColumnBuilder,
    costs: ListColumnBuilder,
}

impl ComponentCostsBuilder {
    fn with_capacity(rows: usize, values: usize, value_limit: usize) -> Self {
        Self {
            ids: Int64ColumnBuilder::with_capacity(rows),
            components: Int64ColumnBuilder::with_capacity(rows),
            costs: ListColumnBuilder::with_capacity(rows, values).with_value_limit(value_limit),
        }
    }

    fn append(&mut self, row: &Row) -> Result<(), ConvertError> {
        // Costs first: a rejected row must not leave the id columns one ahead.
        self.costs.append(&row.component_cost)?;
        self.ids.append(row.id);
        self.components.append(row.component);
        Ok(())
    }

    fn finish(self) -> Result<Table, ConvertError> {
        Table::try_new(
            Schema::component_costs(),
            vec![
                self.ids.finish(),
                self.components.finish(),
                self.costs.finish(),
            ],
        )
    }
}

impl RowEncoder {
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn check_rows(&self, requested: usize) -> Result<(), ConvertError> {
        if requested > self.config.max_rows {
            return Err(ConvertError::CapacityExceeded {
                kind: CapacityKind::Rows,
                limit: self.config.max_rows,
                requested,
            });
        }
        Ok(())
    }

    /// Encode a slice of rows into a table, preserving their order.
    ///
    /// Both limits are checked against the whole input before any buffer is
    /// allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::CapacityExceeded`] if the input has more rows or
    /// more cost values than the configuration allows.
    pub fn encode(&self, rows: &[Row]) -> Result<Table, ConvertError> {
        let total_values: usize = rows.iter().map(|r| r.component_cost.len()).sum();
        let outcome = self.check_rows(rows.len()).and_then(|()| {
            let limit = self.config.value_limit();
            if total_values > limit {
                return Err(ConvertError::CapacityExceeded {
                    kind: CapacityKind::Values,
                    limit,
                    requested: total_values,
                });
            }
            let mut builder =
                ComponentCostsBuilder::with_capacity(rows.len(), total_values, limit);
            for row in rows {
                builder.append(row)?;
            }
            builder.finish()
        });
        report(outcome)
    }

    /// Encode an owned stream of rows. Limits are checked as rows arrive.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::CapacityExceeded`] as soon as a limit is crossed.
    pub fn encode_iter<I>(&self, rows: I) -> Result<Table, ConvertError>
    where
        I: IntoIterator<Item = Row>,
    {
        let rows = rows.into_iter();
        let capacity = rows
            .size_hint()
            .1
            .unwrap_or(0)
            .min(self.config.max_rows)
            .min(PREALLOC_ROWS);
        let limit = self.config.value_limit();
        let mut builder = ComponentCostsBuilder::with_capacity(capacity, 0, limit);
        let outcome = rows
            .enumerate()
            .try_for_each(|(i, row)| {
                self.check_rows(i + 1)?;
                builder.append(&row)
            })
            .and_then(|()| builder.finish());
        report(outcome)
    }
}

fn report(outcome: Result<Table, ConvertError>) -> Result<Table, ConvertError> {
    match &outcome {
        Ok(table) => {
            let values = table
                .column(2)
                .and_then(|c| c.as_list())
                .map_or(0, |l| l.values().len());
            tracing::debug!(rows = table.num_rows(), values, "encoded rows into table");
        }
        Err(err) => tracing::warn!(error = %err, "row encoding rejected"),
    }
    outcome
}

/// Encode rows with the default [`RowEncoder`].
///
/// # Errors
///
/// Returns [`ConvertError::CapacityExceeded`] if the rows hold more than
/// [`MAX_LIST_VALUES`] cost values in total.
pub fn encode(rows: &[Row]) -> Result<Table, ConvertError> {
    RowEncoder::default().encode(rows)
}
