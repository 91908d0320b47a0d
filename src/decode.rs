//! Columnar to row decoding.
//!
//! Decoding refuses any table whose schema is not [`Schema::component_costs`],
//! and any table whose cost offsets do not delimit its values buffer. Both checks
//! run before the first row is produced, so callers get either every row or an
//! error.

use crate::error::ConvertError;
use crate::row::{Row, RowView};
use crate::schema::Schema;
use crate::table::{Column, ListColumn, Table};
use arrow::buffer::ScalarBuffer;

/// Borrowed columns of a table that passed validation.
struct ComponentCostsColumns<'a> {
    ids: &'a ScalarBuffer<i64>,
    components: &'a ScalarBuffer<i64>,
    costs: &'a ListColumn,
}

fn columns_of(table: &Table) -> Result<ComponentCostsColumns<'_>, ConvertError> {
    let expected = Schema::component_costs();
    let matched = match table.columns() {
        [Column::Int64(ids), Column::Int64(components), Column::ListFloat64(costs)]
            if **table.schema() == *expected =>
        {
            Some(ComponentCostsColumns {
                ids,
                components,
                costs,
            })
        }
        _ => None,
    };
    let Some(cols) = matched else {
        let err = ConvertError::SchemaMismatch {
            expected,
            actual: table.schema().clone(),
        };
        tracing::warn!(error = %err, "refusing to decode table");
        return Err(err);
    };
    if let Err(err) = table.validate() {
        tracing::warn!(error = %err, "refusing to decode table");
        return Err(err);
    }
    Ok(cols)
}

/// Decode a table into views that borrow its cost values.
///
/// No values are copied; each view's `component_cost` is a sub-slice of the
/// table's values buffer, and the borrow keeps the table alive for as long as
/// any view is in use.
///
/// # Errors
///
/// - [`ConvertError::SchemaMismatch`] if the table's schema is not
///   [`Schema::component_costs`].
/// - [`ConvertError::OffsetsInvariantViolation`] if the cost offsets are malformed.
pub fn decode_views(table: &Table) -> Result<Vec<RowView<'_>>, ConvertError> {
    let cols = columns_of(table)?;
    let values: &[f64] = cols.costs.values();
    let offsets: &[i32] = cols.costs.offsets();

    // Offsets were validated: non-negative, non-decreasing, bounded by `values`.
    let rows: Vec<RowView<'_>> = cols
        .ids
        .iter()
        .zip(cols.components.iter())
        .zip(offsets.windows(2))
        .map(|((&id, &component), w)| RowView {
            id,
            component,
            component_cost: &values[w[0] as usize..w[1] as usize],
        })
        .collect();

    tracing::debug!(rows = rows.len(), values = values.len(), "decoded table into rows");
    Ok(rows)
}

/// Decode a table into owned rows, in table order.
///
/// # Errors
///
/// Same as [`decode_views`].
pub fn decode(table: &Table) -> Result<Vec<Row>, ConvertError> {
    Ok(decode_views(table)?.iter().map(RowView::to_row).collect())
}
