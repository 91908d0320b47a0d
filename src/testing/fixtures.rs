//! Pre-built row sets and table constructors for tests.

use crate::error::ConvertError;
use crate::row::Row;
use crate::schema::Schema;
use crate::table::{Column, ListColumn, Table};

/// The three-row example: component ids with one, three and two costs.
///
/// Encodes to `id=[1,2,3]`, `components=[1,3,2]`, `offsets=[0,1,4,6]`,
/// `values=[10,11,12,13,15,25]`.
///
/// ```
/// use colrow::testing::sample_rows;
///
/// assert_eq!(sample_rows().len(), 3);
/// ```
#[must_use]
pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::new(1, 1, vec![10.0]),
        Row::new(2, 3, vec![11.0, 12.0, 13.0]),
        Row::new(3, 2, vec![15.0, 25.0]),
    ]
}

/// Rows with empty cost lists at the start, middle and end.
#[must_use]
pub fn rows_with_empty_costs() -> Vec<Row> {
    vec![
        Row::new(10, 0, vec![]),
        Row::new(11, 1, vec![1.0, 2.0]),
        Row::new(12, 2, vec![]),
        Row::new(13, 3, vec![3.0]),
        Row::new(14, 4, vec![]),
    ]
}

/// Rows whose costs are non-finite or signed zeros.
#[must_use]
pub fn rows_with_special_floats() -> Vec<Row> {
    vec![
        Row::new(i64::MIN, i64::MAX, vec![f64::NAN]),
        Row::new(0, -1, vec![f64::INFINITY, f64::NEG_INFINITY]),
        Row::new(i64::MAX, i64::MIN, vec![-0.0, 0.0, f64::MIN_POSITIVE]),
    ]
}

/// `n` deterministic rows. Row `i` has `i % 5` costs, so every fifth row is empty.
///
/// ```
/// use colrow::testing::generated_rows;
///
/// let rows = generated_rows(10);
/// assert!(rows[0].component_cost.is_empty());
/// assert_eq!(rows[4].component_cost.len(), 4);
/// ```
#[must_use]
pub fn generated_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let id = i64::try_from(i).unwrap_or(i64::MAX);
            let costs = (0..i % 5).map(|j| (i * 10 + j) as f64 * 0.5).collect::<Vec<_>>();
            Row::new(id, id % 7, costs)
        })
        .collect()
}

/// Assemble a component-costs table from raw parts without going through the
/// encoder. The offsets are taken as given, so the result may violate the
/// offsets invariant.
///
/// # Errors
///
/// Returns [`ConvertError::ColumnLength`] if `ids` and `components` differ in length.
pub fn table_with_costs(
    ids: Vec<i64>,
    components: Vec<i64>,
    offsets: Vec<i32>,
    values: Vec<f64>,
) -> Result<Table, ConvertError> {
    Table::try_new(
        Schema::component_costs(),
        vec![
            Column::from(ids),
            Column::from(components),
            Column::from(ListColumn::new(offsets, values)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_rows_are_deterministic() {
        assert_eq!(generated_rows(25), generated_rows(25));
        assert_eq!(generated_rows(0), Vec::new());
    }

    #[test]
    fn table_with_costs_keeps_bad_offsets() -> Result<(), ConvertError> {
        let table = table_with_costs(vec![1], vec![1], vec![0, 5], vec![1.0])?;
        assert!(table.validate().is_err());
        Ok(())
    }
}
