//! Assertion functions for conversion outputs.

use crate::row::Row;
use crate::table::{Column, Table};

/// Assert that two row sequences are equal in order and content.
///
/// # Panics
///
/// Panics with the first differing index if the sequences differ.
///
/// ```
/// use colrow::testing::{assert_rows_equal, sample_rows};
///
/// assert_rows_equal(&sample_rows(), &sample_rows());
/// ```
pub fn assert_rows_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row count mismatch:\n  Expected: {}\n  Actual: {}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a, e, "Row mismatch at index {i}:\n  Expected: {e}\n  Actual: {a}");
    }
}

/// Assert that every list column of `table` satisfies the offsets invariant:
/// `num_rows + 1` offsets, starting at 0, non-decreasing, ending at the values length.
///
/// # Panics
///
/// Panics naming the column and the broken condition.
pub fn assert_offsets_well_formed(table: &Table) {
    let n = table.num_rows();
    for (field, column) in table.schema().fields().iter().zip(table.columns()) {
        let Column::ListFloat64(list) = column else {
            continue;
        };
        let name = field.name();
        let offsets: &[i32] = list.offsets();
        assert_eq!(offsets.len(), n + 1, "`{name}`: expected {} offsets", n + 1);
        assert_eq!(offsets[0], 0, "`{name}`: first offset must be 0");
        assert!(
            offsets.windows(2).all(|w| w[0] <= w[1]),
            "`{name}`: offsets must be non-decreasing: {offsets:?}"
        );
        assert_eq!(
            usize::try_from(offsets[n]).ok(),
            Some(list.values().len()),
            "`{name}`: last offset must equal the values length"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::table_with_costs;

    #[test]
    #[should_panic(expected = "Row mismatch at index 1")]
    fn reports_first_mismatch() {
        let a = vec![Row::new(1, 1, vec![]), Row::new(2, 2, vec![1.0])];
        let b = vec![Row::new(1, 1, vec![]), Row::new(2, 2, vec![2.0])];
        assert_rows_equal(&a, &b);
    }

    #[test]
    #[should_panic(expected = "offsets must be non-decreasing")]
    fn catches_decreasing_offsets() {
        let table = table_with_costs(vec![1, 2], vec![1, 2], vec![0, 2, 1], vec![0.0])
            .expect("structurally valid table");
        assert_offsets_well_formed(&table);
    }
}
