//! Columnar table model.
//!
//! A [`Table`] pairs a [`SchemaRef`] with one [`Column`] per field. Column storage
//! is a tagged enum over Arrow [`ScalarBuffer`]s, which are reference counted and
//! immutable: cloning a table, slicing a view out of it or handing it to Arrow
//! never copies values.
//!
//! Tables follow an append-then-freeze lifecycle. Values are appended to the typed
//! builders in this module ([`Int64ColumnBuilder`], [`Float64ColumnBuilder`],
//! [`ListColumnBuilder`]); `finish` consumes a builder and freezes its buffer into
//! a [`Column`]; [`Table::try_new`] assembles frozen columns into a table. There is
//! no way to mutate a table afterwards.
//!
//! [`Table::try_new`] checks the table's structure only. The contents of list
//! offsets are checked by [`Table::validate`], which the decoder runs before it
//! reads any row, so a table assembled from foreign buffers is still rejected
//! if its offsets are corrupt.

use crate::error::{CapacityKind, ConvertError};
use crate::schema::{DataType, SchemaRef};
use arrow::buffer::ScalarBuffer;
use std::fmt;
use std::ops::Range;

/// Largest number of list values a single [`ListColumn`] can address.
pub const MAX_LIST_VALUES: usize = i32::MAX as usize;

/// Storage for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(ScalarBuffer<i64>),
    Float64(ScalarBuffer<f64>),
    ListFloat64(ListColumn),
}

impl Column {
    /// Logical type this storage kind represents.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::ListFloat64(_) => DataType::ListFloat64,
        }
    }

    /// Number of rows stored. For a list column this is derived from its
    /// offsets and is only meaningful once the offsets are validated.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::ListFloat64(l) => l.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_int64(&self) -> Option<&ScalarBuffer<i64>> {
        match self {
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float64(&self) -> Option<&ScalarBuffer<f64>> {
        match self {
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&ListColumn> {
        match self {
            Self::ListFloat64(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Self::Int64(ScalarBuffer::from(values))
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::Float64(ScalarBuffer::from(values))
    }
}

impl From<ListColumn> for Column {
    fn from(list: ListColumn) -> Self {
        Self::ListFloat64(list)
    }
}

/// A `list<float64>` column: row `i` is `values[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListColumn {
    offsets: ScalarBuffer<i32>,
    values: ScalarBuffer<f64>,
}

impl ListColumn {
    /// Wrap existing buffers. The offsets are not inspected here; see
    /// [`ListColumn::validate`].
    pub fn new(offsets: impl Into<ScalarBuffer<i32>>, values: impl Into<ScalarBuffer<f64>>) -> Self {
        Self {
            offsets: offsets.into(),
            values: values.into(),
        }
    }

    #[must_use]
    pub const fn offsets(&self) -> &ScalarBuffer<i32> {
        &self.offsets
    }

    #[must_use]
    pub const fn values(&self) -> &ScalarBuffer<f64> {
        &self.values
    }

    /// Number of lists, i.e. one less than the number of offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range of `values` holding list `i`, or `None` if the offsets for `i` are
    /// missing, negative, reversed or out of bounds.
    #[must_use]
    pub fn value_range(&self, i: usize) -> Option<Range<usize>> {
        let start = usize::try_from(*self.offsets.get(i)?).ok()?;
        let end = usize::try_from(*self.offsets.get(i + 1)?).ok()?;
        (start <= end && end <= self.values.len()).then_some(start..end)
    }

    /// Values of list `i` without copying.
    #[must_use]
    pub fn value(&self, i: usize) -> Option<&[f64]> {
        self.value_range(i).map(|r| &self.values[r])
    }

    /// Check that the offsets delimit `values` for exactly `rows` lists:
    /// `rows + 1` entries, starting at zero, never decreasing, ending at
    /// `values.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::OffsetsInvariantViolation`] naming the first
    /// offending offset index.
    pub fn validate(&self, rows: usize) -> Result<(), ConvertError> {
        let offsets: &[i32] = &self.offsets;
        if offsets.len() != rows + 1 {
            return Err(ConvertError::offsets(
                offsets.len(),
                format!("expected {} offsets for {rows} rows, found {}", rows + 1, offsets.len()),
            ));
        }
        if offsets[0] != 0 {
            return Err(ConvertError::offsets(
                0,
                format!("first offset must be 0, found {}", offsets[0]),
            ));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(ConvertError::offsets(
                i + 1,
                format!("offset {} is less than preceding offset {}", offsets[i + 1], offsets[i]),
            ));
        }
        let last = offsets[rows];
        if usize::try_from(last).ok() != Some(self.values.len()) {
            return Err(ConvertError::offsets(
                rows,
                format!("last offset {last} does not match {} values", self.values.len()),
            ));
        }
        Ok(())
    }
}

/// An immutable columnar table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: SchemaRef,
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Assemble frozen columns into a table.
    ///
    /// The row count is taken from the first fixed-width column, or from the
    /// list offsets when the schema has no fixed-width field.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::ColumnCount`] if there is not one column per field.
    /// - [`ConvertError::ColumnType`] if a column's storage does not match its field.
    /// - [`ConvertError::ColumnLength`] if fixed-width columns disagree on the row count.
    pub fn try_new(schema: SchemaRef, columns: Vec<Column>) -> Result<Self, ConvertError> {
        if columns.len() != schema.len() {
            return Err(ConvertError::ColumnCount {
                expected: schema.len(),
                actual: columns.len(),
            });
        }
        for (field, column) in schema.fields().iter().zip(&columns) {
            if field.data_type() != column.data_type() {
                return Err(ConvertError::ColumnType {
                    field: field.name().to_string(),
                    expected: field.data_type(),
                    actual: column.data_type(),
                });
            }
        }

        let num_rows = columns
            .iter()
            .find(|c| !matches!(c, Column::ListFloat64(_)))
            .or_else(|| columns.first())
            .map_or(0, Column::len);

        for (field, column) in schema.fields().iter().zip(&columns) {
            if matches!(column, Column::ListFloat64(_)) {
                continue;
            }
            if column.len() != num_rows {
                return Err(ConvertError::ColumnLength {
                    field: field.name().to_string(),
                    expected: num_rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self {
            schema,
            columns,
            num_rows,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    /// Column for the first field called `name`.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.schema.index_of(name).and_then(|i| self.column(i))
    }

    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check the offsets of every list column against the row count.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::OffsetsInvariantViolation`] for the first list
    /// column whose offsets are malformed.
    pub fn validate(&self) -> Result<(), ConvertError> {
        for column in &self.columns {
            if let Column::ListFloat64(list) = column {
                list.validate(self.num_rows)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema: {}", self.schema)?;
        write!(f, "rows: {}", self.num_rows)?;
        for (field, column) in self.schema.fields().iter().zip(&self.columns) {
            write!(f, "\n{}: ", field.name())?;
            match column {
                Column::Int64(v) => write!(f, "{:?}", &v[..])?,
                Column::Float64(v) => write!(f, "{:?}", &v[..])?,
                Column::ListFloat64(list) => {
                    f.write_str("[")?;
                    for i in 0..list.len() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        match list.value(i) {
                            Some(values) => write!(f, "{values:?}")?,
                            None => f.write_str("<invalid>")?,
                        }
                    }
                    f.write_str("]")?;
                }
            }
        }
        Ok(())
    }
}

/// Append-only builder for an `int64` column.
#[derive(Debug, Default)]
pub struct Int64ColumnBuilder {
    values: Vec<i64>,
}

impl Int64ColumnBuilder {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, value: i64) {
        self.values.push(value);
    }

    pub fn append_slice(&mut self, values: &[i64]) {
        self.values.extend_from_slice(values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Freeze the appended values.
    #[must_use]
    pub fn finish(self) -> Column {
        Column::Int64(ScalarBuffer::from(self.values))
    }
}

/// Append-only builder for a `float64` column.
#[derive(Debug, Default)]
pub struct Float64ColumnBuilder {
    values: Vec<f64>,
}

impl Float64ColumnBuilder {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn append_slice(&mut self, values: &[f64]) {
        self.values.extend_from_slice(values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Column {
        Column::Float64(ScalarBuffer::from(self.values))
    }
}

/// Append-only builder for a `list<float64>` column.
///
/// Starts with the single offset `0`; every appended list pushes the new
/// cumulative value count as its end offset.
#[derive(Debug)]
pub struct ListColumnBuilder {
    offsets: Vec<i32>,
    values: Vec<f64>,
    value_limit: usize,
}

impl Default for ListColumnBuilder {
    fn default() -> Self {
        Self::with_capacity(0, 0)
    }
}

impl ListColumnBuilder {
    #[must_use]
    pub fn with_capacity(lists: usize, values: usize) -> Self {
        let mut offsets = Vec::with_capacity(lists + 1);
        offsets.push(0);
        Self {
            offsets,
            values: Vec::with_capacity(values),
            value_limit: MAX_LIST_VALUES,
        }
    }

    /// Cap the total number of values this builder accepts. Values above
    /// [`MAX_LIST_VALUES`] are clamped to it.
    #[must_use]
    pub fn with_value_limit(mut self, limit: usize) -> Self {
        self.value_limit = limit.min(MAX_LIST_VALUES);
        self
    }

    /// Append one list.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::CapacityExceeded`] if the list would take the
    /// builder past its value limit. The builder is left unchanged.
    pub fn append(&mut self, list: &[f64]) -> Result<(), ConvertError> {
        let requested = self.values.len() + list.len();
        let end = i32::try_from(requested)
            .ok()
            .filter(|_| requested <= self.value_limit)
            .ok_or(ConvertError::CapacityExceeded {
                kind: CapacityKind::Values,
                limit: self.value_limit,
                requested,
            })?;
        self.values.extend_from_slice(list);
        self.offsets.push(end);
        Ok(())
    }

    /// Number of lists appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of values appended so far.
    #[must_use]
    pub fn values_len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn finish(self) -> Column {
        Column::ListFloat64(ListColumn::new(self.offsets, self.values))
    }
}
