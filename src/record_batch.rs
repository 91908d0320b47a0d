//! Conversion between [`Table`] and Arrow [`RecordBatch`] (feature `record-batch`).
//!
//! Both directions share buffers instead of copying them:
//!
//! | table type      | Arrow type                               |
//! |-----------------|------------------------------------------|
//! | `int64`         | `Int64`                                  |
//! | `float64`       | `Float64`                                |
//! | `list<float64>` | `List(Field("item", Float64, nullable))` |
//!
//! Arrow columns of any other type, or holding nulls, are rejected with
//! [`ConvertError::UnsupportedArrowColumn`]. A sliced list array, whose first
//! offset is not zero, is rebased: its offsets are copied and shifted, its values
//! are sliced without copying.

use crate::error::ConvertError;
use crate::row::Row;
use crate::schema::{DataType, Field, Schema};
use crate::table::{Column, ListColumn, Table};
use crate::{decode, encode};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, ListArray};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{
    DataType as ArrowDataType, Field as ArrowField, FieldRef, Schema as ArrowSchema,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

fn list_item_field() -> FieldRef {
    Arc::new(ArrowField::new("item", ArrowDataType::Float64, true))
}

fn arrow_type(data_type: DataType) -> ArrowDataType {
    match data_type {
        DataType::Int64 => ArrowDataType::Int64,
        DataType::Float64 => ArrowDataType::Float64,
        DataType::ListFloat64 => ArrowDataType::List(list_item_field()),
    }
}

impl Table {
    /// Share this table's buffers as an Arrow [`RecordBatch`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::OffsetsInvariantViolation`] if a list column is
    /// malformed, or [`ConvertError::Arrow`] if Arrow rejects the arrays.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ConvertError> {
        // OffsetBuffer::new panics on malformed offsets.
        self.validate()?;

        let fields: Vec<ArrowField> = self
            .schema()
            .fields()
            .iter()
            .map(|f| ArrowField::new(f.name(), arrow_type(f.data_type()), f.is_nullable()))
            .collect();

        let arrays = self
            .columns()
            .iter()
            .map(|column| -> Result<ArrayRef, ConvertError> {
                let array: ArrayRef = match column {
                    Column::Int64(v) => Arc::new(Int64Array::new(v.clone(), None)),
                    Column::Float64(v) => Arc::new(Float64Array::new(v.clone(), None)),
                    Column::ListFloat64(list) => Arc::new(ListArray::try_new(
                        list_item_field(),
                        OffsetBuffer::new(list.offsets().clone()),
                        Arc::new(Float64Array::new(list.values().clone(), None)),
                        None,
                    )?),
                };
                Ok(array)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(ArrowSchema::new(fields)),
            arrays,
            &options,
        )?)
    }
}

fn unsupported(field: &ArrowField, reason: impl Into<String>) -> ConvertError {
    ConvertError::UnsupportedArrowColumn {
        field: field.name().clone(),
        reason: reason.into(),
    }
}

fn list_column(field: &ArrowField, array: &dyn Array) -> Result<ListColumn, ConvertError> {
    let list = array
        .as_any()
        .downcast_ref::<ListArray>()
        .ok_or_else(|| unsupported(field, "not a ListArray"))?;
    let values = list
        .values()
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| unsupported(field, "list items are not Float64"))?;

    let offsets = list.offsets();
    let first = offsets.first().copied().unwrap_or(0);
    let last = offsets.last().copied().unwrap_or(0);
    // Arrow guarantees 0 <= first <= last <= values.len().
    let start = first as usize;
    let len = (last - first) as usize;
    // Only the items reachable from this (possibly sliced) array count.
    if values.nulls().is_some_and(|n| n.slice(start, len).null_count() > 0) {
        return Err(unsupported(field, "list items contain nulls"));
    }
    if start == 0 && len == values.len() {
        return Ok(ListColumn::new(offsets.inner().clone(), values.values().clone()));
    }
    let rebased: Vec<i32> = offsets.iter().map(|o| o - first).collect();
    Ok(ListColumn::new(rebased, values.values().slice(start, len)))
}

fn column_from_arrow(field: &ArrowField, array: &dyn Array) -> Result<Column, ConvertError> {
    if array.null_count() > 0 {
        return Err(unsupported(field, "column contains nulls"));
    }
    match field.data_type() {
        ArrowDataType::Int64 => array
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| Column::Int64(a.values().clone()))
            .ok_or_else(|| unsupported(field, "not an Int64Array")),
        ArrowDataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Column::Float64(a.values().clone()))
            .ok_or_else(|| unsupported(field, "not a Float64Array")),
        ArrowDataType::List(item) if item.data_type() == &ArrowDataType::Float64 => {
            list_column(field, array).map(Column::ListFloat64)
        }
        other => Err(unsupported(field, format!("type {other} has no table counterpart"))),
    }
}

impl TryFrom<&RecordBatch> for Table {
    type Error = ConvertError;

    fn try_from(batch: &RecordBatch) -> Result<Self, Self::Error> {
        let arrow_schema = batch.schema();
        let mut fields = Vec::with_capacity(batch.num_columns());
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (field, array) in arrow_schema.fields().iter().zip(batch.columns()) {
            let column = column_from_arrow(field, array.as_ref())?;
            fields.push(Field::new(field.name(), column.data_type(), field.is_nullable()));
            columns.push(column);
        }
        Self::try_new(Arc::new(Schema::new(fields)), columns)
    }
}

/// Encode rows straight into a [`RecordBatch`].
///
/// # Errors
///
/// Any error from [`encode`] or [`Table::to_record_batch`].
pub fn encode_record_batch(rows: &[Row]) -> Result<RecordBatch, ConvertError> {
    encode(rows)?.to_record_batch()
}

/// Decode a [`RecordBatch`] with the component-costs layout into rows.
///
/// # Errors
///
/// Any error from converting the batch into a [`Table`] or from [`decode`].
pub fn decode_record_batch(batch: &RecordBatch) -> Result<Vec<Row>, ConvertError> {
    decode(&Table::try_from(batch)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::StringArray;

    #[test]
    fn list_type_maps_to_arrow_list() {
        let ArrowDataType::List(item) = arrow_type(DataType::ListFloat64) else {
            panic!("list<float64> must map to an Arrow List");
        };
        assert_eq!(item.data_type(), &ArrowDataType::Float64);
    }

    #[test]
    fn string_columns_are_unsupported() {
        let schema = Arc::new(ArrowSchema::new(vec![ArrowField::new(
            "name",
            ArrowDataType::Utf8,
            false,
        )]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["a"])) as ArrayRef])
            .expect("valid batch");
        let err = Table::try_from(&batch).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedArrowColumn { ref field, .. } if field == "name"));
    }

    #[test]
    fn null_values_are_unsupported() {
        let schema = Arc::new(ArrowSchema::new(vec![ArrowField::new(
            "id",
            ArrowDataType::Int64,
            true,
        )]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef])
                .expect("valid batch");
        assert!(matches!(
            Table::try_from(&batch),
            Err(ConvertError::UnsupportedArrowColumn { .. })
        ));
    }
}
