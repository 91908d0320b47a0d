#![cfg(feature = "record-batch")]

use anyhow::Result;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, ListArray};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use colrow::table::{Float64ColumnBuilder, Int64ColumnBuilder};
use colrow::testing::*;
use colrow::*;
use std::sync::Arc;

#[test]
fn table_round_trips_through_arrow() -> Result<()> {
    let table = encode(&generated_rows(50))?;
    let batch = table.to_record_batch()?;
    assert_eq!(batch.num_rows(), 50);
    assert_eq!(batch.num_columns(), 3);

    let back = Table::try_from(&batch)?;
    assert_eq!(back, table);
    Ok(())
}

#[test]
fn arrow_schema_mirrors_table_schema() -> Result<()> {
    let batch = encode(&sample_rows())?.to_record_batch()?;
    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, ["id", "components", "component_cost"]);
    assert!(schema.fields().iter().all(|f| !f.is_nullable()));
    assert_eq!(schema.field(0).data_type(), &ArrowDataType::Int64);
    assert!(matches!(
        schema.field(2).data_type(),
        ArrowDataType::List(item) if item.data_type() == &ArrowDataType::Float64
    ));
    Ok(())
}

#[test]
fn conversion_shares_buffers() -> Result<()> {
    let table = encode(&sample_rows())?;
    let batch = table.to_record_batch()?;

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("Int64 ids");
    let table_ids = table.column(0).and_then(Column::as_int64).expect("ids");
    assert_eq!(ids.values().as_ptr(), table_ids.as_ptr());

    let back = Table::try_from(&batch)?;
    let list = back.column(2).and_then(Column::as_list).expect("costs");
    let orig = table.column(2).and_then(Column::as_list).expect("costs");
    assert_eq!(list.values().as_ptr(), orig.values().as_ptr());
    Ok(())
}

#[test]
fn example_decodes_from_record_batch() -> Result<()> {
    let batch = encode_record_batch(&sample_rows())?;
    assert_rows_equal(&decode_record_batch(&batch)?, &sample_rows());
    Ok(())
}

#[test]
fn sliced_batch_is_rebased() -> Result<()> {
    let rows = sample_rows();
    let batch = encode_record_batch(&rows)?.slice(1, 2);

    let table = Table::try_from(&batch)?;
    assert_offsets_well_formed(&table);
    let costs = table.column(2).and_then(Column::as_list).expect("costs");
    assert_eq!(&costs.offsets()[..], &[0, 3, 5]);

    assert_rows_equal(&decode(&table)?, &rows[1..]);
    Ok(())
}

fn component_costs_batch(ids: Vec<i64>, components: Vec<i64>, costs: ListArray) -> Result<RecordBatch> {
    let schema = Arc::new(ArrowSchema::new(vec![
        ArrowField::new("id", ArrowDataType::Int64, false),
        ArrowField::new("components", ArrowDataType::Int64, false),
        ArrowField::new("component_cost", costs.data_type().clone(), false),
    ]));
    Ok(RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ids)) as ArrayRef,
            Arc::new(Int64Array::from(components)),
            Arc::new(costs),
        ],
    )?)
}

fn item_field() -> Arc<ArrowField> {
    Arc::new(ArrowField::new("item", ArrowDataType::Float64, true))
}

#[test]
fn nulls_outside_a_slice_are_ignored() -> Result<()> {
    let costs = ListArray::try_new(
        item_field(),
        OffsetBuffer::from_lengths([1, 2]),
        Arc::new(Float64Array::from(vec![None, Some(1.0), Some(2.0)])),
        None,
    )?;
    let batch = component_costs_batch(vec![1, 2], vec![10, 20], costs)?.slice(1, 1);

    let rows = decode_record_batch(&batch)?;
    assert_rows_equal(&rows, &[Row::new(2, 20, vec![1.0, 2.0])]);
    Ok(())
}

#[test]
fn nulls_inside_a_slice_are_rejected() -> Result<()> {
    let costs = ListArray::try_new(
        item_field(),
        OffsetBuffer::from_lengths([2, 1]),
        Arc::new(Float64Array::from(vec![Some(1.0), None, Some(3.0)])),
        None,
    )?;
    let batch = component_costs_batch(vec![1, 2], vec![10, 20], costs)?;

    assert!(matches!(
        decode_record_batch(&batch.slice(0, 1)),
        Err(ConvertError::UnsupportedArrowColumn { ref field, .. }) if field == "component_cost"
    ));
    assert_rows_equal(&decode_record_batch(&batch.slice(1, 1))?, &[Row::new(2, 20, vec![3.0])]);
    Ok(())
}

#[test]
fn float64_columns_convert_both_ways() -> Result<()> {
    let mut weights = Float64ColumnBuilder::with_capacity(3);
    weights.append(0.5);
    weights.append_slice(&[f64::NAN, -0.0]);
    assert_eq!(weights.len(), 3);
    let mut keys = Int64ColumnBuilder::default();
    keys.append_slice(&[1, 2, 3]);

    let schema = Arc::new(Schema::new(vec![
        Field::new("key", DataType::Int64, false),
        Field::new("weight", DataType::Float64, false),
    ]));
    let table = Table::try_new(schema, vec![keys.finish(), weights.finish()])?;
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_columns(), 2);

    let batch = table.to_record_batch()?;
    assert_eq!(batch.schema().field(1).data_type(), &ArrowDataType::Float64);
    let weight = batch
        .column(1)
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("Float64 weights");
    let stored = table.column(1).and_then(Column::as_float64).expect("weights");
    assert_eq!(weight.values().as_ptr(), stored.as_ptr());

    let back = Table::try_from(&batch)?;
    let back_weights = back.column(1).and_then(Column::as_float64).expect("weights");
    assert_eq!(back_weights[0], 0.5);
    assert!(back_weights[1].is_nan());
    assert_eq!(back_weights[2].to_bits(), (-0.0f64).to_bits());
    Ok(())
}

#[test]
fn hand_built_arrow_batch_decodes() -> Result<()> {
    let item = Arc::new(ArrowField::new("item", ArrowDataType::Float64, true));
    let schema = Arc::new(ArrowSchema::new(vec![
        ArrowField::new("id", ArrowDataType::Int64, false),
        ArrowField::new("components", ArrowDataType::Int64, false),
        ArrowField::new("component_cost", ArrowDataType::List(item.clone()), false),
    ]));
    let costs = ListArray::try_new(
        item,
        OffsetBuffer::from_lengths([0, 2]),
        Arc::new(Float64Array::from(vec![1.5, 2.5])),
        None,
    )?;
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![7, 8])) as ArrayRef,
            Arc::new(Int64Array::from(vec![70, 80])),
            Arc::new(costs),
        ],
    )?;

    let rows = decode_record_batch(&batch)?;
    assert_rows_equal(&rows, &[Row::new(7, 70, vec![]), Row::new(8, 80, vec![1.5, 2.5])]);
    Ok(())
}

#[test]
fn nullable_arrow_fields_fail_the_schema_check() -> Result<()> {
    let schema = Arc::new(ArrowSchema::new(vec![
        ArrowField::new("id", ArrowDataType::Int64, true),
        ArrowField::new("components", ArrowDataType::Int64, false),
        ArrowField::new(
            "component_cost",
            ArrowDataType::List(Arc::new(ArrowField::new("item", ArrowDataType::Float64, true))),
            false,
        ),
    ]));
    let source = encode_record_batch(&sample_rows())?;
    let batch = RecordBatch::try_new(schema, source.columns().to_vec())?;

    assert!(matches!(
        decode_record_batch(&batch),
        Err(ConvertError::SchemaMismatch { .. })
    ));
    Ok(())
}

#[test]
fn corrupt_table_is_not_exported() -> Result<()> {
    let table = table_with_costs(vec![1], vec![1], vec![0, 3], vec![1.0])?;
    assert!(matches!(
        table.to_record_batch(),
        Err(ConvertError::OffsetsInvariantViolation { .. })
    ));
    Ok(())
}
