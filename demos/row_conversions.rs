//! Example converting rows to a columnar table and back.
//!
//! This example shows how to:
//! - Encode rows into a table and print it
//! - Decode the table into owned rows and into zero-copy views
//! - Hand the table to Arrow as a `RecordBatch`
//! - Observe a rejected table
//!
//! Run with `RUST_LOG=debug` to see the encoder and decoder events.

use anyhow::{Context, Result, ensure};
use colrow::testing::table_with_costs;
use colrow::{Row, decode, decode_views, encode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let orig = vec![
        Row::new(1, 1, vec![10.0]),
        Row::new(2, 3, vec![11.0, 12.0, 13.0]),
        Row::new(3, 2, vec![15.0, 25.0]),
    ];

    let table = encode(&orig).context("encode rows")?;
    println!("{table}\n");

    let converted = decode(&table).context("decode table")?;
    ensure!(
        converted.len() == table.num_rows(),
        "mismatched number of rows"
    );
    for row in &converted {
        println!("{row}");
    }

    let views = decode_views(&table)?;
    let total: f64 = views.iter().flat_map(|v| v.component_cost).sum();
    println!("\ntotal component cost: {total}");

    #[cfg(feature = "record-batch")]
    {
        let batch = table.to_record_batch()?;
        println!(
            "record batch: {} rows x {} columns",
            batch.num_rows(),
            batch.num_columns()
        );
    }

    let corrupt = table_with_costs(vec![1, 2], vec![1, 2], vec![0, 2, 1], vec![1.0])?;
    if let Err(err) = decode(&corrupt) {
        println!("rejected: {err}");
    }

    Ok(())
}
