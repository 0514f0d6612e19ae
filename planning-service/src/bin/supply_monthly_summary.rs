use anyhow::{bail, Result};
use planning_service::{
    observability,
    pipeline::Pipeline,
    sinks::SupplyPivotCsvSink,
    sources::SupplyCsvFileSource,
    transform,
};
use planning_core::SupplyRecord;
use std::{env, sync::Arc};

/// Batch summary run: reads the supply history CSV (year, month, end_use,
/// volume) and writes the monthly by-category pivot CSV.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: supply_monthly_summary <supply_csv_path> <output_csv_path>");
    }
    let supply_path = &args[1];
    let output_path = &args[2];

    let sink = SupplyPivotCsvSink::new(output_path);
    let source = SupplyCsvFileSource::new(supply_path);

    let pipeline: Pipeline<_, SupplyRecord, _> = Pipeline {
        source,
        transforms: vec![Arc::new(transform::SupplyValidation::default())],
        sink,
    };

    pipeline.run().await?;

    Ok(())
}
