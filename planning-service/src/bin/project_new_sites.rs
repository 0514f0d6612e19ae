use anyhow::{bail, Context, Result};
use planning_service::{
    config::AppConfig,
    observability,
    pipeline::Pipeline,
    sinks::ProjectionCsvSink,
    sources::SiteCsvFileSource,
    transform,
};
use planning_core::SiteRecord;
use std::{env, sync::Arc};

/// Batch projection run: reads a site list CSV (name, units, start_period)
/// and writes the aggregated new-volume series CSV.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: project_new_sites <sites_csv_path> <output_csv_path>");
    }
    let sites_path = &args[1];
    let output_path = &args[2];

    // Load configuration (can point PLANNING_CONFIG to a run-specific file).
    let cfg = AppConfig::load()?;
    let ramp = cfg
        .params
        .ramp_schedule()
        .context("invalid configured ramp schedule")?;

    let sink = ProjectionCsvSink::new(output_path, cfg.params.unit_consumption, ramp)
        .context("invalid configured unit consumption")?;
    let source = SiteCsvFileSource::new(sites_path);

    let pipeline: Pipeline<_, SiteRecord, _> = Pipeline {
        source,
        transforms: vec![Arc::new(transform::SiteRecordValidation::default())],
        sink,
    };

    pipeline.run().await?;

    Ok(())
}
