use std::path::PathBuf;

use futures::StreamExt;
use planning_core::{aggregate, AggregatedSeries, InvalidInput, RampSchedule, Site, SiteRecord};

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Terminal stage of the new-site pipeline: validates each surviving row,
/// projects it over the ramp schedule, and writes the aggregated monthly
/// series as CSV in the reference export format `연월,신규물량(㎥)`.
///
/// A row whose unit count or start period fails to parse is logged, counted
/// and excluded from the aggregate; it never aborts the run.
pub struct ProjectionCsvSink {
    path: PathBuf,
    unit_consumption: f64,
    ramp: RampSchedule,
}

/// Writes an aggregated series in the reference export format, header
/// `연월,신규물량(㎥)`, one row per period ascending. Shared by the batch
/// sink and the HTTP CSV endpoint so the format is defined once.
pub fn write_series_csv<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    series: &AggregatedSeries,
) -> csv::Result<()> {
    wtr.write_record(["연월", "신규물량(㎥)"])?;
    for (period, volume) in series {
        wtr.write_record([period.to_string(), volume.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

impl ProjectionCsvSink {
    /// Fails when the configured consumption would break the non-negative
    /// volume invariant; the ramp is already validated by its own parser.
    pub fn new<P: Into<PathBuf>>(
        path: P,
        unit_consumption: f64,
        ramp: RampSchedule,
    ) -> Result<Self, InvalidInput> {
        if unit_consumption < 0.0 || !unit_consumption.is_finite() {
            return Err(InvalidInput::Consumption {
                value: unit_consumption,
            });
        }
        Ok(Self {
            path: path.into(),
            unit_consumption,
            ramp,
        })
    }

    fn write_series(&self, sites: &[Site]) -> Result<usize, PipelineError> {
        let series = aggregate(sites, self.unit_consumption, &self.ramp);

        let mut wtr = csv::Writer::from_path(&self.path)
            .map_err(|e| PipelineError::Sink(format!("failed to open output CSV: {e}")))?;

        write_series_csv(&mut wtr, &series)
            .map_err(|e| PipelineError::Sink(format!("failed to write output CSV: {e}")))?;

        Ok(series.len())
    }
}

#[async_trait::async_trait]
impl Sink<SiteRecord> for ProjectionCsvSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<SiteRecord>, PipelineError>>
            + Send
            + Unpin
            + 'static,
    {
        let mut sites: Vec<Site> = Vec::new();
        let mut rejected: usize = 0;

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping row rejected upstream");
                    rejected += 1;
                    continue;
                }
            };

            match Site::parse(&env.payload) {
                Ok(site) => {
                    metrics::counter!("projection_contributions_total")
                        .increment(self.ramp.len() as u64);
                    sites.push(site);
                }
                Err(e) => {
                    tracing::warn!(site = %env.payload.name, error = %e, "skipping invalid site row");
                    metrics::counter!("site_rows_invalid_total").increment(1);
                    rejected += 1;
                }
            }
        }

        let periods = self.write_series(&sites)?;

        metrics::counter!("projection_csv_rows_written_total").increment(periods as u64);
        tracing::info!(
            sites = sites.len(),
            rejected_rows = rejected,
            periods,
            output = %self.path.display(),
            "new-site projection exported"
        );

        Ok(())
    }
}
