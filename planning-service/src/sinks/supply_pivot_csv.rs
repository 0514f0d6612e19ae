use std::path::PathBuf;

use futures::StreamExt;
use planning_core::domain::supply::monthly_by_use;
use planning_core::{EndUse, SupplyRecord};

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Terminal stage of the supply-history pipeline: pivots monthly volume by
/// end-use category and writes one CSV row per period, period-ascending,
/// with one column per category. Missing (period, category) cells are 0.
pub struct SupplyPivotCsvSink {
    path: PathBuf,
}

impl SupplyPivotCsvSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn write_pivot(&self, records: &[SupplyRecord]) -> Result<usize, PipelineError> {
        let pivot = monthly_by_use(records);

        let mut wtr = csv::Writer::from_path(&self.path)
            .map_err(|e| PipelineError::Sink(format!("failed to open output CSV: {e}")))?;

        let mut header = vec!["period".to_string()];
        header.extend(EndUse::ALL.iter().map(|u| u.label().to_string()));
        wtr.write_record(&header)
            .map_err(|e| PipelineError::Sink(format!("failed to write CSV header: {e}")))?;

        for (period, by_use) in &pivot {
            let mut row = vec![period.to_string()];
            for end_use in EndUse::ALL {
                row.push(by_use.get(&end_use).copied().unwrap_or(0.0).to_string());
            }
            wtr.write_record(&row)
                .map_err(|e| PipelineError::Sink(format!("failed to write CSV row: {e}")))?;
        }

        wtr.flush()
            .map_err(|e| PipelineError::Sink(format!("failed to flush output CSV: {e}")))?;

        Ok(pivot.len())
    }
}

#[async_trait::async_trait]
impl Sink<SupplyRecord> for SupplyPivotCsvSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<SupplyRecord>, PipelineError>>
            + Send
            + Unpin
            + 'static,
    {
        let mut records: Vec<SupplyRecord> = Vec::new();
        let mut rejected: usize = 0;

        while let Some(item) = input.next().await {
            match item {
                Ok(env) => records.push(env.payload),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping supply row rejected upstream");
                    rejected += 1;
                }
            }
        }

        let periods = self.write_pivot(&records)?;

        tracing::info!(
            rows = records.len(),
            rejected_rows = rejected,
            periods,
            output = %self.path.display(),
            "monthly supply pivot exported"
        );

        Ok(())
    }
}
