use std::{fs::File, path::PathBuf};

use csv::StringRecord;
use futures::Stream;
use planning_core::SiteRecord;

use crate::pipeline::{Envelope, PipelineError, Source};

/// CSV source for development-site rows.
///
/// Expected header columns (by name):
/// - name
/// - units
/// - start_period (YYYY-MM)
///
/// Cells are carried verbatim as strings; numeric and period parsing happens
/// at the projection boundary so one bad cell rejects one row, not the file.
/// A row the CSV reader itself cannot decode is yielded as an `Err` item and
/// reading continues; only open/header failures end the stream.
pub struct SiteCsvFileSource {
    path: PathBuf,
}

impl SiteCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn record_to_site_row(
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<SiteRecord, PipelineError> {
    let get = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV record")))
    };

    Ok(SiteRecord {
        name: get("name")?.to_string(),
        units: get("units")?.to_string(),
        start_period: get("start_period")?.to_string(),
    })
}

#[async_trait::async_trait]
impl Source<SiteRecord> for SiteCsvFileSource {
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<SiteRecord>, PipelineError>> + Send>>
    {
        // Blocking CSV reader wrapped in a single async task; site lists are
        // a few dozen rows, not bulk data.
        let path = self.path.clone();
        let s = async_stream::stream! {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to open CSV file: {e}")));
                    return;
                }
            };
            let mut rdr = csv::Reader::from_reader(file);
            let headers = match rdr.headers() {
                Ok(h) => h.clone(),
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to read CSV headers: {e}")));
                    return;
                }
            };

            for result in rdr.records() {
                let record = match result {
                    Ok(r) => r,
                    Err(e) => {
                        metrics::counter!("site_csv_parse_errors_total").increment(1);
                        yield Err(PipelineError::Source(format!("failed to read CSV record: {e}")));
                        continue;
                    }
                };

                match record_to_site_row(&record, &headers) {
                    Ok(row) => yield Ok(Envelope::now(row)),
                    Err(e) => {
                        metrics::counter!("site_csv_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
