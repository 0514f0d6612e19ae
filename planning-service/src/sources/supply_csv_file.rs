use std::{fs::File, path::PathBuf};

use csv::StringRecord;
use futures::Stream;
use planning_core::{Period, SupplyRecord};

use crate::pipeline::{Envelope, PipelineError, Source};

/// CSV source for historical supply-by-category rows.
///
/// Expected header columns (by name):
/// - year
/// - month
/// - end_use (residential | industrial | commercial | cogeneration)
/// - volume (㎥)
///
/// A row that fails to parse is yielded as an `Err` item and reading
/// continues with the next row; only open/header failures end the stream.
pub struct SupplyCsvFileSource {
    path: PathBuf,
}

impl SupplyCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn record_to_supply_row(
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<SupplyRecord, PipelineError> {
    let get = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV record")))
    };

    let year_str = get("year")?;
    let year: i32 = year_str
        .trim()
        .parse()
        .map_err(|e| PipelineError::Source(format!("invalid year '{year_str}': {e}")))?;

    let month_str = get("month")?;
    let month: u8 = month_str
        .trim()
        .parse()
        .map_err(|e| PipelineError::Source(format!("invalid month '{month_str}': {e}")))?;

    let period = Period::new(year, month)
        .map_err(|e| PipelineError::Source(e.to_string()))?;

    let end_use_str = get("end_use")?;
    let end_use = end_use_str
        .parse()
        .map_err(|e| PipelineError::Source(format!("invalid end_use '{end_use_str}': {e}")))?;

    let volume_str = get("volume")?;
    let volume: f64 = volume_str
        .trim()
        .parse()
        .map_err(|e| PipelineError::Source(format!("invalid volume '{volume_str}': {e}")))?;

    Ok(SupplyRecord {
        period,
        end_use,
        volume,
    })
}

#[async_trait::async_trait]
impl Source<SupplyRecord> for SupplyCsvFileSource {
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<SupplyRecord>, PipelineError>> + Send>>
    {
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
                        metrics::counter!("supply_csv_parse_errors_total").increment(1);
                        yield Err(PipelineError::Source(format!("failed to read CSV record: {e}")));
                        continue;
                    }
                };

                match record_to_supply_row(&record, &headers) {
                    Ok(row) => yield Ok(Envelope::now(row)),
                    Err(e) => {
                        metrics::counter!("supply_csv_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planning_core::EndUse;

    #[test]
    fn parses_typed_supply_row() {
        let headers = StringRecord::from(vec!["year", "month", "end_use", "volume"]);
        let record = StringRecord::from(vec!["2025", "7", "industrial", "123456.5"]);

        let row = record_to_supply_row(&record, &headers).unwrap();
        assert_eq!(row.period.to_string(), "2025-07");
        assert_eq!(row.end_use, EndUse::Industrial);
        assert_eq!(row.volume, 123456.5);
    }

    #[test]
    fn unknown_category_is_a_source_error() {
        let headers = StringRecord::from(vec!["year", "month", "end_use", "volume"]);
        let record = StringRecord::from(vec!["2025", "7", "hydrogen", "1.0"]);

        assert!(record_to_supply_row(&record, &headers).is_err());
    }

    #[tokio::test]
    async fn bad_row_does_not_end_the_stream() {
        use futures::StreamExt;

        let path = std::env::temp_dir().join("supply_csv_source_bad_row_test.csv");
        std::fs::write(
            &path,
            "year,month,end_use,volume\n\
             2025,1,residential,10.0\n\
             2025,2,hydrogen,5.0\n\
             2025,3,industrial,20.0\n",
        )
        .unwrap();

        let source = SupplyCsvFileSource::new(&path);
        let items: Vec<_> = source.stream().await.collect().await;

        assert_eq!(items.len(), 3);
        assert!(items[1].is_err());

        let periods: Vec<String> = items
            .iter()
            .filter_map(|i| i.as_ref().ok())
            .map(|env| env.payload.period.to_string())
            .collect();
        assert_eq!(periods, ["2025-01", "2025-03"]);

        std::fs::remove_file(&path).ok();
    }
}
