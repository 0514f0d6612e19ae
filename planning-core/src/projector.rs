//! New-development volume projection.
//!
//! The projector turns a validated site into a short monthly series: one
//! entry per ramp offset, volume = units x per-unit consumption x ramp%.
//! Aggregation sums those series across sites per calendar month. Both are
//! pure functions; every recomputation starts from scratch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{InvalidInput, Period, RampSchedule, Site, SiteRecord};

/// Incremental volume one site contributes in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyContribution {
    pub period: Period,
    pub volume: f64,
}

/// Period-ascending total of [`MonthlyContribution`]s across sites.
pub type AggregatedSeries = BTreeMap<Period, f64>;

/// A site row that failed validation, kept so callers can report it instead
/// of letting it silently vanish from the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Zero-based index of the row in the input batch.
    pub index: usize,
    pub name: String,
    pub error: InvalidInput,
}

/// Result of projecting a raw batch: the aggregate over the rows that
/// validated, plus the rows that did not.
#[derive(Debug, Clone, Default)]
pub struct ProjectionOutcome {
    pub series: AggregatedSeries,
    pub rejected: Vec<RejectedRow>,
}

/// Projects one site over the ramp schedule.
///
/// Produces exactly `ramp.len()` entries on consecutive months starting at
/// `site.start`; the schedule is the whole horizon, there is no tail-off
/// beyond it. A zero-unit site yields all-zero volumes, not an empty series.
pub fn project(site: &Site, consumption: f64, ramp: &RampSchedule) -> Vec<MonthlyContribution> {
    ramp.percentages()
        .iter()
        .enumerate()
        .map(|(i, pct)| MonthlyContribution {
            period: site.start.add_months(i as u32),
            volume: site.units as f64 * consumption * (pct / 100.0),
        })
        .collect()
}

/// Sums per-site projections into one monthly series.
///
/// Grouping is order-independent: permuting `sites` yields the same mapping.
pub fn aggregate(sites: &[Site], consumption: f64, ramp: &RampSchedule) -> AggregatedSeries {
    let mut series = AggregatedSeries::new();
    for site in sites {
        for c in project(site, consumption, ramp) {
            *series.entry(c.period).or_insert(0.0) += c.volume;
        }
    }
    series
}

/// Projects a raw batch with the skip-on-failure policy.
///
/// Each row is validated independently; a malformed unit count or start
/// period excludes that row from the aggregate and records it in
/// `rejected`, while every other row still contributes normally.
pub fn aggregate_records(
    records: &[SiteRecord],
    consumption: f64,
    ramp: &RampSchedule,
) -> Result<ProjectionOutcome, InvalidInput> {
    if consumption < 0.0 || !consumption.is_finite() {
        return Err(InvalidInput::Consumption { value: consumption });
    }

    let mut outcome = ProjectionOutcome::default();
    for (index, record) in records.iter().enumerate() {
        match Site::parse(record) {
            Ok(site) => {
                for c in project(&site, consumption, ramp) {
                    *outcome.series.entry(c.period).or_insert(0.0) += c.volume;
                }
            }
            Err(error) => outcome.rejected.push(RejectedRow {
                index,
                name: record.name.trim().to_string(),
                error,
            }),
        }
    }
    Ok(outcome)
}
