use planning_core::{SiteRecord, SupplyRecord};

use crate::pipeline::{Envelope, PipelineError, Transform};

/// Pure validation of a raw site grid row.
///
/// Rules:
/// - a fully blank row (every cell empty after trimming) is dropped, the
///   grid equivalent of trailing empty editor rows;
/// - surviving cells are trimmed in place.
///
/// Unit-count and start-period parsing deliberately does NOT happen here;
/// those failures belong to the projection boundary, where they are counted
/// per row instead of aborting the stream.
pub fn validate_site_record(
    env: Envelope<SiteRecord>,
) -> Result<Envelope<SiteRecord>, PipelineError> {
    let r = &env.payload;

    if r.name.trim().is_empty() && r.units.trim().is_empty() && r.start_period.trim().is_empty() {
        return Err(PipelineError::Transform("blank site row".to_string()));
    }

    let trimmed = SiteRecord {
        name: r.name.trim().to_string(),
        units: r.units.trim().to_string(),
        start_period: r.start_period.trim().to_string(),
    };

    Ok(Envelope {
        payload: trimmed,
        received_at: env.received_at,
    })
}

/// Pure validation of a `SupplyRecord`.
///
/// Rules:
/// - volume must be non-negative;
/// - period year must be within a broad sanity window [2000, 2100).
pub fn validate_supply_record(
    env: Envelope<SupplyRecord>,
) -> Result<Envelope<SupplyRecord>, PipelineError> {
    let r = &env.payload;

    if r.volume < 0.0 {
        return Err(PipelineError::Transform("volume must be non-negative".to_string()));
    }

    if !(2000..2100).contains(&r.period.year()) {
        return Err(PipelineError::Transform("period out of allowed range".to_string()));
    }

    Ok(env)
}

#[derive(Clone, Default)]
pub struct SiteRecordValidation;

#[async_trait::async_trait]
impl Transform<SiteRecord, SiteRecord> for SiteRecordValidation {
    async fn apply(
        &self,
        input: Envelope<SiteRecord>,
    ) -> Result<Envelope<SiteRecord>, PipelineError> {
        match validate_site_record(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("site_rows_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct SupplyValidation;

#[async_trait::async_trait]
impl Transform<SupplyRecord, SupplyRecord> for SupplyValidation {
    async fn apply(
        &self,
        input: Envelope<SupplyRecord>,
    ) -> Result<Envelope<SupplyRecord>, PipelineError> {
        match validate_supply_record(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("supply_rows_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planning_core::EndUse;

    fn site_env(name: &str, units: &str, start: &str) -> Envelope<SiteRecord> {
        Envelope::now(SiteRecord {
            name: name.to_string(),
            units: units.to_string(),
            start_period: start.to_string(),
        })
    }

    #[test]
    fn site_validation_trims_cells() {
        let env = site_env(" A ", " 500 ", " 2026-03 ");
        let out = validate_site_record(env).unwrap();
        assert_eq!(out.payload.name, "A");
        assert_eq!(out.payload.units, "500");
        assert_eq!(out.payload.start_period, "2026-03");
    }

    #[test]
    fn site_validation_drops_blank_rows() {
        let env = site_env("  ", "", " ");
        assert!(matches!(
            validate_site_record(env),
            Err(PipelineError::Transform(_))
        ));
    }

    #[test]
    fn site_validation_keeps_unparseable_cells() {
        // Parse failures are the projector's call, not the validator's.
        let env = site_env("A", "abc", "bad");
        assert!(validate_site_record(env).is_ok());
    }

    #[test]
    fn supply_validation_rejects_negative_volume() {
        let env = Envelope::now(SupplyRecord {
            period: "2025-07".parse().unwrap(),
            end_use: EndUse::Residential,
            volume: -0.1,
        });
        assert!(matches!(
            validate_supply_record(env),
            Err(PipelineError::Transform(_))
        ));
    }

    #[test]
    fn supply_validation_rejects_out_of_window_period() {
        let env = Envelope::now(SupplyRecord {
            period: "1800-01".parse().unwrap(),
            end_use: EndUse::Residential,
            volume: 1.0,
        });
        assert!(matches!(
            validate_supply_record(env),
            Err(PipelineError::Transform(_))
        ));
    }

    #[test]
    fn supply_validation_accepts_valid_record() {
        let env = Envelope::now(SupplyRecord {
            period: "2025-07".parse().unwrap(),
            end_use: EndUse::Cogeneration,
            volume: 1.0,
        });
        assert!(validate_supply_record(env).is_ok());
    }
}
