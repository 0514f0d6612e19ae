use serde::{Deserialize, Serialize};

use super::error::InvalidInput;
use super::period::Period;

/// One row of the editable site grid, exactly as the tabular collaborator
/// hands it over. `units` stays textual here because upstream grids deliver
/// it as either a string or an integer; conversion happens in [`Site::parse`]
/// so that a bad cell rejects one row, not the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub name: String,
    pub units: String,
    pub start_period: String,
}

/// A validated development site: `units` households moving in from `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub units: u32,
    pub start: Period,
}

impl Site {
    /// Validates a raw grid row.
    ///
    /// Zero units is a legal site (it projects an all-zero series); negative
    /// or non-numeric unit counts and malformed start periods are not.
    pub fn parse(record: &SiteRecord) -> Result<Self, InvalidInput> {
        let units_raw = record.units.trim();
        let units: u32 = units_raw.parse().map_err(|_| InvalidInput::Units {
            raw: units_raw.to_string(),
        })?;

        let start: Period = record.start_period.parse()?;

        Ok(Self {
            name: record.name.trim().to_string(),
            units,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(units: &str, start: &str) -> SiteRecord {
        SiteRecord {
            name: "A".to_string(),
            units: units.to_string(),
            start_period: start.to_string(),
        }
    }

    #[test]
    fn parses_valid_row() {
        let site = Site::parse(&record("500", "2026-03")).unwrap();
        assert_eq!(site.units, 500);
        assert_eq!(site.start.to_string(), "2026-03");
    }

    #[test]
    fn accepts_zero_units() {
        assert_eq!(Site::parse(&record("0", "2026-03")).unwrap().units, 0);
    }

    #[test]
    fn rejects_non_integer_units() {
        assert!(matches!(
            Site::parse(&record("abc", "2026-03")),
            Err(InvalidInput::Units { .. })
        ));
        assert!(matches!(
            Site::parse(&record("-5", "2026-03")),
            Err(InvalidInput::Units { .. })
        ));
    }

    #[test]
    fn rejects_bad_start_period() {
        assert!(matches!(
            Site::parse(&record("500", "bad")),
            Err(InvalidInput::StartPeriod { .. })
        ));
    }
}
