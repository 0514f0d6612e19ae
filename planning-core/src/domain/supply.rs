use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::period::Period;

/// End-use category of gas demand, as reported in the supply history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndUse {
    Residential,
    Industrial,
    Commercial,
    Cogeneration,
}

impl EndUse {
    pub const ALL: [EndUse; 4] = [
        EndUse::Residential,
        EndUse::Industrial,
        EndUse::Commercial,
        EndUse::Cogeneration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EndUse::Residential => "residential",
            EndUse::Industrial => "industrial",
            EndUse::Commercial => "commercial",
            EndUse::Cogeneration => "cogeneration",
        }
    }
}

impl FromStr for EndUse {
    type Err = UnknownEndUse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(EndUse::Residential),
            "industrial" => Ok(EndUse::Industrial),
            "commercial" => Ok(EndUse::Commercial),
            "cogeneration" => Ok(EndUse::Cogeneration),
            other => Err(UnknownEndUse {
                raw: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EndUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unknown end-use category '{raw}'")]
pub struct UnknownEndUse {
    pub raw: String,
}

/// One row of the historical supply book: volume (㎥) delivered to one
/// end-use category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyRecord {
    pub period: Period,
    pub end_use: EndUse,
    pub volume: f64,
}

/// Groups supply rows into a monthly pivot: period -> end use -> total volume.
///
/// Rows for the same (period, end use) pair sum; iteration order is
/// period-ascending, which downstream export relies on.
pub fn monthly_by_use(records: &[SupplyRecord]) -> BTreeMap<Period, BTreeMap<EndUse, f64>> {
    let mut pivot: BTreeMap<Period, BTreeMap<EndUse, f64>> = BTreeMap::new();
    for r in records {
        *pivot
            .entry(r.period)
            .or_default()
            .entry(r.end_use)
            .or_insert(0.0) += r.volume;
    }
    pivot
}
