use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvalidInput;

/// A calendar month, the time grain of every series in this crate.
///
/// Ordering is year-major then month, so `BTreeMap<Period, _>` iterates in
/// chronological order. Month arithmetic rolls over at year boundaries
/// (month 13 of year Y is month 1 of year Y+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u8,
}

impl Period {
    pub fn new(year: i32, month: u8) -> Result<Self, InvalidInput> {
        if !(1..=12).contains(&month) {
            return Err(InvalidInput::StartPeriod {
                raw: format!("{year}-{month}"),
            });
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// The period `n` whole months after `self`.
    pub fn add_months(&self, n: u32) -> Self {
        let zero_based = self.month as i64 - 1 + n as i64;
        Self {
            year: self.year + (zero_based / 12) as i32,
            month: (zero_based % 12) as u8 + 1,
        }
    }
}

impl FromStr for Period {
    type Err = InvalidInput;

    /// Parses the `"YYYY-MM"` form used by the site grid and the CSV exports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InvalidInput::StartPeriod { raw: s.to_string() };

        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u8 = m.parse().map_err(|_| bad())?;
        Period::new(year, month).map_err(|_| bad())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for Period {
    type Error = InvalidInput;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_month_string() {
        let p: Period = "2026-03".parse().unwrap();
        assert_eq!(p.year(), 2026);
        assert_eq!(p.month(), 3);
        assert_eq!(p.to_string(), "2026-03");
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("bad".parse::<Period>().is_err());
        assert!("2026".parse::<Period>().is_err());
        assert!("2026-00".parse::<Period>().is_err());
        assert!("2026-13".parse::<Period>().is_err());
        assert!("2026-3x".parse::<Period>().is_err());
    }

    #[test]
    fn add_months_rolls_over_year_boundary() {
        let nov: Period = "2026-11".parse().unwrap();
        assert_eq!(nov.add_months(0).to_string(), "2026-11");
        assert_eq!(nov.add_months(1).to_string(), "2026-12");
        assert_eq!(nov.add_months(2).to_string(), "2027-01");
        assert_eq!(nov.add_months(14).to_string(), "2028-01");
    }

    #[test]
    fn orders_chronologically() {
        let a: Period = "2025-12".parse().unwrap();
        let b: Period = "2026-01".parse().unwrap();
        let c: Period = "2026-02".parse().unwrap();
        assert!(a < b && b < c);
    }
}
