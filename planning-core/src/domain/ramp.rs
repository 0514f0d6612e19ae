use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvalidInput;

/// Move-in ramp: one percentage per month offset from a site's start period.
///
/// Offset 0 is the start month itself. The schedule length is the sole
/// projection horizon; nothing is extrapolated past the last entry. Values
/// above 100 are accepted on purpose so analysts can model overshoot
/// scenarios; only negative entries are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampSchedule(Vec<f64>);

impl RampSchedule {
    pub fn new(percentages: Vec<f64>) -> Result<Self, InvalidInput> {
        if percentages.is_empty() {
            return Err(InvalidInput::Ramp {
                reason: "schedule must have at least one entry".to_string(),
            });
        }
        if let Some(bad) = percentages.iter().find(|p| **p < 0.0 || !p.is_finite()) {
            return Err(InvalidInput::Ramp {
                reason: format!("percentage {bad} must be a non-negative number"),
            });
        }
        Ok(Self(percentages))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn percentages(&self) -> &[f64] {
        &self.0
    }
}

impl FromStr for RampSchedule {
    type Err = InvalidInput;

    /// Parses the comma-separated form used by the parameter table,
    /// e.g. `"30,60,85,100"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut percentages = Vec::new();
        for part in s.split(',') {
            let p: f64 = part.trim().parse().map_err(|_| InvalidInput::Ramp {
                reason: format!("'{}' is not a number", part.trim()),
            })?;
            percentages.push(p);
        }
        Self::new(percentages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_schedule() {
        let ramp: RampSchedule = "30,60,85,100".parse().unwrap();
        assert_eq!(ramp.percentages(), &[30.0, 60.0, 85.0, 100.0]);
    }

    #[test]
    fn parses_with_whitespace_and_fractions() {
        let ramp: RampSchedule = " 25.5, 50 ,110".parse().unwrap();
        assert_eq!(ramp.percentages(), &[25.5, 50.0, 110.0]);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!("".parse::<RampSchedule>().is_err());
        assert!("30,,60".parse::<RampSchedule>().is_err());
        assert!("30,sixty".parse::<RampSchedule>().is_err());
    }

    #[test]
    fn rejects_negative_but_permits_overshoot() {
        assert!(RampSchedule::new(vec![30.0, -1.0]).is_err());
        assert!(RampSchedule::new(vec![120.0]).is_ok());
    }
}
