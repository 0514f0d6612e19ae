/// Row-level input failure.
///
/// Every variant is recoverable at the granularity of one input row: callers
/// drop the offending row from the batch and keep going, surfacing the
/// rejection instead of aborting the whole computation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("unit count '{raw}' is not a non-negative integer")]
    Units { raw: String },
    #[error("start period '{raw}' is not in YYYY-MM form")]
    StartPeriod { raw: String },
    #[error("unit consumption {value} must be non-negative")]
    Consumption { value: f64 },
    #[error("ramp schedule invalid: {reason}")]
    Ramp { reason: String },
}
