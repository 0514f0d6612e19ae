pub mod error;
pub mod period;
pub mod ramp;
pub mod site;
pub mod supply;

pub use error::InvalidInput;
pub use period::Period;
pub use ramp::RampSchedule;
pub use site::{Site, SiteRecord};
pub use supply::{EndUse, SupplyRecord};
