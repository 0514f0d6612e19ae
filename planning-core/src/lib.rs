pub mod domain;
pub mod projector;

pub use domain::{EndUse, InvalidInput, Period, RampSchedule, Site, SiteRecord, SupplyRecord};
pub use projector::{
    aggregate, aggregate_records, project, AggregatedSeries, MonthlyContribution,
    ProjectionOutcome, RejectedRow,
};
