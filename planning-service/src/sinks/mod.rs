pub mod projection_csv;
pub mod supply_pivot_csv;

pub use projection_csv::ProjectionCsvSink;
pub use supply_pivot_csv::SupplyPivotCsvSink;
