pub mod site_csv_file;
pub mod supply_csv_file;

pub use site_csv_file::SiteCsvFileSource;
pub use supply_csv_file::SupplyCsvFileSource;
