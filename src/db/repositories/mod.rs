pub mod records;
pub mod reports;

pub use reports::default_report_epoch;
