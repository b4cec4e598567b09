pub mod report;
pub mod status;
pub mod units;
