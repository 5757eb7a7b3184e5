// Reporting module
// Period resolution, aggregation and period-over-period comparison over
// the record store

pub mod aggregator;
pub mod comparator;
pub mod engine;
pub mod error;
pub mod period;
pub mod reports;

pub use engine::ReportingEngine;
pub use error::{ReportError, ReportResult};
pub use period::ComparisonPeriods;
