//! Gift scanner core: pure aggregate state and report ordering.
mod record;
mod report;
mod stats;

pub use record::{ExtractedRecord, Identifier};
pub use report::{parse_rarity, Report, ReportRow, UNPARSABLE_RARITY};
pub use stats::{AggregateStats, CategoryCount, FailureCategory, FailureTally};
