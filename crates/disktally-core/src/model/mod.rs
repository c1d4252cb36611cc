/// Data model for scan results.
///
/// Counters are plain `u64`s owned by the aggregator; nothing here is shared
/// between threads.
pub mod totals;

pub use totals::{ScanReport, Totals};
