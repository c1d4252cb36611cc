/// DiskTally Core — concurrent directory walking and size aggregation.
///
/// This crate contains all business logic with zero terminal dependencies.
/// Frontends (the bundled CLI, tests, embedders) drive it through
/// [`scanner::run_scan`] or [`scanner::start_scan`].
///
/// # Modules
///
/// - [`config`] — Scan options and their validation.
/// - [`error`] — Listing and setup error types.
/// - [`model`] — Running totals and the final scan report.
/// - [`scanner`] — Throttled parallel walker, cancellation, and the aggregator.
pub mod config;
pub mod error;
pub mod model;
pub mod scanner;

pub use config::ScanOptions;
pub use error::{ConfigError, ListError, ScanError};
pub use model::{ScanReport, Totals};
