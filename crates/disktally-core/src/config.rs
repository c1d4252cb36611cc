/// Scan options consumed once at startup.
use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of directory listings allowed in flight at once.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 4;

/// Default cadence of verbose progress reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Everything a scan needs to know before it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directories to walk. Walked concurrently, totals are combined.
    pub roots: Vec<PathBuf>,
    /// Emit a progress update every `report_interval`.
    pub verbose: bool,
    /// Maximum number of directory listings running at the same time.
    pub concurrency_limit: usize,
    pub report_interval: Duration,
    /// Size of the worker pool running traversal tasks.
    ///
    /// Independent of `concurrency_limit`: tasks beyond the limit park on
    /// the throttle, so extra threads only help when the lister is slow.
    pub walk_threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            verbose: false,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            report_interval: DEFAULT_REPORT_INTERVAL,
            walk_threads: num_cpus::get(),
        }
    }
}

impl ScanOptions {
    /// Options for the given roots, everything else defaulted.
    ///
    /// An empty `roots` falls back to the current directory.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut options = Self::default();
        let roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
        if !roots.is_empty() {
            options.roots = roots;
        }
        options
    }

    /// Reject values that would make the scan hang or never report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.report_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.walk_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}
