/// Scan progress reporting — messages emitted by the aggregator to whoever
/// is watching the scan (terminal, test, embedding application).
use crate::model::{ScanReport, Totals};

/// Progress updates emitted by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanProgress {
    /// Periodic snapshot of the running totals (verbose scans only).
    Update(Totals),
    /// A directory could not be listed and was counted as empty.
    Error { path: String, message: String },
    /// Final report. Sent exactly once, after everything else.
    Complete(ScanReport),
}

/// Receiver side of progress reporting.
///
/// Implemented for closures; [`start_scan`](super::start_scan) wraps a
/// channel sender in one to report across threads.
pub trait ProgressSink {
    fn report(&mut self, progress: ScanProgress);
}

impl<F: FnMut(ScanProgress)> ProgressSink for F {
    fn report(&mut self, progress: ScanProgress) {
        self(progress)
    }
}
