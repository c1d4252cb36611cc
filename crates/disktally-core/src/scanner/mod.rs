/// Scanner module — orchestrates a directory-size scan.
///
/// Pieces, leaves first:
/// - [`lister`] — reads one directory (`DirLister` trait, `FsLister`).
/// - [`throttle`] — bounded permit pool, at most N listings in flight.
/// - [`cancel`] — one-shot cancellation signal.
/// - [`tracker`] — counts outstanding traversal tasks.
/// - [`walker`] — fans out one task per directory, emits sizes.
/// - [`aggregate`] — single consumer: totals, periodic and final reports.
///
/// [`run_scan`] drives a scan on the calling thread; [`start_scan`] runs it
/// on a background thread and hands back a [`ScanHandle`].
pub mod aggregate;
pub mod cancel;
pub mod lister;
pub mod progress;
pub mod throttle;
pub mod tracker;
pub mod walker;

pub use cancel::CancelSignal;
pub use lister::{DirEntry, DirLister, FsLister};
pub use progress::{ProgressSink, ScanProgress};

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::model::ScanReport;
use aggregate::Aggregator;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;
use walker::Walker;

/// Maximum number of progress messages that may queue up in the channel
/// returned by [`start_scan`].
///
/// Only failures and verbose ticks are queued before the final report, so
/// this is generous. If a consumer stops reading entirely the aggregator
/// stalls, and through the rendezvous channel so does the walk, rather than
/// growing the heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Run a complete scan on the calling thread.
///
/// Blocks until the walk has finished (or been cancelled and drained) and
/// returns the final report, which is also delivered to `sink` as
/// [`ScanProgress::Complete`].
pub fn run_scan<S: ProgressSink + ?Sized>(
    options: &ScanOptions,
    lister: Arc<dyn DirLister>,
    cancel: &CancelSignal,
    sink: &mut S,
) -> Result<ScanReport, ScanError> {
    options.validate()?;
    info!(
        "Starting scan of {} root(s), concurrency limit {}",
        options.roots.len(),
        options.concurrency_limit
    );

    let started = Instant::now();
    let events = Walker::new(lister, cancel.clone())
        .concurrency_limit(options.concurrency_limit)
        .threads(options.walk_threads)
        .spawn(&options.roots)?;

    let interval = options.verbose.then_some(options.report_interval);
    let report = Aggregator::new(cancel.clone(), interval).run(events, started, sink);

    info!(
        files = report.totals.files,
        bytes = report.totals.bytes,
        failures = report.totals.failures,
        cancelled = report.cancelled,
        "Scan finished in {:?}",
        report.duration
    );
    Ok(report)
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Progress updates, failures, and finally [`ScanProgress::Complete`].
    ///
    /// Keep draining this (or drop it) while the scan runs; see
    /// [`PROGRESS_CHANNEL_CAPACITY`].
    pub progress_rx: Receiver<ScanProgress>,
    cancel: CancelSignal,
    thread: Option<thread::JoinHandle<Result<ScanReport, ScanError>>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible. Idempotent.
    pub fn cancel(&self) {
        self.cancel.fire();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_set()
    }

    /// A clone of the scan's signal, for external triggers.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Wait for the scan thread and return its report.
    pub fn join(mut self) -> Result<ScanReport, ScanError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ScanError::Panicked)?,
            None => Err(ScanError::Panicked),
        }
    }
}

/// Start a scan on a background thread.
///
/// Options are validated up front so configuration mistakes surface here
/// rather than as a dead thread.
pub fn start_scan(
    options: ScanOptions,
    lister: Arc<dyn DirLister>,
) -> Result<ScanHandle, ScanError> {
    options.validate()?;

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelSignal::new();
    let cancel_clone = cancel.clone();

    let thread = thread::Builder::new()
        .name("disktally-scanner".into())
        .spawn(move || {
            // A dropped receiver just means nobody is watching any more.
            let mut sink = |progress: ScanProgress| {
                let _ = progress_tx.send(progress);
            };
            run_scan(&options, lister, &cancel_clone, &mut sink)
        })
        .map_err(|source| ScanError::Spawn {
            name: "scanner",
            source,
        })?;

    Ok(ScanHandle {
        progress_rx,
        cancel,
        thread: Some(thread),
    })
}
