/// Aggregator — the single consumer of walk events.
///
/// Waits on three sources at once with `crossbeam_channel::select!`:
/// walk events, a progress ticker (verbose scans only), and the
/// cancellation signal. Totals live on this thread alone, so no locking.
///
/// Once cancellation is observed the aggregator switches to drain mode:
/// ticks are ignored, but events are still received and counted until the
/// walker closes the channel. Producers already past their permit are
/// therefore never left blocked on a send nobody answers.
use crate::model::{ScanReport, Totals};
use crate::scanner::cancel::CancelSignal;
use crate::scanner::progress::{ProgressSink, ScanProgress};
use crate::scanner::walker::WalkEvent;
use chrono::Local;
use crossbeam_channel::{select, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct Aggregator {
    totals: Totals,
    cancel: CancelSignal,
    interval: Option<Duration>,
}

impl Aggregator {
    /// `interval` of `None` disables periodic updates.
    pub fn new(cancel: CancelSignal, interval: Option<Duration>) -> Self {
        Self {
            totals: Totals::default(),
            cancel,
            interval,
        }
    }

    /// Consume `events` until the channel closes, then emit and return the
    /// final report.
    pub fn run<S: ProgressSink + ?Sized>(
        mut self,
        events: Receiver<WalkEvent>,
        started: Instant,
        sink: &mut S,
    ) -> ScanReport {
        let ticks = match self.interval {
            Some(interval) => crossbeam_channel::tick(interval),
            None => crossbeam_channel::never(),
        };
        let cancelled = self.cancel.watch().clone();

        loop {
            select! {
                recv(events) -> event => match event {
                    Ok(event) => self.record(event, sink),
                    Err(_) => break,
                },
                recv(ticks) -> _ => {
                    // A tick racing the signal loses; the next pass drains.
                    if !self.cancel.is_set() {
                        sink.report(ScanProgress::Update(self.totals));
                    }
                }
                recv(cancelled) -> _ => {
                    info!("Scan cancelled; draining outstanding results");
                    self.drain(&events, sink);
                    break;
                }
            }
        }

        let report = ScanReport {
            totals: self.totals,
            // The walk may also have closed on its own after cancellation
            // skipped work; either way the totals are partial.
            cancelled: self.cancel.is_set(),
            duration: started.elapsed(),
            finished_at: Local::now(),
        };
        sink.report(ScanProgress::Complete(report.clone()));
        report
    }

    fn drain<S: ProgressSink + ?Sized>(&mut self, events: &Receiver<WalkEvent>, sink: &mut S) {
        let before = self.totals.files;
        for event in events.iter() {
            self.record(event, sink);
        }
        debug!(drained = self.totals.files - before, "Drain complete");
    }

    fn record<S: ProgressSink + ?Sized>(&mut self, event: WalkEvent, sink: &mut S) {
        match event {
            WalkEvent::File(size) => self.totals.add_file(size),
            WalkEvent::Directory => self.totals.add_dir(),
            WalkEvent::Failed { path, message } => {
                self.totals.add_failure();
                sink.report(ScanProgress::Error {
                    path: path.to_string_lossy().into_owned(),
                    message,
                });
            }
        }
    }
}
