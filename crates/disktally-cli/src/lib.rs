/// DiskTally CLI — terminal frontend.
///
/// Parses arguments, wires the stdin keypress to the scan's cancellation
/// signal, and prints progress and the final report. Scanning itself lives
/// in `disktally-core`.
pub mod args;
pub mod output;
pub mod trigger;

pub use args::Args;

use anyhow::Context;
use crossbeam_channel::Receiver;
use disktally_core::scanner::{start_scan, FsLister, ScanProgress};
use disktally_core::ScanReport;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

/// Run a scan as described by `args`, printing to stdout.
///
/// Cancellation is not an error: a cancelled scan prints its partial
/// report and returns `Ok`.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let options = args.scan_options();
    let handle =
        start_scan(options, Arc::new(FsLister)).context("failed to start directory scan")?;

    if let Err(err) = trigger::spawn_stdin_trigger(handle.cancel_signal()) {
        warn!("Keypress cancellation unavailable: {err}");
    }

    let stdout = std::io::stdout();
    let printed = print_progress(&handle.progress_rx, &mut stdout.lock(), args.json)?;
    let report = handle.join().context("directory scan failed")?;
    if printed.is_none() {
        // Progress receiver closed without a final message; print from the
        // joined report instead.
        print_summary(&report, &mut stdout.lock(), args.json)?;
    }
    Ok(())
}

/// Print every progress message until the final report arrives.
///
/// Returns the final report, or `None` if the channel closed first.
pub fn print_progress<W: Write>(
    progress: &Receiver<ScanProgress>,
    out: &mut W,
    json: bool,
) -> anyhow::Result<Option<ScanReport>> {
    for message in progress.iter() {
        match message {
            ScanProgress::Update(totals) => {
                // JSON output stays a single document.
                if !json {
                    writeln!(out, "{}", output::progress_line(&totals))?;
                }
            }
            ScanProgress::Error { path, message } => {
                // Already logged as a warning by the walker.
                debug!(%path, %message, "Directory skipped");
            }
            ScanProgress::Complete(report) => {
                print_summary(&report, out, json)?;
                return Ok(Some(report));
            }
        }
    }
    Ok(None)
}

fn print_summary<W: Write>(report: &ScanReport, out: &mut W, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", output::summary_json(report)?)?;
    } else {
        writeln!(out, "{}", output::summary_line(report))?;
    }
    out.flush()?;
    Ok(())
}
