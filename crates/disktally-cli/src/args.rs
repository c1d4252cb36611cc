/// Command-line arguments.
use clap::builder::TypedValueParser;
use clap::Parser;
use disktally_core::config::{DEFAULT_CONCURRENCY_LIMIT, DEFAULT_REPORT_INTERVAL};
use disktally_core::ScanOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "disktally")]
#[command(about = "Count files and bytes under one or more directories")]
#[command(
    long_about = "Count files and bytes under one or more directories.\n\n\
                  Press Enter (any key followed by Enter) to stop early; the partial totals are still printed."
)]
#[command(version)]
pub struct Args {
    /// Directories to scan (defaults to the current directory)
    pub roots: Vec<PathBuf>,

    /// Print running totals periodically while scanning
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of directories listed at the same time
    #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_CONCURRENCY_LIMIT,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub jobs: usize,

    /// How often verbose progress is printed (e.g. 250ms, 2s)
    #[arg(long, default_value = "500ms", value_parser = parse_interval)]
    pub interval: Duration,

    /// Worker threads running traversal tasks (defaults to the CPU count)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub threads: Option<usize>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug-level logging on stderr
    #[arg(long)]
    pub debug: bool,
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let d = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if d.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(d)
}

impl Args {
    /// Translate parsed arguments into core scan options.
    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::with_roots(self.roots.iter().cloned());
        options.verbose = self.verbose;
        options.concurrency_limit = self.jobs;
        options.report_interval = self.interval;
        if let Some(threads) = self.threads {
            options.walk_threads = threads;
        }
        options
    }
}

// Keep the clap default in sync with the core's.
const _: () = assert!(DEFAULT_REPORT_INTERVAL.as_millis() == 500);
