//! DiskTally — cancellable, bounded-concurrency disk usage counter.
//!
//! Thin binary entry point. All logic lives in the `disktally-core`
//! and `disktally-cli` crates.

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = disktally_cli::Args::parse();

    // Structured logging goes to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("DiskTally starting");

    disktally_cli::run(&args)
}
