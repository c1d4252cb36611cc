/// Error types for the scanner.
///
/// Two families:
/// - [`ListError`] — one directory could not be listed. Never fatal; the
///   walker logs it, counts it, and treats the directory as empty.
/// - [`ScanError`] — the scan could not be set up or its thread died.
///
/// Cancellation is not an error and has no variant here.
use std::path::PathBuf;
use thiserror::Error;

/// Failure to list a single directory.
#[derive(Error, Debug)]
pub enum ListError {
    /// The directory itself could not be opened or read.
    #[error("cannot read directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry inside the directory could not be inspected.
    #[error("cannot stat '{}': {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lister-specific failure (in-memory or remote listers).
    #[error("cannot list '{}': {reason}", .path.display())]
    Other { path: PathBuf, reason: String },
}

impl ListError {
    /// The path the failure refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ListError::ReadDir { path, .. }
            | ListError::Metadata { path, .. }
            | ListError::Other { path, .. } => path,
        }
    }
}

/// Rejected scan options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("report interval must be greater than zero")]
    ZeroInterval,

    #[error("worker thread count must be at least 1")]
    ZeroThreads,
}

/// Errors that prevent a scan from running to its final report.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid scan options: {0}")]
    Config(#[from] ConfigError),

    /// The rayon pool for traversal tasks could not be created.
    #[error("failed to build walker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A named OS thread (scan driver or watcher) could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The background scan thread panicked before producing a report.
    #[error("scan thread panicked")]
    Panicked,
}
