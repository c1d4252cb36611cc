/// Rendering of progress lines and the final report.
///
/// Pure functions only; `run` decides where the text goes.
use disktally_core::{ScanReport, Totals};

/// Format a byte count with a binary-scaled unit.
///
/// Labels use the short forms (KB, MB, ...) users expect from disk tools even
/// though the scale is 1024.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // Two decimals from GB upwards, where one decimal hides real differences.
    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One progress line: `"12,345 files  1.2 GB"`.
pub fn progress_line(totals: &Totals) -> String {
    format!(
        "{} files  {}",
        format_count(totals.files),
        format_size(totals.bytes)
    )
}

/// Final summary line, flagging unreadable directories and cancellation.
pub fn summary_line(report: &ScanReport) -> String {
    let mut line = progress_line(&report.totals);
    if report.totals.failures > 0 {
        line.push_str(&format!(
            " ({} unreadable)",
            format_count(report.totals.failures)
        ));
    }
    if report.cancelled {
        line.push_str(" [cancelled]");
    }
    line
}

/// Final report as pretty-printed JSON.
pub fn summary_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
