/// Running totals and the final report produced by the aggregator.
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters accumulated by the aggregator while a scan runs.
///
/// Every field only ever grows. `failures` is kept apart from the size
/// counters so a partial run (some subtrees unreadable) can be told apart
/// from a clean one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of regular files counted.
    pub files: u64,
    /// Sum of the sizes of all counted files, in bytes.
    pub bytes: u64,
    /// Number of directories that were listed successfully.
    pub dirs: u64,
    /// Number of directories whose listing failed.
    pub failures: u64,
}

impl Totals {
    /// Count one regular file of `size` bytes.
    #[inline]
    pub fn add_file(&mut self, size: u64) {
        self.files += 1;
        self.bytes = self.bytes.saturating_add(size);
    }

    /// Count one successfully listed directory.
    #[inline]
    pub fn add_dir(&mut self) {
        self.dirs += 1;
    }

    /// Count one unreadable directory.
    #[inline]
    pub fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// `true` when no listing failed.
    pub fn is_complete(&self) -> bool {
        self.failures == 0
    }
}

/// Final outcome of a scan, emitted exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub totals: Totals,
    /// `true` if the scan was cancelled; totals are then partial.
    pub cancelled: bool,
    /// Wall-clock time from the first spawned task to the final report.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub finished_at: DateTime<Local>,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u128::from(u64::MAX)) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
