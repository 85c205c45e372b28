//! Per-run replay summary.
//!
//! [`ReplayReport`] is what [`crate::replay::Replayer::run`] returns: the book's
//! counters plus what was written, serializable to JSON for run logs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lob::BookStats;

/// Summary of one replay run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Book counters at end of input
    pub book: BookStats,

    /// Snapshot rows written (header excluded)
    pub rows_written: u64,

    /// ts_event of the first applied event
    pub first_ts_event: Option<i64>,

    /// ts_event of the last applied event
    pub last_ts_event: Option<i64>,

    /// Wall-clock duration of the run in seconds
    pub elapsed_secs: f64,
}

impl ReplayReport {
    /// Events applied per wall-clock second.
    pub fn throughput(&self) -> Option<f64> {
        (self.elapsed_secs > 0.0).then(|| self.book.events_processed as f64 / self.elapsed_secs)
    }

    /// Rows expected for the events seen: every event except fills.
    pub fn expected_rows(&self) -> u64 {
        self.book.events_processed - self.book.fills_suppressed
    }

    /// Save to JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_rows_excludes_fills() {
        let report = ReplayReport {
            book: BookStats {
                events_processed: 10,
                fills_suppressed: 3,
                ..Default::default()
            },
            rows_written: 7,
            ..Default::default()
        };
        assert_eq!(report.expected_rows(), report.rows_written);
    }

    #[test]
    fn test_throughput() {
        let mut report = ReplayReport::default();
        assert!(report.throughput().is_none());

        report.book.events_processed = 500;
        report.elapsed_secs = 0.5;
        assert_eq!(report.throughput(), Some(1000.0));
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = ReplayReport {
            rows_written: 4,
            first_ts_event: Some(1),
            last_ts_event: Some(9),
            ..Default::default()
        };
        report.save_json(&path).unwrap();

        let loaded = ReplayReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
    }
}
