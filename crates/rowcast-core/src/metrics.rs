//! Metrics and reporting for encode operations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Encode counters (thread-safe, cheap to clone; clones share counters).
#[derive(Debug, Clone, Default)]
pub struct EncodeMetrics {
    /// Records projected into a row
    pub records_encoded: Arc<AtomicU64>,
    /// Header rows written
    pub headers_written: Arc<AtomicU64>,
    /// Empty cells in encoded rows, whether from absent values or empty text
    pub empty_cells: Arc<AtomicU64>,
    /// Operations aborted by an error
    pub failures: Arc<AtomicU64>,
}

impl EncodeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one projected row and how many of its cells are empty strings.
    pub fn record_row(&self, row: &[String]) {
        self.records_encoded.fetch_add(1, Ordering::Relaxed);
        let empty = row.iter().filter(|cell| cell.is_empty()).count() as u64;
        if empty > 0 {
            self.empty_cells.fetch_add(empty, Ordering::Relaxed);
        }
    }

    pub fn record_header(&self) {
        self.headers_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_encoded: self.records_encoded.load(Ordering::Relaxed),
            headers_written: self.headers_written.load(Ordering::Relaxed),
            empty_cells: self.empty_cells.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.records_encoded.store(0, Ordering::Relaxed);
        self.headers_written.store(0, Ordering::Relaxed);
        self.empty_cells.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of metrics (for reporting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub records_encoded: u64,
    pub headers_written: u64,
    pub empty_cells: u64,
    pub failures: u64,
}

impl MetricsSnapshot {
    /// Format a human-readable report.
    pub fn format_report(&self) -> String {
        let mut lines = Vec::new();
        lines.push("Encode Metrics Report".to_string());
        lines.push("=".repeat(40));
        lines.push(format!("  Records encoded: {}", self.records_encoded));
        lines.push(format!("  Headers written: {}", self.headers_written));
        lines.push(format!("  Empty cells:     {}", self.empty_cells));
        lines.push(format!("  Failures:        {}", self.failures));
        lines.join("\n")
    }
}
