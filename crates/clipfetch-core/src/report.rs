//! User-visible per-job lines: one per terminal event, plain text.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::job::JobReport;

/// Sink for the one line each job prints when it finishes.
///
/// Workers call this concurrently; implementations must keep lines whole.
pub trait Reporter: Send + Sync {
    fn report(&self, report: &JobReport);
}

/// Prints to stdout. Each line is written under the stdout lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, report: &JobReport) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", report.line()) {
            tracing::warn!("could not write report line: {}", e);
        }
    }
}

/// Keeps lines in memory, in the order workers reported them.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines that mention `url`.
    pub fn lines_for(&self, url: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(url))
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, report: &JobReport) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.line());
    }
}
