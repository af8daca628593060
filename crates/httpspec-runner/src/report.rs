//! Shared run state: the tally counters, the error sink, and the summary.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use httpspec_core::{Counts, Outcome};

/// Process-wide counters, guarded by one mutex. Workers increment while the
/// pool runs; the reporter reads a snapshot after all workers have joined.
#[derive(Debug, Default)]
pub struct Tally {
    counts: Mutex<Counts>,
}

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_total(&self) {
        self.lock().total += 1;
    }

    pub fn inc_pass(&self) {
        self.lock().pass += 1;
    }

    pub fn inc_fail(&self) {
        self.lock().fail += 1;
    }

    pub fn inc_invalid(&self) {
        self.lock().invalid += 1;
    }

    /// One file finished: bump `total` and the outcome's counter.
    pub fn record(&self, outcome: Outcome) {
        self.inc_total();
        match outcome {
            Outcome::Pass => self.inc_pass(),
            Outcome::Fail => self.inc_fail(),
            Outcome::Invalid => self.inc_invalid(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Counts {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Line-oriented failure report writer shared across workers.
///
/// Each line goes out in a single locked write so reports from different
/// files may interleave but never tear.
pub struct ErrorSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ErrorSink {
    #[must_use]
    pub fn stderr() -> Self {
        Self::from_writer(Box::new(std::io::stderr()))
    }

    /// Swallows everything; used when reports are emitted as JSON instead.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_writer(Box::new(std::io::sink()))
    }

    #[must_use]
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write one report line. Sink failures are not recoverable mid-run and
    /// are ignored, matching stderr semantics.
    pub fn line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.write_all(format!("{line}\n").as_bytes());
        let _ = writer.flush();
    }
}

/// The fixed end-of-run summary block.
#[must_use]
pub fn render_summary(counts: &Counts) -> String {
    format!(
        "All {} tests ran successfully!\n\nPass: {}\nFail: {}\nInvalid: {}\n",
        counts.total, counts.pass, counts.fail, counts.invalid
    )
}
