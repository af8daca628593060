//! Per-file orchestration: parse, execute in order, stop on first failure.

use std::path::Path;

use httpspec_core::{check, parse_file, FileReport};

use crate::report::{ErrorSink, Tally};
use crate::transport::Transport;

/// Runs one file at a time against a transport. The runner is the single
/// policy point: it classifies each file exactly once, writes the
/// human-readable lines to the sink, and records the outcome in the tally.
pub struct FileRunner<'a, T> {
    transport: &'a T,
    sink: &'a ErrorSink,
    tally: &'a Tally,
}

impl<'a, T: Transport> FileRunner<'a, T> {
    pub fn new(transport: &'a T, sink: &'a ErrorSink, tally: &'a Tally) -> Self {
        Self {
            transport,
            sink,
            tally,
        }
    }

    /// Classify one file. Parse errors and transport errors make it invalid;
    /// a request with a non-empty diagnostic makes it fail and stops the
    /// remaining requests; otherwise it passes.
    pub fn run_file(&self, path: &Path) -> FileReport {
        let report = self.classify(path);
        self.tally.record(report.outcome);
        report
    }

    fn classify(&self, path: &Path) -> FileReport {
        let label = path.display().to_string();

        let requests = match parse_file(path) {
            Ok(requests) => requests,
            Err(error) => return self.invalid(label, error.to_string()),
        };

        for request in &requests {
            let response = match self.transport.send(request) {
                Ok(response) => response,
                Err(error) => return self.invalid(label, error.to_string()),
            };

            let failures = check(&label, request, &response);
            if !failures.is_empty() {
                for failure in &failures {
                    self.sink.line(&failure.report_line());
                }
                return FileReport::fail(label, failures);
            }
        }

        FileReport::pass(label)
    }

    fn invalid(&self, label: String, error: String) -> FileReport {
        self.sink.line(&format!("[Invalid] in {label}: {error}"));
        FileReport::invalid(label, error)
    }
}
