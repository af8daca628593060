//! Fixed-size worker pool scheduling one file per work item.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use httpspec_core::FileReport;

use crate::report::{ErrorSink, Tally};
use crate::runner::FileRunner;
use crate::transport::Transport;

/// Run every file through the pool and return all reports after the workers
/// have joined.
///
/// One worker is spawned per transport, so the caller chooses the
/// parallelism by how many transports it builds (at least one). Workers pull
/// paths from a shared cursor; files are unordered relative to each other
/// while requests within a file stay strictly sequential.
pub fn run_pool<T: Transport + Send>(
    paths: &[PathBuf],
    transports: Vec<T>,
    sink: &ErrorSink,
    tally: &Tally,
) -> Vec<FileReport> {
    let cursor = AtomicUsize::new(0);
    let reports = Mutex::new(Vec::with_capacity(paths.len()));

    std::thread::scope(|scope| {
        let cursor = &cursor;
        let reports = &reports;
        for transport in transports {
            scope.spawn(move || {
                let runner = FileRunner::new(&transport, sink, tally);
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = paths.get(index) else {
                        break;
                    };
                    let report = runner.run_file(path);
                    reports
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(report);
                }
            });
        }
    });

    reports.into_inner().unwrap_or_else(PoisonError::into_inner)
}
