//! httpspec-runner: test execution engine
//!
//! Drives parsed `.http` suites over a real (or test-scripted) transport:
//! per-file sequential execution with first-failure stop, a bounded worker
//! pool across files, and the shared tally/sink the reporter reads from.

pub mod discover;
pub mod pool;
pub mod report;
pub mod runner;
pub mod transport;

pub use discover::{discover, is_suite_file};
pub use pool::run_pool;
pub use report::{render_summary, ErrorSink, Tally};
pub use runner::FileRunner;
pub use transport::{HttpTransport, Transport, TransportError, DEFAULT_TIMEOUT};
