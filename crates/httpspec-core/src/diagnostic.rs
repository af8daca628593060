//! Structured assertion failures and their report rendering.
//!
//! The evaluator never throws for a mismatch; every failed assertion becomes
//! one `Failure` record, and the per-request list of them is the diagnostic
//! the runner acts on.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assertion::Assertion;

/// Why an assertion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Status did not match, or the response carried no status at all.
    StatusMismatch,
    /// Header present with a different value.
    HeaderMismatch,
    /// Header absent where `equal` required it.
    HeaderMissing,
    /// Body not byte-equal.
    BodyMismatch,
    /// A positive contains/prefix/suffix/regex check did not hold.
    ContainsFailed,
    /// A negated contains/regex check did not hold.
    NotContainsFailed,
    /// The assertion key is not `status`, `body`, or `header["..."]`.
    InvalidAssertionKey,
    /// The expected literal could not be parsed as a status code.
    StatusFormatError,
}

impl FailureReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusMismatch => "status_mismatch",
            Self::HeaderMismatch => "header_mismatch",
            Self::HeaderMissing => "header_missing",
            Self::BodyMismatch => "body_mismatch",
            Self::ContainsFailed => "contains_failed",
            Self::NotContainsFailed => "not_contains_failed",
            Self::InvalidAssertionKey => "invalid_assertion_key",
            Self::StatusFormatError => "status_format_error",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed assertion, with everything needed to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Failure {
    /// The assertion as written in the source file.
    pub assertion: Assertion,
    /// Source file the assertion came from.
    pub path: String,
    /// Name of the request block, if it had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_name: Option<String>,
    /// 0-based position within the request's assertion list.
    pub assertion_index: usize,
    pub reason: FailureReason,
    /// Expected value as written.
    pub expected: String,
    /// Concrete value observed in the response.
    pub actual: String,
}

impl Failure {
    /// The single human-readable line written to the error sink.
    #[must_use]
    pub fn report_line(&self) -> String {
        let at = format!("[Fail] in {}:{}", self.path, self.assertion_index + 1);
        match self.reason {
            FailureReason::StatusMismatch => {
                format!("{at} Expected status {}, got {}", self.expected, self.actual)
            }
            FailureReason::StatusFormatError => {
                format!("{at} Invalid expected status '{}'", self.expected)
            }
            FailureReason::HeaderMissing => format!(
                "{at} Expected {} {} '{}', header missing",
                self.assertion.key, self.assertion.op, self.expected
            ),
            FailureReason::InvalidAssertionKey => {
                format!("{at} Invalid assertion key '{}'", self.assertion.key)
            }
            FailureReason::BodyMismatch => format!(
                "{at} Expected body {} '{}', got '{}'",
                self.assertion.op, self.expected, self.actual
            ),
            FailureReason::HeaderMismatch
            | FailureReason::ContainsFailed
            | FailureReason::NotContainsFailed => format!(
                "{at} Expected {} {} '{}', got '{}'",
                self.assertion.key, self.assertion.op, self.expected, self.actual
            ),
        }
    }
}
