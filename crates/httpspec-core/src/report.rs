//! Run-level report types: per-file outcomes and the aggregate counts.
//!
//! These are the machine-readable surface of a run (`--output json`); the
//! JSON Schema of [`RunReport`] is exported for downstream consumers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Failure;

/// Per-file verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every request ran and every assertion held.
    Pass,
    /// At least one assertion failed.
    Fail,
    /// The file could not be parsed or a request could not be executed.
    Invalid,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Aggregate counters. Each file contributes to `total` and exactly one of
/// the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Counts {
    pub total: u64,
    pub pass: u64,
    pub fail: u64,
    pub invalid: u64,
}

impl Counts {
    /// The run as a whole succeeded: nothing failed, nothing was invalid.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.fail == 0 && self.invalid == 0
    }
}

/// Everything recorded about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileReport {
    pub path: String,
    pub outcome: Outcome,
    /// Assertion failures of the request that stopped the file, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
    /// Parse or transport error that made the file invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    #[must_use]
    pub fn pass(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: Outcome::Pass,
            failures: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn fail(path: impl Into<String>, failures: Vec<Failure>) -> Self {
        Self {
            path: path.into(),
            outcome: Outcome::Fail,
            failures,
            error: None,
        }
    }

    #[must_use]
    pub fn invalid(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: Outcome::Invalid,
            failures: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Complete result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    pub counts: Counts,
    pub files: Vec<FileReport>,
}

/// Generate the JSON Schema for [`RunReport`].
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(RunReport);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
