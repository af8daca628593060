//! Assertion triples and the operator set of the `//#` DSL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison operator of an assertion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssertOp {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    MatchesRegex,
    NotMatchesRegex,
}

impl AssertOp {
    /// Parse an operator token. ASCII case-insensitive; `==` and `!=` are
    /// accepted as aliases for the word forms.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "==" | "equal" => Some(Self::Equal),
            "!=" | "not_equal" => Some(Self::NotEqual),
            "contains" => Some(Self::Contains),
            "not_contains" => Some(Self::NotContains),
            "starts_with" => Some(Self::StartsWith),
            "ends_with" => Some(Self::EndsWith),
            "matches_regex" => Some(Self::MatchesRegex),
            "not_matches_regex" => Some(Self::NotMatchesRegex),
            _ => None,
        }
    }

    /// Word form of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::MatchesRegex => "matches_regex",
            Self::NotMatchesRegex => "not_matches_regex",
        }
    }

    /// Operators whose pass condition is the negation of a positive match.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(self, Self::NotEqual | Self::NotContains | Self::NotMatchesRegex)
    }
}

impl std::fmt::Display for AssertOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `//#` line: a response projection key, an operator, and the expected
/// literal. All three fields are non-empty after parsing; `expected` is the
/// remainder of the line and may contain spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Assertion {
    pub key: String,
    pub op: AssertOp,
    pub expected: String,
}

impl Assertion {
    #[must_use]
    pub fn new(key: impl Into<String>, op: AssertOp, expected: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op,
            expected: expected.into(),
        }
    }
}
