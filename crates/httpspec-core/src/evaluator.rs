//! Assertion evaluation: projections of a response checked against the
//! expected literals, producing structured failures instead of panics.

use regex::Regex;

use crate::assertion::{AssertOp, Assertion};
use crate::diagnostic::{Failure, FailureReason};
use crate::request::Request;
use crate::response::Response;

/// Longest `actual` rendered into a failure record before truncation.
const MAX_ACTUAL_DISPLAY: usize = 200;

/// Evaluate every assertion of `request` against `response`.
///
/// Returns the request's diagnostic: one failure per assertion that did not
/// hold, in source order. Structural problems (bad key shape, unparseable
/// expected status) are failures too, never errors.
#[must_use]
pub fn check(path: &str, request: &Request, response: &Response) -> Vec<Failure> {
    request
        .assertions
        .iter()
        .enumerate()
        .filter_map(|(index, assertion)| {
            check_one(assertion, response).map(|(reason, actual)| Failure {
                assertion: assertion.clone(),
                path: path.to_string(),
                request_name: request.name.clone(),
                assertion_index: index,
                reason,
                expected: assertion.expected.clone(),
                actual,
            })
        })
        .collect()
}

/// `None` when the assertion holds, otherwise the reason and observed value.
fn check_one(assertion: &Assertion, response: &Response) -> Option<(FailureReason, String)> {
    match Projection::classify(&assertion.key) {
        Projection::Status => check_status(assertion, response),
        Projection::Body => check_body(assertion, response),
        Projection::Header(name) => check_header(assertion, response.header(&name)),
        Projection::Invalid => Some((FailureReason::InvalidAssertionKey, String::new())),
    }
}

/// What part of the response an assertion key selects.
enum Projection {
    Status,
    Body,
    /// Lowercased header name extracted from `header["..."]`.
    Header(String),
    Invalid,
}

impl Projection {
    fn classify(key: &str) -> Self {
        if key.eq_ignore_ascii_case("status") {
            return Self::Status;
        }
        if key.eq_ignore_ascii_case("body") {
            return Self::Body;
        }
        let prefixed = key
            .get(.."header[".len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("header["));
        if prefixed {
            // Header name: everything between the first and last double quote.
            if let (Some(open), Some(close)) = (key.find('"'), key.rfind('"')) {
                if open < close {
                    return Self::Header(key[open + 1..close].to_ascii_lowercase());
                }
            }
        }
        Self::Invalid
    }
}

fn check_status(assertion: &Assertion, response: &Response) -> Option<(FailureReason, String)> {
    let Some(code) = response.status else {
        return Some((FailureReason::StatusMismatch, "none".to_string()));
    };
    let actual = code.to_string();

    match assertion.op {
        AssertOp::Equal | AssertOp::NotEqual => {
            let Ok(expected) = assertion.expected.parse::<u16>() else {
                return Some((FailureReason::StatusFormatError, actual));
            };
            let holds = (expected == code) != assertion.op.is_negated();
            (!holds).then_some((FailureReason::StatusMismatch, actual))
        }
        _ => contains_family(assertion.op, &assertion.expected, actual.as_bytes()),
    }
}

fn check_body(assertion: &Assertion, response: &Response) -> Option<(FailureReason, String)> {
    let body = response.body.as_slice();
    match assertion.op {
        AssertOp::Equal | AssertOp::NotEqual => {
            let holds = (body == assertion.expected.as_bytes()) != assertion.op.is_negated();
            (!holds).then(|| (FailureReason::BodyMismatch, display_bytes(body)))
        }
        _ => contains_family(assertion.op, &assertion.expected, body),
    }
}

fn check_header(
    assertion: &Assertion,
    value: Option<&str>,
) -> Option<(FailureReason, String)> {
    let Some(value) = value else {
        // Missing header: negated operators hold vacuously, `equal` reports
        // the dedicated reason, every positive match fails.
        return match assertion.op {
            AssertOp::NotEqual | AssertOp::NotContains | AssertOp::NotMatchesRegex => None,
            AssertOp::Equal => Some((FailureReason::HeaderMissing, String::new())),
            _ => Some((FailureReason::ContainsFailed, String::new())),
        };
    };

    match assertion.op {
        AssertOp::Equal | AssertOp::NotEqual => {
            let holds =
                value.eq_ignore_ascii_case(&assertion.expected) != assertion.op.is_negated();
            (!holds).then(|| (FailureReason::HeaderMismatch, value.to_string()))
        }
        _ => contains_family(assertion.op, &assertion.expected, value.as_bytes()),
    }
}

/// Shared semantics for the contains / prefix / suffix / regex operators on
/// any projection, byte-exact and case-sensitive. Regex matching runs on a
/// lossy UTF-8 view; a pattern that does not compile counts as a non-match.
fn contains_family(
    op: AssertOp,
    expected: &str,
    actual: &[u8],
) -> Option<(FailureReason, String)> {
    let matched = match op {
        AssertOp::Contains | AssertOp::NotContains => {
            bytes_contain(actual, expected.as_bytes())
        }
        AssertOp::StartsWith => actual.starts_with(expected.as_bytes()),
        AssertOp::EndsWith => actual.ends_with(expected.as_bytes()),
        AssertOp::MatchesRegex | AssertOp::NotMatchesRegex => Regex::new(expected)
            .map(|re| re.is_match(&String::from_utf8_lossy(actual)))
            .unwrap_or(false),
        AssertOp::Equal | AssertOp::NotEqual => unreachable!("handled per projection"),
    };

    if matched != op.is_negated() {
        return None;
    }
    let reason = if op.is_negated() {
        FailureReason::NotContainsFailed
    } else {
        FailureReason::ContainsFailed
    };
    Some((reason, display_bytes(actual)))
}

fn bytes_contain(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Lossy, length-capped rendering of a projected value for reports.
fn display_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= MAX_ACTUAL_DISPLAY {
        return text.into_owned();
    }
    let mut end = MAX_ACTUAL_DISPLAY;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…({} bytes total)", &text[..end], bytes.len())
}
