//! Renders parsed requests back to `.http` source.
//!
//! Useful for writing reproduction files from failing suites; also the
//! round-trip half of the parser's structural tests.

use crate::request::{HttpVersion, Request};

/// Render requests as `.http` file content.
///
/// Output parses back to the same requests: block order, names, headers,
/// assertions, and the (already line-trimmed) body survive the trip.
#[must_use]
pub fn to_http_file(requests: &[Request]) -> String {
    let mut lines = Vec::new();

    for (idx, request) in requests.iter().enumerate() {
        match (&request.name, idx) {
            (Some(name), _) => lines.push(format!("### {name}")),
            (None, 0) => {}
            (None, _) => lines.push("###".to_string()),
        }

        let mut request_line = format!("{} {}", request.method, request.url);
        if request.version != HttpVersion::default() {
            request_line.push(' ');
            request_line.push_str(request.version.as_str());
        }
        lines.push(request_line);

        for header in &request.headers {
            lines.push(format!("{}: {}", header.name, header.value));
        }

        if let Some(body) = &request.body {
            lines.push(String::new());
            for body_line in body.lines() {
                lines.push(body_line.to_string());
            }
        }

        for assertion in &request.assertions {
            lines.push(format!(
                "//# {} {} {}",
                assertion.key, assertion.op, assertion.expected
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
