//! Normalized HTTP responses as seen by the assertion evaluator.

use std::collections::HashMap;

/// A response after transport normalization.
///
/// Header names are stored lowercased with one value per name (the last
/// duplicate received wins). The body is fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Absent only when the transport could not produce a status line.
    pub status: Option<u16>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status: Some(status),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Insert a header, lowercasing the name. Last duplicate wins.
    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Look up a header value; the name is lowercased before the lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_are_lowercased_on_insert() {
        let response = Response::new(200).with_header("X-Trace", "abc");
        assert_eq!(response.headers.get("x-trace").map(String::as_str), Some("abc"));
        assert!(!response.headers.contains_key("X-Trace"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = Response::new(200).with_header("Content-Type", "text/plain");
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(response.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn duplicate_header_last_wins() {
        let mut response = Response::new(200);
        response.insert_header("Set-Cookie", "a=1");
        response.insert_header("set-cookie", "b=2");
        assert_eq!(response.header("set-cookie"), Some("b=2"));
        assert_eq!(response.headers.len(), 1);
    }
}
