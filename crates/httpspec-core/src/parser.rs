//! Line-oriented parser for `.http` request files.
//!
//! A file is a sequence of `###`-separated blocks. Each block holds one
//! request line, headers until the first blank line, body lines until the
//! next separator, and any number of `//#` assertion lines. Parsing is a
//! single pass over trimmed lines with a three-state machine per block.

use std::path::Path;

use thiserror::Error;

use crate::assertion::{AssertOp, Assertion};
use crate::request::{Header, HttpVersion, Method, Request};

/// Errors that reject the whole file as invalid.
///
/// An unrecognized verb token is not a parse error; it parses into
/// [`Method::Unrecognized`] and is refused by the transport at execution.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: request line has no URL: '{text}'")]
    MissingUrl { line: usize, text: String },
    #[error("line {line}: header has no ':' separator: '{text}'")]
    BadHeader { line: usize, text: String },
    #[error("line {line}: malformed assertion: '{text}'")]
    BadAssertion { line: usize, text: String },
    #[error("line {line}: unknown protocol version '{version}'")]
    BadVersion { line: usize, version: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read and parse one file. I/O errors surface unchanged.
pub fn parse_file(path: &Path) -> Result<Vec<Request>, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_content(&text)
}

/// Parse file text into request blocks in source order.
pub fn parse_content(text: &str) -> Result<Vec<Request>, ParseError> {
    let mut parser = Parser::default();
    for (idx, raw) in text.split('\n').enumerate() {
        parser.line(idx + 1, raw.trim())?;
    }
    Ok(parser.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BlockState {
    /// Before the request line of the current block.
    #[default]
    Preamble,
    Headers,
    Body,
}

/// Accumulates one block between separators.
#[derive(Debug, Default)]
struct BlockBuilder {
    method: Option<Method>,
    url: String,
    version: HttpVersion,
    headers: Vec<Header>,
    assertions: Vec<Assertion>,
    name: Option<String>,
    body: String,
}

impl BlockBuilder {
    fn with_name(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// A block only materializes if its request line was parsed; anything
    /// else (stray comments, an unnamed empty section) is dropped silently.
    fn build(self) -> Option<Request> {
        let method = self.method?;
        Some(Request {
            method,
            url: self.url,
            version: self.version,
            headers: self.headers,
            body: if self.body.is_empty() {
                None
            } else {
                Some(self.body)
            },
            assertions: self.assertions,
            name: self.name,
        })
    }
}

#[derive(Debug, Default)]
struct Parser {
    state: BlockState,
    block: BlockBuilder,
    requests: Vec<Request>,
}

impl Parser {
    fn line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if let Some(rest) = line.strip_prefix("###") {
            self.separator(rest);
            return Ok(());
        }
        if let Some(rest) = line.strip_prefix("//#") {
            return self.assertion(line_no, rest);
        }
        if line.starts_with('#') || line.starts_with("//") {
            return Ok(());
        }
        if line.is_empty() {
            if self.state == BlockState::Headers {
                self.state = BlockState::Body;
            }
            return Ok(());
        }

        match self.state {
            BlockState::Preamble => self.request_line(line_no, line),
            BlockState::Headers => self.header_line(line_no, line),
            BlockState::Body => {
                self.block.body.push_str(line);
                self.block.body.push('\n');
                Ok(())
            }
        }
    }

    /// `###` closes the current block; its trailing text names the next one.
    fn separator(&mut self, rest: &str) {
        let name = rest.trim();
        let name = (!name.is_empty()).then(|| name.to_string());
        let closed = std::mem::replace(&mut self.block, BlockBuilder::with_name(name));
        self.requests.extend(closed.build());
        self.state = BlockState::Preamble;
    }

    fn request_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().unwrap_or_default();
        let url = tokens.next().ok_or_else(|| ParseError::MissingUrl {
            line: line_no,
            text: line.to_string(),
        })?;
        let version = match tokens.next() {
            Some(token) => {
                HttpVersion::parse(token).ok_or_else(|| ParseError::BadVersion {
                    line: line_no,
                    version: token.to_string(),
                })?
            }
            None => HttpVersion::default(),
        };

        self.block.method = Some(Method::parse(verb));
        self.block.url = url.to_string();
        self.block.version = version;
        self.state = BlockState::Headers;
        Ok(())
    }

    fn header_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let (name, value) = line.split_once(':').ok_or_else(|| ParseError::BadHeader {
            line: line_no,
            text: line.to_string(),
        })?;
        self.block.headers.push(Header {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        });
        Ok(())
    }

    /// `//# key op value`. The value is the remainder of the line, so it may
    /// contain spaces. Assertions attach wherever the block currently is,
    /// but a file that asserts before any request line is malformed.
    fn assertion(&mut self, line_no: usize, rest: &str) -> Result<(), ParseError> {
        let bad = || ParseError::BadAssertion {
            line: line_no,
            text: rest.trim().to_string(),
        };

        if self.block.method.is_none() {
            return Err(bad());
        }

        let (key, op, expected) = split_assertion(rest).ok_or_else(bad)?;
        let op = AssertOp::parse(op).ok_or_else(bad)?;
        self.block.assertions.push(Assertion::new(key, op, expected));
        Ok(())
    }

    fn finish(mut self) -> Vec<Request> {
        self.requests.extend(self.block.build());
        self.requests
    }
}

/// Split into key, operator token, and the rest of the line as the expected
/// literal. `None` unless all three parts are non-empty.
fn split_assertion(rest: &str) -> Option<(&str, &str, &str)> {
    let rest = rest.trim();
    let (key, tail) = rest.split_once(char::is_whitespace)?;
    let tail = tail.trim_start();
    let (op, value) = tail.split_once(char::is_whitespace)?;
    let value = value.trim_start();
    if key.is_empty() || op.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, op, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Request> {
        parse_content(text).expect("input should parse")
    }

    #[test]
    fn single_request_minimal() {
        let requests = parse("GET http://localhost:8080/health\n");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, "http://localhost:8080/health");
        assert_eq!(requests[0].version, HttpVersion::Http11);
        assert!(requests[0].headers.is_empty());
        assert!(requests[0].body.is_none());
        assert!(requests[0].name.is_none());
    }

    #[test]
    fn explicit_version_token() {
        let requests = parse("GET http://a HTTP/2\n");
        assert_eq!(requests[0].version, HttpVersion::Http2);
    }

    #[test]
    fn unknown_version_rejects_file() {
        let err = parse_content("GET http://a HTTP/9\n").unwrap_err();
        assert!(matches!(err, ParseError::BadVersion { version, .. } if version == "HTTP/9"));
    }

    #[test]
    fn request_line_without_url_rejects_file() {
        let err = parse_content("GET\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingUrl { line: 1, .. }));
    }

    #[test]
    fn unrecognized_verb_is_kept_not_rejected() {
        let requests = parse("FETCH http://a\n");
        assert_eq!(
            requests[0].method,
            Method::Unrecognized("FETCH".to_string())
        );
    }

    #[test]
    fn headers_keep_order_and_duplicates() {
        let requests = parse(
            "GET http://a\n\
             Accept: text/plain\n\
             X-Tag: one\n\
             X-Tag: two\n",
        );
        let headers = &requests[0].headers;
        assert_eq!(headers.len(), 3);
        assert_eq!((headers[1].name.as_str(), headers[1].value.as_str()), ("X-Tag", "one"));
        assert_eq!((headers[2].name.as_str(), headers[2].value.as_str()), ("X-Tag", "two"));
    }

    #[test]
    fn header_value_keeps_inner_colons() {
        let requests = parse("GET http://a\nReferer: http://b:8080/x\n");
        assert_eq!(requests[0].header("Referer"), Some("http://b:8080/x"));
    }

    #[test]
    fn header_without_colon_rejects_file() {
        let err = parse_content("GET http://a\nNoColonHere\n").unwrap_err();
        assert!(matches!(err, ParseError::BadHeader { line: 2, .. }));
    }

    #[test]
    fn blank_line_switches_headers_to_body() {
        let requests = parse(
            "POST http://a\n\
             Content-Type: application/json\n\
             \n\
             {\"name\": \"test\"}\n",
        );
        assert_eq!(requests[0].headers.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some("{\"name\": \"test\"}\n"));
    }

    #[test]
    fn body_lines_are_trimmed_and_joined_with_newline() {
        let requests = parse(
            "POST http://a\n\
             \n\
             \x20 line one  \n\
             line two\n",
        );
        assert_eq!(requests[0].body.as_deref(), Some("line one\nline two\n"));
    }

    #[test]
    fn blank_lines_inside_body_are_ignored() {
        let requests = parse("POST http://a\n\nfirst\n\nsecond\n");
        assert_eq!(requests[0].body.as_deref(), Some("first\nsecond\n"));
    }

    #[test]
    fn separator_name_attaches_to_next_block() {
        let requests = parse(
            "GET http://a\n\
             ### second\n\
             GET http://b\n",
        );
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].name, None);
        assert_eq!(requests[1].name.as_deref(), Some("second"));
    }

    #[test]
    fn leading_separator_names_first_block() {
        let requests = parse("### first\nGET http://a\n");
        assert_eq!(requests[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn separator_name_is_trimmed() {
        let requests = parse("###   spaced out  \nGET http://a\n");
        assert_eq!(requests[0].name.as_deref(), Some("spaced out"));
    }

    #[test]
    fn bare_separator_leaves_block_unnamed() {
        let requests = parse("GET http://a\n###\nGET http://b\n");
        assert_eq!(requests[1].name, None);
    }

    #[test]
    fn block_without_request_line_is_dropped() {
        let requests = parse("### only a name\n# nothing else\n###\nGET http://b\n");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://b");
    }

    #[test]
    fn comments_are_ignored() {
        let requests = parse(
            "# file comment\n\
             // another comment\n\
             GET http://a\n\
             # between header lines\n\
             Accept: */*\n",
        );
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers.len(), 1);
    }

    #[test]
    fn assertions_attach_in_source_order() {
        let requests = parse(
            "GET http://a\n\
             //# status == 200\n\
             //# body contains pong\n\
             //# header[\"content-type\"] starts_with text/\n",
        );
        let assertions = &requests[0].assertions;
        assert_eq!(assertions.len(), 3);
        assert_eq!(assertions[0].op, AssertOp::Equal);
        assert_eq!(assertions[1].op, AssertOp::Contains);
        assert_eq!(assertions[2].key, "header[\"content-type\"]");
    }

    #[test]
    fn assertion_value_may_contain_spaces() {
        let requests = parse("GET http://a\n//# body == hello world\n");
        assert_eq!(requests[0].assertions[0].expected, "hello world");
    }

    #[test]
    fn assertion_after_body_still_attaches() {
        let requests = parse("POST http://a\n\npayload\n//# status == 200\n");
        assert_eq!(requests[0].assertions.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some("payload\n"));
    }

    #[test]
    fn assertion_before_any_request_rejects_file() {
        let err = parse_content("//# status == 200\nGET http://a\n").unwrap_err();
        assert!(matches!(err, ParseError::BadAssertion { line: 1, .. }));
    }

    #[test]
    fn assertion_with_two_tokens_rejects_file() {
        let err = parse_content("GET http://a\n//# status ==\n").unwrap_err();
        assert!(matches!(err, ParseError::BadAssertion { line: 2, .. }));
    }

    #[test]
    fn assertion_with_unknown_operator_rejects_file() {
        let err = parse_content("GET http://a\n//# status equals 200\n").unwrap_err();
        assert!(matches!(err, ParseError::BadAssertion { .. }));
    }

    #[test]
    fn blocks_come_out_in_file_order() {
        let requests = parse(
            "GET http://one\n\
             ###\n\
             GET http://two\n\
             ###\n\
             GET http://three\n",
        );
        let urls: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["http://one", "http://two", "http://three"]);
    }

    #[test]
    fn url_is_kept_byte_exact() {
        let url = "http://localhost:9999/path?q=a%20b&x=1";
        let requests = parse(&format!("GET {url}\n"));
        assert_eq!(requests[0].url, url);
    }

    #[test]
    fn crlf_input_parses_because_lines_are_trimmed() {
        let requests = parse("GET http://a\r\nAccept: */*\r\n");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("Accept"), Some("*/*"));
    }

    #[test]
    fn parse_file_surfaces_io_error() {
        let err = parse_file(Path::new("no/such/file.http")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
