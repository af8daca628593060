//! HTTP transport adapter: parsed requests out, normalized responses in.

use std::time::Duration;

use thiserror::Error;

use httpspec_core::{Method, Request, Response};

/// Default per-request timeout when neither flag nor config set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Execution-level failures. Both classify the whole file as invalid.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request block's verb token was not a standard method.
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),
    /// DNS, connect, TLS, read, or timeout failure.
    #[error("{url}: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The HTTP client itself could not be constructed.
    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// The seam between the runner and the network. HTTP error statuses are
/// normal responses here; only transport-level problems are `Err`.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

/// Real transport over a blocking reqwest client. Each worker owns one.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let method = match &request.method {
            Method::Unrecognized(token) => {
                return Err(TransportError::UnsupportedMethod(token.clone()));
            }
            known => reqwest::Method::from_bytes(known.as_str().as_bytes())
                .map_err(|_| TransportError::UnsupportedMethod(known.as_str().to_string()))?,
        };

        let send_err = |source| TransportError::Send {
            url: request.url.clone(),
            source,
        };

        // The transport request is built from method, url, headers, and body;
        // the parsed protocol version is metadata and not forced on the wire.
        let mut builder = self.client.request(method, &request.url);
        for header in &request.headers {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let reply = builder.send().map_err(send_err)?;

        let mut response = Response::new(reply.status().as_u16());
        for (name, value) in reply.headers() {
            // Last duplicate wins in the normalized map.
            response.insert_header(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        response.body = reply.bytes().map_err(send_err)?.to_vec();
        Ok(response)
    }
}
