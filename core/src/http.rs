//! HTTP transport types and the blocking `ureq` transport.
//!
//! # Design
//! Requests and fully-read responses are plain data, so the client's parse
//! step stays deterministic and testable without a network. Executing a
//! request is behind the `Transport` trait: it returns a `ResponseStream`
//! whose body the client reads once and then drops. Dropping the stream is
//! what releases the connection back to the pool.

use std::io::Read;
use std::time::Duration;

use crate::error::ApiError;

/// An authenticated GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Upper bound for the whole round trip. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// A response whose body has been read to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// A response as returned by a `Transport`, body not yet read.
pub struct ResponseStream<R> {
    pub status: u16,
    pub body: R,
}

/// Executes `HttpRequest`s. Implementations must be shareable across threads.
pub trait Transport: Send + Sync {
    type Body: Read;

    /// Send `request`. Non-2xx statuses are data, not errors; only failures
    /// to obtain a response at all map to `ApiError::Transport`.
    fn execute(&self, request: &HttpRequest) -> Result<ResponseStream<Self::Body>, ApiError>;
}

/// Default transport backed by a pooled `ureq::Agent`.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    type Body = ureq::BodyReader<'static>;

    fn execute(&self, request: &HttpRequest) -> Result<ResponseStream<Self::Body>, ApiError> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.config().timeout_global(Some(timeout)).build();
        }

        let response = builder.call().map_err(|e| ApiError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        Ok(ResponseStream {
            status: response.status().as_u16(),
            body: response.into_body().into_reader(),
        })
    }
}
