//! Error types for the Toggl API client.
//!
//! # Design
//! Every variant carries the request URL so a failure can be diagnosed from
//! the error alone. Variants that saw a response body keep it verbatim: the
//! service's error pages are short plain-text strings and are the only hint
//! about what went wrong.

use thiserror::Error;

/// Errors returned by `Client::get` and the resource services.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request could not be executed or its body could not be read
    /// (DNS failure, connection refused or reset, timeout).
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a zero-length body.
    #[error("GET {url} returned an empty body")]
    EmptyResponse { url: String },

    /// The body was not valid JSON for the expected shape, or a field such
    /// as a duration failed its own parsing.
    #[error("GET {url} returned an undecodable body: {message} (body was {body:?})")]
    Decode {
        url: String,
        message: String,
        body: String,
    },

    /// The status code was outside `[200, 400)`.
    #[error("GET {url} returned status {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
}

impl ApiError {
    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body attached to the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Decode { body, .. } | ApiError::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
