//! Authenticated GET against the Toggl v8 API.
//!
//! # Design
//! `Client` owns the API key, the configuration and a `Transport`. A call
//! is split into `build_get` (produces an `HttpRequest`), the transport
//! round trip, and `parse` (consumes an `HttpResponse`), so the request and
//! parse halves can be tested without a network. The resource services in
//! `services` borrow the client and only compose paths.
//!
//! `parse` checks the status before decoding: an error page is not expected
//! to match the success schema, so a decode error there would hide the real
//! failure.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::services::{Me, Projects, TimeEntries};

/// Root of the main API. Paths passed to `Client::get` are relative to it.
pub const TOGGL_API: &str = "https://www.toggl.com/api/v8/";
/// Root of the reports API. No operation uses it yet.
pub const REPORTS_API: &str = "https://toggl.com/reports/api/v2/";
pub const USER_AGENT: &str = concat!("toggl-core/", env!("CARGO_PKG_VERSION"));

/// Password half of the basic-auth pair when authenticating by API token.
const TOKEN_PASSWORD: &str = "api_token";

/// Client settings. Deserializable so an embedding application can load it
/// from its own configuration source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: TOGGL_API.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Client for the Toggl API, generic over how requests are executed.
///
/// Construction does no I/O. The default `UreqTransport` pools connections
/// and can be shared across threads.
pub struct Client<T: Transport = UreqTransport> {
    api_key: String,
    base_url: String,
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client<UreqTransport> {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Self {
        Self::with_transport(api_key, config, UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(api_key: impl Into<String>, config: ClientConfig, transport: T) -> Self {
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            api_key: api_key.into(),
            base_url,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn time_entries(&self) -> TimeEntries<'_, T> {
        TimeEntries::new(self)
    }

    pub fn me(&self) -> Me<'_, T> {
        Me::new(self)
    }

    pub fn projects(&self) -> Projects<'_, T> {
        Projects::new(self)
    }

    /// Build the request for `path`, relative to the API root. `path` may
    /// carry a query string. A leading `/` is a caller mistake: it is logged
    /// and dropped.
    pub fn build_get(&self, path: &str) -> HttpRequest {
        let path = match path.strip_prefix('/') {
            Some(stripped) => {
                warn!(path, "do not include / at the start of an API path");
                stripped
            }
            None => path,
        };
        let credentials = STANDARD.encode(format!("{}:{TOKEN_PASSWORD}", self.api_key));
        HttpRequest {
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("authorization".to_string(), format!("Basic {credentials}")),
                ("user-agent".to_string(), self.config.user_agent.clone()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            timeout: self.config.timeout(),
        }
    }

    /// Interpret a fully-read response: empty body, then status, then JSON.
    pub fn parse<D: DeserializeOwned>(&self, response: HttpResponse) -> Result<D, ApiError> {
        if response.body.is_empty() {
            return Err(ApiError::EmptyResponse { url: response.url });
        }
        if !(200..400).contains(&response.status) {
            return Err(ApiError::HttpStatus {
                url: response.url,
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            url: response.url,
            message: e.to_string(),
            body: response.body,
        })
    }

    /// GET `path` and decode the JSON body into `D`, bounded by the
    /// configured timeout.
    pub fn get<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        self.get_with_timeout(path, self.config.timeout())
    }

    /// Like `get`, with `timeout` replacing the configured one for this call.
    pub fn get_with_timeout<D: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<D, ApiError> {
        let mut request = self.build_get(path);
        request.timeout = timeout;
        let response = self.fetch(&request)?;
        debug!(url = %response.url, status = response.status, bytes = response.body.len(), "GET");
        self.parse(response)
    }

    /// Execute `request` and read the body to completion. The stream is
    /// dropped before returning on every path.
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut stream = self.transport.execute(request)?;
        let mut buf = Vec::new();
        let read = stream.body.read_to_end(&mut buf);
        let status = stream.status;
        drop(stream);

        read.map_err(|e| ApiError::Transport {
            url: request.url.clone(),
            message: format!("couldn't read response body: {e}"),
        })?;
        let body = String::from_utf8(buf).map_err(|e| ApiError::Decode {
            url: request.url.clone(),
            message: e.to_string(),
            body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })?;

        Ok(HttpResponse {
            url: request.url.clone(),
            status,
            body,
        })
    }
}
