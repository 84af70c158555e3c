//! Blocking client for the Toggl v8 REST API.
//!
//! # Overview
//! Authenticates with an API key, issues GET requests against fixed
//! endpoints and decodes the JSON into typed records.
//!
//! ```no_run
//! use chrono::{TimeDelta, Utc};
//! use toggl_core::Client;
//!
//! let client = Client::new("my-api-token");
//! let me = client.me().get()?;
//! let now = Utc::now();
//! let week = client.time_entries().range(now - TimeDelta::days(7), now)?;
//! println!("{} logged {} entries", me.email, week.len());
//! # Ok::<(), toggl_core::ApiError>(())
//! ```
//!
//! # Design
//! - `Client` holds the key, a `ClientConfig` and a `Transport`; services
//!   (`time_entries()`, `me()`, `projects()`) borrow it and only compose paths.
//! - Calls block the current thread. No retries, no caching.
//! - `build_get` / `parse` keep the request and decode halves testable
//!   without a network.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod services;
pub mod types;

pub use client::{Client, ClientConfig, REPORTS_API, TOGGL_API, USER_AGENT};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, ResponseStream, Transport, UreqTransport};
pub use services::{Me, Projects, TimeEntries, RANGE_LIMIT};
pub use types::{BlogPost, DataEnvelope, Project, TimeEntry, User};
