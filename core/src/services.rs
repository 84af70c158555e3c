//! Resource services: thin facades that compose endpoint paths and delegate
//! to `Client::get`.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{DataEnvelope, Project, TimeEntry, User};

/// Most entries the service returns for a single `time_entries` query.
/// There is no pagination; split wide ranges to see more.
pub const RANGE_LIMIT: usize = 1000;

/// Accesses `time_entries`.
#[derive(Debug)]
pub struct TimeEntries<'a, T: Transport> {
    client: &'a Client<T>,
    timeout: Option<Duration>,
}

impl<'a, T: Transport> TimeEntries<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self {
            client,
            timeout: client.config().timeout(),
        }
    }

    /// Bound calls made through this handle by `timeout` instead of the
    /// client's configured one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get(&self, id: u64) -> Result<TimeEntry, ApiError> {
        let envelope: DataEnvelope<TimeEntry> =
            self.client.get_with_timeout(&format!("time_entries/{id}"), self.timeout)?;
        Ok(envelope.data)
    }

    /// The running entry, or `None` when no timer is running.
    pub fn current(&self) -> Result<Option<TimeEntry>, ApiError> {
        let envelope: DataEnvelope<Option<TimeEntry>> =
            self.client.get_with_timeout("time_entries/current", self.timeout)?;
        Ok(envelope.data)
    }

    /// Entries that started within `[start, end]`.
    ///
    /// At most `RANGE_LIMIT` entries come back. Reaching the limit is logged
    /// because the range was probably cut short.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TimeEntry>, ApiError> {
        let mut entries: Vec<TimeEntry> =
            self.client.get_with_timeout(&range_path(start, end), self.timeout)?;
        if entries.len() >= RANGE_LIMIT {
            warn!(
                %start,
                %end,
                returned = entries.len(),
                "time entry range hit the service limit of {RANGE_LIMIT}; results may be truncated"
            );
            entries.truncate(RANGE_LIMIT);
        }
        Ok(entries)
    }
}

fn range_path(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "time_entries?start_date={}&end_date={}",
        start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Accesses `me`, the user owning the API key.
#[derive(Debug)]
pub struct Me<'a, T: Transport> {
    client: &'a Client<T>,
    timeout: Option<Duration>,
}

impl<'a, T: Transport> Me<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self {
            client,
            timeout: client.config().timeout(),
        }
    }

    /// Bound calls made through this handle by `timeout` instead of the
    /// client's configured one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get(&self) -> Result<User, ApiError> {
        let envelope: DataEnvelope<User> =
            self.client.get_with_timeout("me", self.timeout)?;
        Ok(envelope.data)
    }
}

/// Accesses `projects`.
#[derive(Debug)]
pub struct Projects<'a, T: Transport> {
    client: &'a Client<T>,
    timeout: Option<Duration>,
}

impl<'a, T: Transport> Projects<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self {
            client,
            timeout: client.config().timeout(),
        }
    }

    /// Bound calls made through this handle by `timeout` instead of the
    /// client's configured one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get(&self, id: u64) -> Result<Project, ApiError> {
        let envelope: DataEnvelope<Project> =
            self.client.get_with_timeout(&format!("projects/{id}"), self.timeout)?;
        Ok(envelope.data)
    }
}
