//! Resource models for the Toggl v8 API.
//!
//! # Design
//! Field names follow the wire format (`wid`, `pid`, `uid`, ...) through
//! `serde(rename)` while the Rust names spell out what the ids refer to.
//! Most fields default when absent because the service omits empty values
//! rather than sending `null`. Records are snapshots; nothing here writes
//! back to the service.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;

/// Wrapper the service uses for single-object responses: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A single logged interval of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "wid")]
    pub workspace_id: u64,
    #[serde(rename = "pid", default)]
    pub project_id: Option<u64>,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub guid: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub billable: bool,
    pub start: DateTime<Utc>,
    /// Absent while the entry is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,
    /// Whole seconds. A running entry carries `-(start as unix seconds)`.
    #[serde(with = "codec::seconds")]
    pub duration: TimeDelta,
    #[serde(rename = "duronly", default, deserialize_with = "codec::null_as_default")]
    pub duration_only: bool,
    #[serde(rename = "uid", default, deserialize_with = "codec::null_as_default")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub created_with: String,
    #[serde(default, deserialize_with = "codec::null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.duration < TimeDelta::zero()
    }

    /// Elapsed time as of `now`; for stopped entries this is `duration`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        if self.is_running() {
            now - self.start
        } else {
            self.duration
        }
    }
}

/// Profile of the user owning the API key.
///
/// Every field tolerates `null` as well as absence. The capitalised aliases
/// are alternatives, not duplicates: a body carrying both `email` and
/// `Email` is rejected as a duplicate field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "codec::null_as_default")]
    pub api_token: String,
    #[serde(rename = "default_wid", deserialize_with = "codec::null_as_default")]
    pub default_workspace_id: u64,
    #[serde(alias = "Email", deserialize_with = "codec::null_as_default")]
    pub email: String,
    #[serde(alias = "Fullname", deserialize_with = "codec::null_as_default")]
    pub fullname: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub jquery_timeofday_format: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub jquery_date_format: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub timeofday_format: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub date_format: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub store_start_and_stop_time: bool,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub beginning_of_week: u8,
    #[serde(alias = "Language", deserialize_with = "codec::null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub sidebar_piechart: bool,
    pub at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub new_blog_post: BlogPost,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub send_product_emails: bool,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub send_weekly_report: bool,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub send_timer_notifications: bool,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub openid_enabled: bool,
    #[serde(alias = "Timezone", deserialize_with = "codec::null_as_default")]
    pub timezone: String,
}

/// Latest blog post advertised in the user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    #[serde(alias = "Title", deserialize_with = "codec::null_as_default")]
    pub title: String,
    #[serde(alias = "Url", deserialize_with = "codec::null_as_default")]
    pub url: String,
    #[serde(alias = "Category", deserialize_with = "codec::null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "codec::null_as_default")]
    pub pub_date: String,
}

/// A project inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub guid: String,
    #[serde(rename = "wid")]
    pub workspace_id: u64,
    #[serde(rename = "cid", default)]
    pub client_id: Option<u64>,
    pub name: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub billable: bool,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub is_private: bool,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub template: bool,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub hex_color: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub auto_estimates: bool,
    /// Hours tracked on the project so far.
    #[serde(default)]
    pub actual_hours: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const ENTRY: &str = r#"{
        "id": 436694100,
        "wid": 777,
        "pid": 193791,
        "guid": "ce3c2409-9fa5-4ee6-b8ed-4ad2a7e9a9b7",
        "billable": false,
        "start": "2013-03-05T07:58:58.000Z",
        "stop": "2013-03-05T08:58:58+00:00",
        "duration": 3600,
        "description": "Meeting with possible clients",
        "tags": ["billed"],
        "duronly": false,
        "uid": 1,
        "created_with": "curl",
        "at": "2013-03-06T12:18:42+00:00"
    }"#;

    #[test]
    fn time_entry_from_wire() {
        let entry: TimeEntry = serde_json::from_str(ENTRY).unwrap();
        assert_eq!(entry.id, 436_694_100);
        assert_eq!(entry.workspace_id, 777);
        assert_eq!(entry.project_id, Some(193_791));
        assert_eq!(entry.user_id, 1);
        assert_eq!(entry.duration, TimeDelta::hours(1));
        assert_eq!(entry.start, Utc.with_ymd_and_hms(2013, 3, 5, 7, 58, 58).unwrap());
        assert_eq!(entry.stop, Some(Utc.with_ymd_and_hms(2013, 3, 5, 8, 58, 58).unwrap()));
        assert_eq!(entry.tags, vec!["billed".to_string()]);
        assert_eq!(entry.created_with, "curl");
        assert!(!entry.is_running());
    }

    #[test]
    fn running_entry_has_no_stop() {
        let raw = r#"{"id":1,"wid":2,"start":"2024-05-01T09:00:00Z","duration":-1714554000}"#;
        let entry: TimeEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.is_running());
        assert!(entry.stop.is_none());
        assert!(entry.tags.is_empty());
        assert!(entry.description.is_none());

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(entry.elapsed(now), TimeDelta::minutes(30));
    }

    #[test]
    fn time_entry_with_string_duration_fails() {
        let raw = r#"{"id":1,"wid":2,"start":"2024-05-01T09:00:00Z","duration":"60"}"#;
        assert!(serde_json::from_str::<TimeEntry>(raw).is_err());
    }

    #[test]
    fn user_envelope_accepts_capitalised_email() {
        let raw = r#"{"data":{"Email":"a@b.com","default_wid":42,"new_blog_post":{"title":"News","url":"https://blog.example"}}}"#;
        let envelope: DataEnvelope<User> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.email, "a@b.com");
        assert_eq!(envelope.data.default_workspace_id, 42);
        assert_eq!(envelope.data.new_blog_post.title, "News");
        assert!(envelope.data.at.is_none());
    }

    #[test]
    fn null_scalars_decode_as_zero_values() {
        let raw = r#"{"id":1,"wid":2,"start":"2024-05-01T09:00:00Z","duration":5,
            "guid":null,"created_with":null,"billable":null,"duronly":null,"uid":null}"#;
        let entry: TimeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.guid, "");
        assert_eq!(entry.created_with, "");
        assert!(!entry.billable);
        assert!(!entry.duration_only);
        assert_eq!(entry.user_id, 0);
        assert_eq!(entry.duration, TimeDelta::seconds(5));

        let raw = r#"{"data":{"fullname":null,"email":"a@b.com","timezone":null,"default_wid":null,
            "send_weekly_report":null,"new_blog_post":null}}"#;
        let user = serde_json::from_str::<DataEnvelope<User>>(raw).unwrap().data;
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.fullname, "");
        assert_eq!(user.timezone, "");
        assert_eq!(user.default_workspace_id, 0);
        assert_eq!(user.new_blog_post, BlogPost::default());
    }

    #[test]
    fn required_fields_still_reject_null() {
        let raw = r#"{"id":null,"wid":2,"start":"2024-05-01T09:00:00Z","duration":5}"#;
        assert!(serde_json::from_str::<TimeEntry>(raw).is_err());
    }

    #[test]
    fn email_and_alias_together_are_a_duplicate() {
        let raw = r#"{"email":"a@b.com","Email":"c@d.com"}"#;
        let err = serde_json::from_str::<User>(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn null_data_envelope() {
        let envelope: DataEnvelope<Option<TimeEntry>> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn project_from_wire() {
        let raw = r#"{"id":193838628,"wid":777,"cid":123397,"name":"An awesome project","billable":false,
            "is_private":true,"active":true,"at":"2013-03-06T12:15:37+00:00","template":false,"color":"5"}"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.client_id, Some(123_397));
        assert!(project.is_private);
        assert_eq!(project.color, "5");
        assert!(project.actual_hours.is_none());
    }
}
