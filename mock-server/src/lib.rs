//! In-memory fake of the Toggl v8 API, served with axum.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Most entries one `time_entries` query returns.
pub const RANGE_LIMIT: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    pub wid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    pub guid: String,
    pub billable: bool,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub duronly: bool,
    pub uid: u64,
    pub created_with: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub url: String,
    pub category: String,
    pub pub_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub api_token: String,
    pub default_wid: u64,
    pub email: String,
    pub fullname: String,
    pub timeofday_format: String,
    pub date_format: String,
    pub store_start_and_stop_time: bool,
    pub beginning_of_week: u8,
    pub language: String,
    pub image_url: String,
    pub at: DateTime<Utc>,
    pub new_blog_post: BlogPost,
    pub send_product_emails: bool,
    pub send_weekly_report: bool,
    pub send_timer_notifications: bool,
    pub openid_enabled: bool,
    pub timezone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub guid: String,
    pub wid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<u64>,
    pub name: String,
    pub billable: bool,
    pub is_private: bool,
    pub active: bool,
    pub template: bool,
    pub at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub color: String,
    pub auto_estimates: bool,
}

#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

/// Everything the fake service knows about one account.
#[derive(Clone, Debug)]
pub struct Store {
    pub user: User,
    pub time_entries: Vec<TimeEntry>,
    pub projects: Vec<Project>,
    next_id: u64,
}

impl Store {
    pub fn new(api_token: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            user: User {
                api_token: api_token.to_string(),
                default_wid: 777,
                email: email.to_string(),
                fullname: "Mock User".to_string(),
                timeofday_format: "H:mm".to_string(),
                date_format: "MM/DD/YYYY".to_string(),
                store_start_and_stop_time: true,
                beginning_of_week: 1,
                language: "en_US".to_string(),
                image_url: String::new(),
                at: now,
                new_blog_post: BlogPost::default(),
                send_product_emails: false,
                send_weekly_report: false,
                send_timer_notifications: true,
                openid_enabled: false,
                timezone: "UTC".to_string(),
            },
            time_entries: Vec::new(),
            projects: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a stopped entry and return its id.
    pub fn add_entry(&mut self, start: DateTime<Utc>, seconds: i64, description: &str) -> u64 {
        let id = self.next_id();
        let entry = TimeEntry {
            id,
            wid: self.user.default_wid,
            pid: None,
            guid: Uuid::new_v4().to_string(),
            billable: false,
            start,
            stop: Some(start + chrono::TimeDelta::seconds(seconds)),
            duration: seconds,
            description: Some(description.to_string()),
            tags: Vec::new(),
            duronly: false,
            uid: 1,
            created_with: "mock-server".to_string(),
            at: start,
        };
        self.time_entries.push(entry);
        id
    }

    /// Add a running entry. Its duration is the negated start epoch.
    pub fn start_entry(&mut self, start: DateTime<Utc>, description: &str) -> u64 {
        let id = self.add_entry(start, 0, description);
        if let Some(entry) = self.time_entries.iter_mut().find(|e| e.id == id) {
            entry.stop = None;
            entry.duration = -start.timestamp();
        }
        id
    }

    pub fn add_project(&mut self, name: &str) -> u64 {
        let id = self.next_id();
        let now = Utc::now();
        self.projects.push(Project {
            id,
            guid: Uuid::new_v4().to_string(),
            wid: self.user.default_wid,
            cid: None,
            name: name.to_string(),
            billable: false,
            is_private: true,
            active: true,
            template: false,
            at: now,
            created_at: now,
            color: "5".to_string(),
            auto_estimates: false,
        });
        id
    }

    /// Small fixture for running the binary by hand.
    pub fn demo() -> Self {
        let mut store = Self::new("demo-token", "demo@example.com");
        let now = Utc::now();
        store.add_project("Demo project");
        store.add_entry(now - chrono::TimeDelta::hours(3), 3600, "Planning");
        store.start_entry(now - chrono::TimeDelta::minutes(20), "Writing");
        store
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

pub fn app(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/me", get(get_me))
        .route("/time_entries", get(list_time_entries))
        .route("/time_entries/current", get(current_time_entry))
        .route("/time_entries/{id}", get(get_time_entry))
        .route("/projects/{id}", get(get_project))
        .with_state(db);
    Router::new().nest("/api/v8", api)
}

pub async fn run(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// The service answers bad credentials with 403 and no body.
fn authorized(headers: &HeaderMap, store: &Store) -> bool {
    let expected = format!("{}:api_token", store.user.api_token);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .is_some_and(|decoded| decoded == expected.as_bytes())
}

async fn get_me(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    if !authorized(&headers, &store) {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(Envelope {
        data: store.user.clone(),
    })
    .into_response()
}

async fn list_time_entries(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(range): Query<RangeQuery>,
) -> Response {
    let store = db.read().await;
    if !authorized(&headers, &store) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let mut entries: Vec<TimeEntry> = store
        .time_entries
        .iter()
        .filter(|e| range.start_date.map_or(true, |start| e.start >= start))
        .filter(|e| range.end_date.map_or(true, |end| e.start <= end))
        .cloned()
        .collect();
    entries.sort_by_key(|e| e.start);
    entries.truncate(RANGE_LIMIT);
    tracing::debug!(count = entries.len(), "listing time entries");
    Json(entries).into_response()
}

async fn current_time_entry(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    if !authorized(&headers, &store) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let running = store.time_entries.iter().find(|e| e.duration < 0).cloned();
    Json(Envelope { data: running }).into_response()
}

async fn get_time_entry(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    if !authorized(&headers, &store) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match store.time_entries.iter().find(|e| e.id == id) {
        Some(entry) => Json(Envelope { data: entry.clone() }).into_response(),
        None => (StatusCode::NOT_FOUND, "Time entry not found").into_response(),
    }
}

async fn get_project(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    if !authorized(&headers, &store) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match store.projects.iter().find(|p| p.id == id) {
        Some(project) => Json(Envelope { data: project.clone() }).into_response(),
        None => (StatusCode::NOT_FOUND, "Project not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn running_entry_has_negative_epoch_duration() {
        let mut store = Store::new("t", "a@b.com");
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let id = store.start_entry(start, "Running");
        let entry = store.time_entries.iter().find(|e| e.id == id).unwrap();
        assert_eq!(entry.duration, -start.timestamp());
        assert!(entry.stop.is_none());
    }

    #[test]
    fn ids_are_unique_across_resources() {
        let mut store = Store::new("t", "a@b.com");
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let a = store.add_entry(start, 60, "a");
        let p = store.add_project("p");
        let b = store.add_entry(start, 60, "b");
        assert_ne!(a, p);
        assert_ne!(a, b);
        assert_ne!(p, b);
    }

    #[test]
    fn time_entry_serializes_wire_names() {
        let mut store = Store::new("t", "a@b.com");
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        store.add_entry(start, 90, "x");
        let json = serde_json::to_value(&store.time_entries[0]).unwrap();
        assert_eq!(json["wid"], 777);
        assert_eq!(json["duration"], 90);
        assert!(json.get("pid").is_none());
        assert_eq!(json["start"], "2024-05-01T09:00:00Z");
    }

    #[test]
    fn range_query_parses_rfc3339() {
        let q: RangeQuery = serde_json::from_str(
            r#"{"start_date":"2024-01-01T00:00:00Z","end_date":"2024-01-02T00:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(q.start_date, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(q.end_date, Some(Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap()));
    }
}
