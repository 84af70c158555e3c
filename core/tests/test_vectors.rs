//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file lists simulated responses together with the record the
//! client must decode or the error it must report. Expected records are
//! themselves decoded from JSON so field order and timestamp spelling do not
//! matter.

use toggl_core::{ApiError, Client, ClientConfig, DataEnvelope, HttpResponse, TimeEntry, User, UreqTransport};

const BASE_URL: &str = "http://localhost:3000/api/v8";

fn client() -> Client<UreqTransport> {
    let config = ClientConfig {
        base_url: BASE_URL.to_string(),
        ..ClientConfig::default()
    };
    Client::with_config("vector-key", config)
}

/// Build the request for `endpoint`, check its URL against the vector and
/// return the simulated response.
fn simulate(c: &Client, endpoint: &str, case: &serde_json::Value) -> HttpResponse {
    let name = case["name"].as_str().unwrap();
    let req = c.build_get(endpoint);
    let expected_path = case["expected_request"]["path"].as_str().unwrap();
    assert_eq!(req.url, format!("{BASE_URL}{expected_path}"), "{name}: url");

    let sim = &case["simulated_response"];
    HttpResponse {
        url: req.url,
        status: sim["status"].as_u64().unwrap() as u16,
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_error_kind(name: &str, err: &ApiError, expected: &str) {
    let matched = match expected {
        "HttpStatus" => matches!(err, ApiError::HttpStatus { .. }),
        "EmptyResponse" => matches!(err, ApiError::EmptyResponse { .. }),
        "Decode" => matches!(err, ApiError::Decode { .. }),
        "Transport" => matches!(err, ApiError::Transport { .. }),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Me
// ---------------------------------------------------------------------------

#[test]
fn me_test_vectors() {
    let raw = include_str!("../../test-vectors/me.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = simulate(&c, "me", case);
        let result = c.parse::<DataEnvelope<User>>(response);

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let user = result.unwrap().data;
            let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(user, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Time entries
// ---------------------------------------------------------------------------

#[test]
fn time_entries_test_vectors() {
    let raw = include_str!("../../test-vectors/time_entries.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = simulate(&c, "time_entries", case);
        let raw_body = response.body.clone();
        let result = c.parse::<Vec<TimeEntry>>(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            assert_eq!(err.body(), Some(raw_body.as_str()), "{name}: raw body kept");
        } else {
            let entries = result.unwrap();
            let expected: Vec<TimeEntry> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(entries, expected, "{name}: parsed result");
        }
    }
}
