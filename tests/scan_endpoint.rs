mod common;

use arcanum_recon::core::scanner::probe_client::ProbeError;
use arcanum_recon::http::LEGACY_SCAN_PATH;
use arcanum_recon::store::{HistoryStore, SqliteHistoryStore};
use common::{CapturedLogs, FailingStore, MemoryStore, MockProbeClient, TOKEN, USER, spawn_app};
use serde_json::{Value, json};
use std::sync::Arc;

async fn post_scan(base: &str, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
    let mut request = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .header("content-type", "application/json")
        .body(body.to_string());
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap())
}

async fn get_history(base: &str, path: &str, token: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .get(format!("{base}{path}"))
        .header("authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap())
}

fn urls(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|r| r["url"].as_str().unwrap().to_string())
        .collect()
}

fn example_client() -> MockProbeClient {
    MockProbeClient::default()
        .with("https://example.com/wp-admin", Ok(404))
        .with("https://example.com/.env", Err(ProbeError::Timeout))
        .with("https://www.example.com", Ok(200))
        .with("https://api.example.com", Err(ProbeError::Connect("dns error".into())))
        .with("https://example.com/up/a1", Ok(200))
        .with("https://example.com/up/a2", Ok(404))
}

#[tokio::test]
async fn end_to_end_example_scan() {
    let store = Arc::new(MemoryStore::default());
    let base = spawn_app(Arc::new(example_client()), store.clone()).await;

    let (status, body) = post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "example.com/up"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["domain"], json!("example.com"));
    assert_eq!(urls(&body["urls_found"]), vec!["www.example.com", "example.com/up/a1"]);
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["sensitive_routes"].as_array().unwrap().len(), 2);
    assert_eq!(body["subdomains"].as_array().unwrap().len(), 2);
    assert_eq!(body["sensitive_routes"][1]["status"], Value::Null);
    assert_eq!(body["sensitive_routes"][1]["category"], json!("config"));
    assert_eq!(body["subdomains"][0]["kind"], json!("subdomain"));

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, USER);
    assert_eq!(records[0].domain, "example.com");
    assert_eq!(records[0].results.len(), 6);
}

#[tokio::test]
async fn every_candidate_reachable_fills_urls_found() {
    let client = [
        "https://alvo.com/wp-admin",
        "https://alvo.com/.env",
        "https://www.alvo.com",
        "https://api.alvo.com",
        "https://alvo.com/up/a1",
        "https://alvo.com/up/a2",
    ]
    .into_iter()
    .fold(MockProbeClient::default(), |c, url| c.with(url, Ok(200)));
    let base = spawn_app(Arc::new(client), Arc::new(MemoryStore::default())).await;

    let (status, body) = post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "alvo.com/up"})).await;

    assert_eq!(status, 200);
    let found = urls(&body["urls_found"]);
    assert_eq!(found.len(), 6);
    let mut union = urls(&body["sensitive_routes"]);
    union.extend(urls(&body["subdomains"]));
    union.extend(urls(&body["slug_candidates"]));
    assert_eq!(found, union);
    assert_eq!(body["total"], json!(6));
}

#[tokio::test]
async fn blank_domain_is_a_bad_request_without_probing() {
    let client = Arc::new(MockProbeClient::default());
    let store = Arc::new(MemoryStore::default());
    let base = spawn_app(client.clone(), store.clone()).await;

    let (status, body) = post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "   "})).await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("empty"));
    assert!(client.calls().is_empty());
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let client = Arc::new(MockProbeClient::default());
    let base = spawn_app(client.clone(), Arc::new(MemoryStore::default())).await;

    let (status, body) = post_scan(&base, "/scan", Some(TOKEN), json!({"target": "alvo.com"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn unauthenticated_scan_is_rejected() {
    let client = Arc::new(MockProbeClient::default());
    let base = spawn_app(client.clone(), Arc::new(MemoryStore::default())).await;

    let (status, body) = post_scan(&base, "/scan", None, json!({"domain": "alvo.com"})).await;
    assert_eq!(status, 401);
    assert_eq!(body["success"], json!(false));

    let (status, _) = post_scan(&base, "/scan", Some("wrong"), json!({"domain": "alvo.com"})).await;
    assert_eq!(status, 401);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn history_failure_does_not_fail_the_scan() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let store = Arc::new(FailingStore::default());
    let base = spawn_app(Arc::new(example_client()), store.clone()).await;

    let (status, body) = post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "example.com/up"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(2));
    assert_eq!(store.attempts(), 1);

    let logged = logs.contents();
    assert!(logged.contains("Failed to store scan history."), "logs were: {logged}");
    assert!(logged.contains("database is locked"));
}

#[tokio::test]
async fn history_read_failure_is_reported() {
    let base = spawn_app(Arc::new(MockProbeClient::default()), Arc::new(FailingStore::default())).await;

    let (status, body) = get_history(&base, "/scan/history", TOKEN).await;

    assert_eq!(status, 500);
    assert_eq!(body["success"], json!(false));
    let message = body["error"].as_str().unwrap();
    assert!(!message.contains("database is locked"), "leaked: {message}");
}

#[tokio::test]
async fn history_rejects_non_numeric_limit() {
    let base = spawn_app(Arc::new(MockProbeClient::default()), Arc::new(MemoryStore::default())).await;

    let (status, body) = get_history(&base, "/scan/history?limit=abc", TOKEN).await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn history_lists_only_the_callers_scans() {
    let store = Arc::new(MemoryStore::default());
    let base = spawn_app(Arc::new(MockProbeClient::default()), store.clone()).await;

    post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "a.com"})).await;
    post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "https://b.com/up"})).await;
    post_scan(&base, "/scan", Some("tok-bob"), json!({"domain": "c.com"})).await;

    let (status, body) = get_history(&base, "/scan/history", TOKEN).await;
    assert_eq!(status, 200);
    let domains: Vec<&str> = body["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["domain"].as_str().unwrap())
        .collect();
    assert_eq!(domains, vec!["b.com", "a.com"]);

    let (_, body) = get_history(&base, "/scan/history?limit=1", TOKEN).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);

    let (_, body) = get_history(&base, LEGACY_SCAN_PATH, "tok-bob").await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
    assert_eq!(body["history"][0]["user_id"], json!("bob"));
}

#[tokio::test]
async fn legacy_path_accepts_scans() {
    let base = spawn_app(Arc::new(example_client()), Arc::new(MemoryStore::default())).await;

    let (status, body) =
        post_scan(&base, LEGACY_SCAN_PATH, Some(TOKEN), json!({"domain": "https://example.com/up/"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn scans_round_trip_through_sqlite() {
    let store: Arc<dyn HistoryStore> =
        Arc::new(SqliteHistoryStore::connect("sqlite::memory:", 1).await.unwrap());
    let base = spawn_app(Arc::new(example_client()), store.clone()).await;

    post_scan(&base, "/scan", Some(TOKEN), json!({"domain": "example.com/up"})).await;

    let (status, body) = get_history(&base, "/scan/history", TOKEN).await;
    assert_eq!(status, 200);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["domain"], json!("example.com"));
    assert_eq!(history[0]["results"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn healthz_reports_version() {
    let base = spawn_app(Arc::new(MockProbeClient::default()), Arc::new(MemoryStore::default())).await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}
