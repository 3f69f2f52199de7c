#![allow(dead_code)]

use arcanum_recon::auth::{BearerTokenAuth, SessionResolver};
use arcanum_recon::core::catalogue::{Catalogue, RouteEntry, generate_slug_suffixes};
use arcanum_recon::core::models::{HistoryRecord, NewHistoryRecord};
use arcanum_recon::core::scanner::Scanner;
use arcanum_recon::core::scanner::probe_client::{ProbeClient, ProbeError};
use arcanum_recon::http::{AppState, build_router};
use arcanum_recon::store::HistoryStore;
use arcanum_recon::{ReconError, ReconResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TOKEN: &str = "tok-alice";
pub const USER: &str = "alice";

/// Probe client answering from a fixed table; unknown URLs fail to connect.
#[derive(Default)]
pub struct MockProbeClient {
    responses: HashMap<String, Result<u16, ProbeError>>,
    calls: Mutex<Vec<String>>,
}

impl MockProbeClient {
    pub fn with(mut self, url: &str, outcome: Result<u16, ProbeError>) -> Self {
        self.responses.insert(url.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProbeClient for MockProbeClient {
    async fn fetch_status(&self, url: &str) -> Result<u16, ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Connect("connection refused".to_string())))
    }
}

/// In-memory history store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn insert(&self, record: NewHistoryRecord) -> ReconResult<HistoryRecord> {
        let mut records = self.records.lock().unwrap();
        let stored = HistoryRecord {
            id: records.len() as i64 + 1,
            user_id: record.user_id,
            domain: record.domain,
            results: record.results,
            created_at: Utc::now(),
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn recent_for_user(&self, user_id: &str, limit: usize) -> ReconResult<Vec<HistoryRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().filter(|r| r.user_id == user_id).take(limit).cloned().collect())
    }
}

/// Store whose every operation fails.
#[derive(Default)]
pub struct FailingStore {
    pub insert_attempts: AtomicUsize,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for FailingStore {
    async fn insert(&self, _record: NewHistoryRecord) -> ReconResult<HistoryRecord> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        Err(ReconError::Persistence("database is locked".to_string()))
    }

    async fn recent_for_user(&self, _user_id: &str, _limit: usize) -> ReconResult<Vec<HistoryRecord>> {
        Err(ReconError::Persistence("database is locked".to_string()))
    }
}

/// Two routes, two subdomains, two slug suffixes.
pub fn small_catalogue() -> Catalogue {
    Catalogue {
        sensitive_routes: vec![RouteEntry::new("/wp-admin", "cms"), RouteEntry::new("/.env", "config")],
        subdomains: vec!["www".to_string(), "api".to_string()],
        slug_suffixes: generate_slug_suffixes(2),
    }
}

pub fn auth() -> Arc<dyn SessionResolver> {
    Arc::new(BearerTokenAuth::from_pairs([format!("{USER}:{TOKEN}"), "bob:tok-bob".to_string()]).unwrap())
}

/// Serves the router on an ephemeral port and returns its base URL.
pub async fn spawn_app(client: Arc<MockProbeClient>, store: Arc<dyn HistoryStore>) -> String {
    let scanner = Scanner::new(client, small_catalogue()).with_max_concurrency(4);
    let state = AppState::new(scanner, store, auth(), 20);
    let app = build_router(state, 16 * 1024);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Collects formatted log output so a test can assert on what was logged.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes this thread's events into the buffer until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
