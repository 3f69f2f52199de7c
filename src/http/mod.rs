// src/http/mod.rs

//! HTTP surface of the scanner: scan, history and health routes.

mod handlers;

pub use self::handlers::{HistoryQuery, ScanRequest, ScanResponse};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;

use crate::auth::SessionResolver;
use crate::config::MAX_HISTORY_LIMIT;
use crate::core::scanner::Scanner;
use crate::store::HistoryStore;

/// Legacy path the platform front end still calls.
pub const LEGACY_SCAN_PATH: &str = "/api/espionagem/espiao-dominios";

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Scanner,
    pub store: Arc<dyn HistoryStore>,
    pub auth: Arc<dyn SessionResolver>,
    pub history_limit: usize,
}

impl AppState {
    pub fn new(
        scanner: Scanner,
        store: Arc<dyn HistoryStore>,
        auth: Arc<dyn SessionResolver>,
        history_limit: usize,
    ) -> Self {
        Self { scanner, store, auth, history_limit: history_limit.clamp(1, MAX_HISTORY_LIMIT) }
    }
}

pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/scan", post(handlers::scan_handler))
        .route("/scan/history", get(handlers::history_handler))
        .route(
            LEGACY_SCAN_PATH,
            post(handlers::scan_handler).get(handlers::history_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
