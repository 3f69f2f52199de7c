// src/http/handlers.rs

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use super::AppState;
use crate::auth::UserId;
use crate::config::MAX_HISTORY_LIMIT;
use crate::core::models::{HistoryRecord, NewHistoryRecord, ProbeResult, ScanReport};
use crate::error::{ReconError, ReconResult};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub domain: String,
    pub urls_found: Vec<ProbeResult>,
    pub sensitive_routes: Vec<ProbeResult>,
    pub subdomains: Vec<ProbeResult>,
    pub slug_candidates: Vec<ProbeResult>,
    pub total: usize,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        let total = report.total();
        Self {
            success: true,
            domain: report.domain,
            urls_found: report.urls_found,
            sensitive_routes: report.sensitive_routes,
            subdomains: report.subdomains,
            slug_candidates: report.slug_candidates,
            total,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    success: bool,
    history: Vec<HistoryRecord>,
}

fn require_user(state: &AppState, headers: &HeaderMap) -> ReconResult<UserId> {
    state.auth.resolve(headers).ok_or_else(|| {
        warn!("Rejected unauthenticated request.");
        ReconError::Unauthorized
    })
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Scans the requested domain and records the outcome in the caller's history.
///
/// A failed history write is logged and otherwise ignored: the report is still
/// returned with `success: true`.
pub(crate) async fn scan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> ReconResult<Json<ScanResponse>> {
    let user_id = require_user(&state, &headers)?;
    let Json(request) = payload.map_err(|e| ReconError::InvalidInput(e.body_text()))?;
    info!(user_id = %user_id, domain = %request.domain, "Scan requested.");

    let report = state.scanner.scan(&request.domain).await?;

    let record = NewHistoryRecord::from_report(&user_id, &report);
    if let Err(e) = state.store.insert(record).await {
        error!(user_id = %user_id, domain = %report.domain, error = %e, "Failed to store scan history.");
    }

    Ok(Json(ScanResponse::from(report)))
}

/// Returns the caller's most recent scans, newest first.
pub(crate) async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ReconResult<impl IntoResponse> {
    let user_id = require_user(&state, &headers)?;
    let Query(query) = query.map_err(|e| ReconError::InvalidInput(e.body_text()))?;
    let limit = query.limit.unwrap_or(state.history_limit).clamp(1, MAX_HISTORY_LIMIT);

    let history = state.store.recent_for_user(&user_id, limit).await.map_err(|e| {
        error!(user_id = %user_id, error = %e, "Failed to read scan history.");
        e
    })?;

    Ok(Json(HistoryResponse { success: true, history }))
}
