// src/error.rs

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::io;
use thiserror::Error;

/// Errors that can cross a module boundary inside the service.
///
/// Per-candidate probe failures are deliberately absent: they are turned into
/// unreachable `ProbeResult`s inside the probers and never surface here.
#[derive(Error, Debug)]
pub enum ReconError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ReconResult<T> = Result<T, ReconError>;

impl From<sqlx::Error> for ReconError {
    fn from(err: sqlx::Error) -> Self {
        ReconError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        ReconError::Persistence(format!("JSON encoding failed: {err}"))
    }
}

impl ReconError {
    /// Maps the error onto the status code returned at the HTTP boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReconError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ReconError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to a client. Callers log the full error before responding.
    pub fn public_message(&self) -> String {
        match self {
            ReconError::InvalidInput(_) | ReconError::Unauthorized => self.to_string(),
            ReconError::Persistence(_) => "Scan history is temporarily unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ReconError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "success": false, "error": self.public_message() }));
        (status, body).into_response()
    }
}
