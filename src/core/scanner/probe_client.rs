// src/core/scanner/probe_client.rs

use async_trait::async_trait;
use futures::{StreamExt, stream};
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::models::{ProbeKind, ProbeResult};
use crate::error::ReconResult;

/// Default timeout applied to every probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(4);

const USER_AGENT: &str = concat!("ArcanumRecon/", env!("CARGO_PKG_VERSION"));

/// Why a single probe produced no response. Never leaves the prober that issued it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Other(err.to_string())
        }
    }
}

/// The fetch-with-timeout capability shared by all probers.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Issues one request and returns the response status code.
    async fn fetch_status(&self, url: &str) -> Result<u16, ProbeError>;
}

/// `reqwest`-backed probe client. Redirects are never followed.
#[derive(Debug, Clone)]
pub struct HttpProbeClient {
    client: reqwest::Client,
}

impl HttpProbeClient {
    pub fn new(timeout: Duration) -> ReconResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeClient for HttpProbeClient {
    async fn fetch_status(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}

/// One candidate waiting to be probed.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Scheme-less candidate as it will appear in the report.
    pub url: String,
    pub category: Option<String>,
}

impl Candidate {
    /// The URL actually requested for this candidate.
    pub fn href(&self) -> String {
        format!("https://{}", self.url)
    }
}

/// Probes every candidate with at most `concurrency` requests in flight.
///
/// The output has exactly one entry per candidate, in input order. Failures are
/// recorded as unreachable results and never retried.
pub async fn probe_all(
    client: &dyn ProbeClient,
    kind: ProbeKind,
    candidates: Vec<Candidate>,
    concurrency: usize,
) -> Vec<ProbeResult> {
    stream::iter(candidates)
        .map(|candidate| probe_one(client, kind, candidate))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn probe_one(client: &dyn ProbeClient, kind: ProbeKind, candidate: Candidate) -> ProbeResult {
    let href = candidate.href();
    match client.fetch_status(&href).await {
        Ok(status) => {
            debug!(url = %href, status, %kind, "Probe answered.");
            ProbeResult::from_status(candidate.url, kind, candidate.category, status)
        }
        Err(e) => {
            warn!(url = %href, error = %e, %kind, "Probe failed, marking unreachable.");
            ProbeResult::unreachable(candidate.url, kind, candidate.category)
        }
    }
}
