// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Target ---

/// A normalized scan target.
///
/// `host` never carries a scheme or a path (it may carry an explicit port).
/// `base_path` holds the path the caller supplied, without leading or trailing
/// slashes, and is only consumed by the slug prober.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    pub host: String,
    pub base_path: Option<String>,
}

impl ScanTarget {
    /// The domain the subdomain prober builds on: the host without a leading `www.`.
    pub fn base_domain(&self) -> &str {
        self.host.strip_prefix("www.").unwrap_or(&self.host)
    }
}

// --- Probe results ---

/// Which prober produced a result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProbeKind {
    SensitiveRoute,
    Subdomain,
    SlugCandidate,
}

/// The outcome of one HTTP probe against one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Scheme-less candidate, e.g. `www.example.com` or `example.com/.env`.
    pub url: String,
    pub kind: ProbeKind,
    /// Catalogue type tag for sensitive routes (`config`, `vcs`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub reachable: bool,
    /// Absent when no response was received.
    pub status: Option<u16>,
}

impl ProbeResult {
    /// Builds a result from an observed status code, applying the reachability convention.
    pub fn from_status(url: String, kind: ProbeKind, category: Option<String>, status: u16) -> Self {
        Self {
            url,
            kind,
            category,
            reachable: is_reachable(status),
            status: Some(status),
        }
    }

    /// Builds a result for a candidate that produced no response at all.
    pub fn unreachable(url: String, kind: ProbeKind, category: Option<String>) -> Self {
        Self { url, kind, category, reachable: false, status: None }
    }
}

/// A status counts as reachable when it falls in `200..=399`.
///
/// Redirects are not followed by the probe client, so a 3xx is observed as-is
/// and reported as a hit.
pub fn is_reachable(status: u16) -> bool {
    (200..=399).contains(&status)
}

// --- Report ---

/// Aggregate of one scan. Built once by the orchestrator and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub domain: String,
    pub urls_found: Vec<ProbeResult>,
    pub sensitive_routes: Vec<ProbeResult>,
    pub subdomains: Vec<ProbeResult>,
    pub slug_candidates: Vec<ProbeResult>,
}

impl ScanReport {
    pub fn total(&self) -> usize {
        self.urls_found.len()
    }

    /// Every attempted probe in one list: routes, then subdomains, then slug candidates.
    pub fn flatten(&self) -> Vec<ProbeResult> {
        self.sensitive_routes
            .iter()
            .chain(&self.subdomains)
            .chain(&self.slug_candidates)
            .cloned()
            .collect()
    }
}

// --- History ---

/// A history row as it is about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub user_id: String,
    pub domain: String,
    pub results: Vec<ProbeResult>,
}

impl NewHistoryRecord {
    pub fn from_report(user_id: &str, report: &ScanReport) -> Self {
        Self {
            user_id: user_id.to_string(),
            domain: report.domain.clone(),
            results: report.flatten(),
        }
    }
}

/// A persisted scan. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub user_id: String,
    pub domain: String,
    pub results: Vec<ProbeResult>,
    pub created_at: DateTime<Utc>,
}
