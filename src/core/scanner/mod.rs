// src/core/scanner/mod.rs

pub mod probe_client;
pub mod route_scanner;
pub mod slug_scanner;
pub mod subdomain_scanner;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use self::probe_client::ProbeClient;
use self::route_scanner::run_route_scan;
use self::slug_scanner::run_slug_scan;
use self::subdomain_scanner::run_subdomain_scan;
use crate::core::catalogue::Catalogue;
use crate::core::models::{ProbeResult, ScanReport};
use crate::core::target::normalize_target;
use crate::error::ReconResult;

/// Default number of in-flight probes per prober.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Drives the three probers for one target and assembles the report.
///
/// Holds no per-scan state, so one instance is shared by every request.
#[derive(Clone)]
pub struct Scanner {
    client: Arc<dyn ProbeClient>,
    catalogue: Arc<Catalogue>,
    max_concurrency: usize,
}

impl Scanner {
    pub fn new(client: Arc<dyn ProbeClient>, catalogue: Catalogue) -> Self {
        Self { client, catalogue: Arc::new(catalogue), max_concurrency: DEFAULT_MAX_CONCURRENCY }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Runs a full scan of `raw_target`.
    ///
    /// # Arguments
    /// * `raw_target` - Domain as the caller sent it, optionally with scheme and path.
    ///
    /// # Returns
    /// The assembled `ScanReport`. Fails only when the target cannot be
    /// normalized, in which case no probe has been issued.
    pub async fn scan(&self, raw_target: &str) -> ReconResult<ScanReport> {
        let target = normalize_target(raw_target)?;
        info!(host = %target.host, base_path = ?target.base_path, "Starting domain scan.");

        let client = self.client.as_ref();
        let catalogue = self.catalogue.as_ref();
        let (sensitive_routes, subdomains, slug_candidates) = tokio::join!(
            run_route_scan(client, &target.host, &catalogue.sensitive_routes, self.max_concurrency),
            run_subdomain_scan(
                client,
                target.base_domain(),
                &catalogue.subdomains,
                self.max_concurrency
            ),
            run_slug_scan(
                client,
                &target.host,
                target.base_path.as_deref(),
                &catalogue.slug_suffixes,
                self.max_concurrency
            )
        );

        debug!("All probers completed, merging results.");
        let urls_found = merge_found(&[&sensitive_routes, &subdomains, &slug_candidates]);

        let report = ScanReport {
            domain: target.host,
            urls_found,
            sensitive_routes,
            subdomains,
            slug_candidates,
        };
        info!(domain = %report.domain, total = report.total(), "Domain scan finished.");
        Ok(report)
    }
}

/// Reachable results of every section, in section order, without duplicate URLs.
fn merge_found(sections: &[&Vec<ProbeResult>]) -> Vec<ProbeResult> {
    let mut seen = HashSet::new();
    sections
        .iter()
        .flat_map(|section| section.iter())
        .filter(|result| result.reachable)
        .filter(|result| seen.insert(result.url.clone()))
        .cloned()
        .collect()
}
