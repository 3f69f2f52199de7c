// src/core/scanner/subdomain_scanner.rs

use tracing::info;

use super::probe_client::{Candidate, ProbeClient, probe_all};
use crate::core::models::{ProbeKind, ProbeResult};

/// Probes `https://{prefix}.{domain}` for each prefix of the catalogue.
///
/// # Returns
/// One result per prefix, in catalogue order. Hosts that do not resolve come
/// back unreachable with no status.
pub async fn run_subdomain_scan(
    client: &dyn ProbeClient,
    domain: &str,
    prefixes: &[String],
    concurrency: usize,
) -> Vec<ProbeResult> {
    info!(domain, prefixes = prefixes.len(), "Starting subdomain scan.");

    let candidates = prefixes
        .iter()
        .map(|prefix| Candidate { url: format!("{prefix}.{domain}"), category: None })
        .collect();

    let results = probe_all(client, ProbeKind::Subdomain, candidates, concurrency).await;
    let live = results.iter().filter(|r| r.reachable).count();
    info!(domain, live, "Subdomain scan finished.");
    results
}
