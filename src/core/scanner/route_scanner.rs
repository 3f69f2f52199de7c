// src/core/scanner/route_scanner.rs

use tracing::info;

use super::probe_client::{Candidate, ProbeClient, probe_all};
use crate::core::catalogue::RouteEntry;
use crate::core::models::{ProbeKind, ProbeResult};

/// Probes every sensitive path of the catalogue on `host`.
///
/// # Arguments
/// * `client` - Client issuing the requests.
/// * `host` - Normalized host, without scheme or path.
/// * `routes` - Catalogue entries; each path starts with `/`.
/// * `concurrency` - Maximum number of requests in flight.
///
/// # Returns
/// One result per catalogue entry, in catalogue order, tagged with the entry's type.
pub async fn run_route_scan(
    client: &dyn ProbeClient,
    host: &str,
    routes: &[RouteEntry],
    concurrency: usize,
) -> Vec<ProbeResult> {
    info!(host, routes = routes.len(), "Starting sensitive route scan.");

    let candidates = routes
        .iter()
        .map(|entry| Candidate {
            url: format!("{host}{}", entry.path),
            category: Some(entry.kind.clone()),
        })
        .collect();

    let results = probe_all(client, ProbeKind::SensitiveRoute, candidates, concurrency).await;
    let exposed = results.iter().filter(|r| r.reachable).count();
    info!(host, exposed, "Sensitive route scan finished.");
    results
}
