// src/core/scanner/slug_scanner.rs

use tracing::{debug, info};

use super::probe_client::{Candidate, ProbeClient, probe_all};
use crate::core::models::{ProbeKind, ProbeResult};

/// Probes `{host}/{base_path}/{suffix}` for each suffix.
///
/// Without a base path nothing is probed; the bare domain is never a slug candidate.
///
/// # Arguments
/// * `host` - Normalized host the slugs hang off.
/// * `base_path` - Path the caller supplied, if any.
/// * `suffixes` - Generated slug suffixes, probed in order.
///
/// # Returns
/// One result per suffix, or an empty list when there is no base path.
pub async fn run_slug_scan(
    client: &dyn ProbeClient,
    host: &str,
    base_path: Option<&str>,
    suffixes: &[String],
    concurrency: usize,
) -> Vec<ProbeResult> {
    let Some(base) = base_path.map(|b| b.trim_matches('/')).filter(|b| !b.is_empty()) else {
        debug!(host, "No base path supplied, skipping slug scan.");
        return Vec::new();
    };

    info!(host, base, suffixes = suffixes.len(), "Starting slug scan.");

    let candidates = suffixes
        .iter()
        .map(|suffix| Candidate {
            url: format!("{host}/{base}/{}", suffix.trim_matches('/')),
            category: None,
        })
        .collect();

    let results = probe_all(client, ProbeKind::SlugCandidate, candidates, concurrency).await;
    let found = results.iter().filter(|r| r.reachable).count();
    info!(host, base, found, "Slug scan finished.");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalogue::generate_slug_suffixes;
    use crate::core::scanner::probe_client::testing::ScriptedClient;

    #[tokio::test]
    async fn no_base_path_means_no_requests() {
        let client = ScriptedClient::default();
        let suffixes = generate_slug_suffixes(5);

        assert!(run_slug_scan(&client, "alvo.com", None, &suffixes, 4).await.is_empty());
        assert!(run_slug_scan(&client, "alvo.com", Some("/"), &suffixes, 4).await.is_empty());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn suffixes_are_appended_to_the_base_path() {
        let client = ScriptedClient::default()
            .with("https://alvo.com/up/a1", Ok(200))
            .with("https://alvo.com/up/a2", Ok(404));

        let results =
            run_slug_scan(&client, "alvo.com", Some("up"), &generate_slug_suffixes(3), 4).await;

        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["alvo.com/up/a1", "alvo.com/up/a2", "alvo.com/up/a3"]);
        assert!(results[0].reachable);
        assert!(!results[1].reachable);
        assert_eq!(results[2].status, None);
        assert_eq!(
            client.calls(),
            vec!["https://alvo.com/up/a1", "https://alvo.com/up/a2", "https://alvo.com/up/a3"]
        );
    }
}
