// src/core/target.rs

use crate::core::models::ScanTarget;
use crate::error::{ReconError, ReconResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;
use url::{Host, Url};

static RE_HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_]([a-z0-9_-]{0,61}[a-z0-9_])?(\.[a-z0-9_]([a-z0-9_-]{0,61}[a-z0-9_])?)*$")
        .expect("hostname regex is valid")
});

/// Normalizes a raw, caller-supplied target into a host and an optional base path.
///
/// The scheme (if any) is discarded, the host is lower-cased and the path is
/// kept separately with its surrounding slashes removed. Query strings and
/// fragments are dropped. Applying this to its own output yields the same
/// target.
///
/// Loopback, private, link-local and other non-public addresses are rejected,
/// as are `localhost` and single-label names.
///
/// # Arguments
/// * `raw` - The target exactly as the caller sent it (e.g. "https://alvo.com/up/").
///
/// # Returns
/// The normalized `ScanTarget`, or `ReconError::InvalidInput` when the target
/// is empty, unparseable or internal.
pub fn normalize_target(raw: &str) -> ReconResult<ScanTarget> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReconError::InvalidInput("target domain is empty".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ReconError::InvalidInput(format!("cannot parse target '{trimmed}': {e}")))?;

    let host = match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if !RE_HOSTNAME.is_match(&domain) {
                return Err(ReconError::InvalidInput(format!("invalid hostname '{domain}'")));
            }
            if is_internal_name(&domain) {
                return Err(ReconError::InvalidInput(format!(
                    "internal host '{domain}' cannot be scanned"
                )));
            }
            domain
        }
        Some(Host::Ipv4(ip)) if is_public_ipv4(ip) => ip.to_string(),
        Some(Host::Ipv6(ip)) if is_public_ipv6(ip) => format!("[{ip}]"),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => {
            return Err(ReconError::InvalidInput(format!(
                "non-public address '{trimmed}' cannot be scanned"
            )));
        }
        None => {
            return Err(ReconError::InvalidInput(format!("target '{trimmed}' has no host")));
        }
    };

    let host = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };

    let path = url.path().trim_matches('/');
    let base_path = if path.is_empty() { None } else { Some(path.to_string()) };

    debug!(raw = trimmed, host = %host, base_path = ?base_path, "Target normalized.");
    Ok(ScanTarget { host, base_path })
}

/// Single-label names and the reserved local suffixes never reach the public internet.
fn is_internal_name(domain: &str) -> bool {
    !domain.contains('.')
        || domain == "localhost"
        || [".localhost", ".local", ".internal", ".localdomain"]
            .iter()
            .any(|suffix| domain.ends_with(suffix))
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    let shared = a == 100 && (64..=127).contains(&b);
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || shared
        || a == 0)
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_ipv4(v4);
    }
    let first = ip.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() || unique_local || link_local)
}
