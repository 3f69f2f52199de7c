// src/core/catalogue.rs

//! The candidate lists the probers iterate over.
//!
//! The built-in lists below are plain data. A JSON file can replace any of them
//! at startup, and tests inject small synthetic catalogues directly.

use crate::error::{ReconError, ReconResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One sensitive path together with its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Path relative to the host root, always starting with `/`.
    pub path: String,
    /// Short tag describing what the path exposes (e.g. "config", "vcs").
    pub kind: String,
}

impl RouteEntry {
    pub fn new(path: &str, kind: &str) -> Self {
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };
        Self { path, kind: kind.to_string() }
    }
}

/// Number of suffixes generated for the slug prober by default.
pub const DEFAULT_SLUG_COUNT: usize = 10;

static DEFAULT_ROUTES: &[(&str, &str)] = &[
    // --- CMS / admin panels ---
    ("/wp-admin", "cms"),
    ("/wp-login.php", "cms"),
    ("/administrator", "admin"),
    ("/admin", "admin"),
    ("/phpmyadmin", "database"),
    // --- Configuration & secrets ---
    ("/.env", "config"),
    ("/config.php", "config"),
    ("/.htaccess", "config"),
    ("/web.config", "config"),
    // --- Version control ---
    ("/.git/config", "vcs"),
    ("/.git/HEAD", "vcs"),
    ("/.svn/entries", "vcs"),
    // --- Backups ---
    ("/backup.zip", "backup"),
    ("/backup.sql", "backup"),
    ("/db.sql", "backup"),
    // --- Diagnostics ---
    ("/server-status", "diagnostics"),
    ("/phpinfo.php", "diagnostics"),
    ("/debug", "diagnostics"),
    ("/.DS_Store", "metadata"),
    // --- APIs ---
    ("/api", "api"),
    ("/graphql", "api"),
    ("/swagger.json", "api"),
];

static DEFAULT_SUBDOMAINS: &[&str] = &[
    "www", "api", "blog", "admin", "shop", "app", "dev", "staging", "test", "mail", "portal",
    "cdn", "static", "beta", "painel", "members", "checkout", "pay",
];

static DEFAULT_CATALOGUE: Lazy<Catalogue> = Lazy::new(|| Catalogue {
    sensitive_routes: default_routes(),
    subdomains: default_subdomains(),
    slug_suffixes: generate_slug_suffixes(DEFAULT_SLUG_COUNT),
});

/// The three candidate lists, one per prober.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default = "default_routes")]
    pub sensitive_routes: Vec<RouteEntry>,
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,
    #[serde(default = "default_slug_suffixes")]
    pub slug_suffixes: Vec<String>,
}

impl Default for Catalogue {
    fn default() -> Self {
        DEFAULT_CATALOGUE.clone()
    }
}

impl Catalogue {
    /// Parses a catalogue from JSON. Keys that are missing keep their built-in lists.
    pub fn from_json(raw: &str) -> ReconResult<Self> {
        let catalogue: Catalogue = serde_json::from_str(raw)
            .map_err(|e| ReconError::Config(format!("invalid catalogue: {e}")))?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Loads a catalogue file from disk.
    pub fn load(path: &Path) -> ReconResult<Self> {
        debug!(path = %path.display(), "Reading catalogue file.");
        let raw = std::fs::read_to_string(path)?;
        let catalogue = Self::from_json(&raw)?;
        info!(
            routes = catalogue.sensitive_routes.len(),
            subdomains = catalogue.subdomains.len(),
            slugs = catalogue.slug_suffixes.len(),
            "Catalogue loaded."
        );
        Ok(catalogue)
    }

    fn validate(&self) -> ReconResult<()> {
        if let Some(entry) = self.sensitive_routes.iter().find(|e| !e.path.starts_with('/')) {
            return Err(ReconError::Config(format!(
                "sensitive route '{}' must start with '/'",
                entry.path
            )));
        }
        if let Some(prefix) = self
            .subdomains
            .iter()
            .find(|p| p.is_empty() || p.contains('.') || p.contains('/'))
        {
            return Err(ReconError::Config(format!("invalid subdomain prefix '{prefix}'")));
        }
        if let Some(suffix) = self.slug_suffixes.iter().find(|s| s.trim_matches('/').is_empty()) {
            return Err(ReconError::Config(format!("invalid slug suffix '{suffix}'")));
        }
        Ok(())
    }
}

fn default_routes() -> Vec<RouteEntry> {
    DEFAULT_ROUTES.iter().map(|(path, kind)| RouteEntry::new(path, kind)).collect()
}

fn default_subdomains() -> Vec<String> {
    DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect()
}

fn default_slug_suffixes() -> Vec<String> {
    generate_slug_suffixes(DEFAULT_SLUG_COUNT)
}

/// `a1`, `a2`, ... `a{count}`.
pub fn generate_slug_suffixes(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("a{i}")).collect()
}
