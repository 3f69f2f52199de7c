// src/config.rs

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::BearerTokenAuth;
use crate::core::catalogue::Catalogue;
use crate::core::scanner::Scanner;
use crate::core::scanner::probe_client::HttpProbeClient;
use crate::error::{ReconError, ReconResult};

/// Upper bound for the `limit` query parameter of the history endpoint.
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Parser)]
#[command(name = "arcanum-recon", version, about = "Domain reconnaissance scanner service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Scan one target and print the report as JSON.
    Scan(ScanArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    /// Per-probe timeout in seconds.
    #[arg(long, env = "ARCANUM_RECON_PROBE_TIMEOUT", default_value_t = 4)]
    pub probe_timeout: u64,

    /// Maximum in-flight probes per prober.
    #[arg(long, env = "ARCANUM_RECON_MAX_CONCURRENCY", default_value_t = 16)]
    pub max_concurrency: usize,

    /// JSON file replacing the built-in catalogues.
    #[arg(long, env = "ARCANUM_RECON_CATALOGUE")]
    pub catalogue: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "ARCANUM_RECON_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    #[arg(long, env = "ARCANUM_RECON_DATABASE_URL", default_value = "sqlite://arcanum-recon.db")]
    pub database_url: String,

    #[arg(long, env = "ARCANUM_RECON_DB_CONNECTIONS", default_value_t = 5)]
    pub db_connections: u32,

    /// Accepted API tokens as comma separated `user:token` pairs.
    #[arg(long, env = "ARCANUM_RECON_TOKENS", value_delimiter = ',')]
    pub tokens: Vec<String>,

    /// History entries returned when the caller gives no `limit`.
    #[arg(long, env = "ARCANUM_RECON_HISTORY_LIMIT", default_value_t = 20)]
    pub history_limit: usize,

    /// Maximum accepted request body, in bytes.
    #[arg(long, env = "ARCANUM_RECON_BODY_LIMIT", default_value_t = 16 * 1024)]
    pub body_limit: usize,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Host or host/path to scan, with or without scheme.
    pub target: String,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

/// Validated probing settings.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub max_concurrency: usize,
    pub catalogue: Catalogue,
}

impl ProbeConfig {
    pub fn from_args(args: &ProbeArgs) -> ReconResult<Self> {
        if !(1..=30).contains(&args.probe_timeout) {
            return Err(ReconError::Config(format!(
                "probe timeout must be between 1 and 30 seconds, got {}",
                args.probe_timeout
            )));
        }
        if args.max_concurrency == 0 {
            return Err(ReconError::Config("max concurrency must be at least 1".to_string()));
        }
        let catalogue = match &args.catalogue {
            Some(path) => Catalogue::load(path)?,
            None => Catalogue::default(),
        };
        Ok(Self {
            timeout: Duration::from_secs(args.probe_timeout),
            max_concurrency: args.max_concurrency,
            catalogue,
        })
    }

    /// Builds a scanner backed by the real HTTP client.
    pub fn build_scanner(&self) -> ReconResult<Scanner> {
        let client = HttpProbeClient::new(self.timeout)?;
        Ok(Scanner::new(Arc::new(client), self.catalogue.clone())
            .with_max_concurrency(self.max_concurrency))
    }
}

/// Validated service settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database_url: String,
    pub db_connections: u32,
    pub auth: BearerTokenAuth,
    pub history_limit: usize,
    pub body_limit: usize,
    pub probe: ProbeConfig,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> ReconResult<Self> {
        let auth = BearerTokenAuth::from_pairs(&args.tokens)?;
        if args.history_limit == 0 || args.history_limit > MAX_HISTORY_LIMIT {
            return Err(ReconError::Config(format!(
                "history limit must be between 1 and {MAX_HISTORY_LIMIT}"
            )));
        }
        Ok(Self {
            bind: args.bind,
            database_url: args.database_url.clone(),
            db_connections: args.db_connections,
            auth,
            history_limit: args.history_limit,
            body_limit: args.body_limit,
            probe: ProbeConfig::from_args(&args.probe)?,
        })
    }
}
