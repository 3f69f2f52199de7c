// src/lib.rs

//! Domain reconnaissance scanner: probes sensitive routes, common subdomains and
//! slug candidates of a target, and serves the results over HTTP with a
//! per-user scan history.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod logging;
pub mod store;

pub use crate::core::models::{ProbeKind, ProbeResult, ScanReport, ScanTarget};
pub use crate::core::scanner::Scanner;
pub use crate::error::{ReconError, ReconResult};
