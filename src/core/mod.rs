// src/core/mod.rs

/// Data structures shared by the probers, the store and the HTTP layer:
/// `ScanTarget`, `ProbeResult`, `ScanReport` and the history records.
pub mod models;

/// Target normalization (scheme stripping, host/base-path split).
pub mod target;

/// The candidate catalogues the probers iterate over.
pub mod catalogue;

/// The three probers and the orchestrator that merges them into a report.
pub mod scanner;
