/// Collector module
///
/// This module groups the daily collection run:
/// - `catalog`: the fixed, ordered list of sources and their files
/// - `runner`:  the orchestrator that fetches and persists each source
///
/// The collector layer sits between:
/// - Source collectors (JSON series, Reddit, Twitter, ...)
/// - The CSV storage layer
///
/// Design notes:
/// - Provider-specific logic MUST NOT live here
/// - Control flow is strictly sequential, one source at a time
pub mod catalog;
pub mod runner;
