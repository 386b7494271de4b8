// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// - config:    Configuration structs loaded from TOML
// - schema:    In-memory table exchanged between collectors and storage
// - util:      Shared helpers (HTTP client, date keys, JSON cells)
// - sources:   Source collectors and the collector registry
// - storage:   CSV history tables and flat exports
// - collector: Source catalog and the daily orchestrator
// - report:    Per-source outcome of one run
//
pub mod config;
pub mod schema;
pub mod util;
pub mod sources;
pub mod storage;
pub mod collector;
pub mod report;

pub use collector::runner::Orchestrator;
pub use config::Config;
pub use report::RunReport;
pub use sources::CollectorSet;
