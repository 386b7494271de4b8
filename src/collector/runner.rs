use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use futures_util::FutureExt;
use log::{error, info, warn};

use crate::{
    collector::catalog::{SOURCES, SourceDescriptor, WriteMode},
    config::Config,
    report::{RunReport, SourceStatus},
    schema::Table,
    sources::CollectorSet,
    storage::{self, StorageError},
};

/// Runs the daily collection over the source catalog.
///
/// DESIGN:
/// - Sources are handled one after another, in catalog order
/// - A failed fetch skips only that source
/// - A storage fault (or a panicking collector) stops the run
///
/// This type does NOT:
/// - Retry failed fetches
/// - Deduplicate or order history rows
/// - Guard against concurrent runs on the same files
///
pub struct Orchestrator {
    config: Config,
    collectors: CollectorSet,
    sources: Vec<SourceDescriptor>,
}

impl Orchestrator {
    pub fn new(config: Config, collectors: CollectorSet) -> Self {
        Self {
            config,
            collectors,
            sources: SOURCES.to_vec(),
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Runs the collection and reports success.
    ///
    /// Always returns `true`, also when sources failed or the run was
    /// stopped by a storage fault. Callers that need to tell those
    /// cases apart use `run_with_report`.
    pub async fn run(&self) -> bool {
        self.run_with_report().await;
        true
    }

    /// Runs the collection and returns the status of every source.
    pub async fn run_with_report(&self) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new();

        let outcome = AssertUnwindSafe(self.collect_all(&mut report))
            .catch_unwind()
            .await;

        let fault = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{e:#}")),
            Err(panic) => Some(format!("collector panicked: {}", panic_message(&*panic))),
        };

        if let Some(fault) = fault {
            error!("{fault}");
            report.abort(&self.sources, &self.config, fault);
        }

        report.elapsed = started.elapsed();
        report.log_summary();
        report
    }

    async fn collect_all(&self, report: &mut RunReport) -> anyhow::Result<()> {
        for source in &self.sources {
            let path = source.path(&self.config);

            let table = match self.collectors.fetch(source.kind).await {
                Ok(table) => table,
                Err(err) => {
                    warn!("{} ({err})", source.failure_message);
                    report.record(
                        source,
                        path,
                        SourceStatus::Failed {
                            message: source.failure_message.to_string(),
                            error: err.to_string(),
                        },
                    );
                    continue;
                }
            };

            persist(source, &path, &table)
                .with_context(|| format!("{}: storing fetched rows failed", source.kind))?;

            info!("{}: {} rows -> {}", source.kind, table.len(), path.display());
            report.record(source, path, SourceStatus::Collected { rows: table.len() });
        }

        info!("Data Collection complete");
        Ok(())
    }
}

fn persist(source: &SourceDescriptor, path: &Path, table: &Table) -> Result<(), StorageError> {
    match source.mode {
        WriteMode::Append => storage::append_history(path, table).map(|_| ()),
        WriteMode::Overwrite => storage::overwrite_export(path, table),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
