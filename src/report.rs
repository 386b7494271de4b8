//! Outcome of one collection run, per source.

use std::path::PathBuf;
use std::time::Duration;

use log::info;
use serde::Serialize;

use crate::collector::catalog::SourceDescriptor;
use crate::config::Config;
use crate::sources::adapter::SourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Fetched and written; `rows` is the number of fetched rows.
    Collected { rows: usize },

    /// Fetch failed, file left untouched.
    Failed { message: String, error: String },

    /// The run stopped while handling this source.
    Aborted { error: String },

    /// The run stopped before reaching this source.
    NotAttempted,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub source: SourceKind,
    pub file: PathBuf,
    #[serde(flatten)]
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<SourceOutcome>,

    /// Error that stopped the run early, if any
    pub aborted: Option<String>,

    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &SourceDescriptor, file: PathBuf, status: SourceStatus) {
        self.outcomes.push(SourceOutcome {
            source: source.kind,
            file,
            status,
        });
    }

    /// Marks the run as stopped by `error`.
    ///
    /// The first source without an outcome is the one that was being
    /// handled; every source after it was never reached.
    pub fn abort(&mut self, sources: &[SourceDescriptor], config: &Config, error: String) {
        let done = self.outcomes.len();
        for (i, source) in sources.iter().enumerate().skip(done) {
            let status = if i == done {
                SourceStatus::Aborted {
                    error: error.clone(),
                }
            } else {
                SourceStatus::NotAttempted
            };
            self.record(source, source.path(config), status);
        }
        self.aborted = Some(error);
    }

    pub fn status_of(&self, kind: SourceKind) -> Option<&SourceStatus> {
        self.outcomes
            .iter()
            .find(|o| o.source == kind)
            .map(|o| &o.status)
    }

    pub fn collected(&self) -> usize {
        self.count(|s| matches!(s, SourceStatus::Collected { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, SourceStatus::Failed { .. }))
    }

    /// Failure messages of the sources whose fetch failed, in run order.
    pub fn failure_messages(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                SourceStatus::Failed { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when every source was collected.
    pub fn is_clean(&self) -> bool {
        self.aborted.is_none() && self.failed() == 0
    }

    pub fn log_summary(&self) {
        info!(
            "run finished: collected={} failed={} aborted={} elapsed={:.1}s",
            self.collected(),
            self.failed(),
            self.aborted.is_some(),
            self.elapsed.as_secs_f64()
        );
    }

    fn count(&self, pred: impl Fn(&SourceStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}
