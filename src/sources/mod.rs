//! Source collector registry
//!
//! This module provides:
//! - The `SeriesCollector` abstraction (see `adapter`)
//! - Concrete collectors for JSON series, Reddit and Twitter
//! - `CollectorSet`, the kind -> collector lookup used by the runner
//!
//! All provider-specific logic must live in dedicated collector modules.
//! The orchestrator interacts exclusively through `CollectorSet`.

pub mod adapter;
pub mod json_series;
pub mod reddit;
pub mod twitter;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::Config;
use crate::schema::Table;
use adapter::{FetchError, SeriesCollector, SourceKind};

/// Maps each source kind to the collector that fetches it.
///
/// Kinds without a registered collector are not an error at build
/// time: fetching them fails with `FetchError::Unsupported`, which the
/// runner treats like any other per-source failure.
#[derive(Clone, Default)]
pub struct CollectorSet {
    by_kind: BTreeMap<SourceKind, Arc<dyn SeriesCollector>>,
}

impl CollectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `collector` for every kind it declares.
    ///
    /// A later registration for the same kind replaces the earlier one.
    pub fn register(&mut self, collector: Arc<dyn SeriesCollector>) -> &mut Self {
        for kind in collector.kinds() {
            if let Some(prev) = self.by_kind.insert(kind, collector.clone()) {
                warn!("{kind}: collector '{}' replaced by '{}'", prev.name(), collector.name());
            }
        }
        self
    }

    /// Builds the registry described by the configuration:
    /// - one JSON series collector per `[Endpoints.<kind>]`
    /// - the Reddit comments collector
    /// - the Twitter collector
    pub fn from_config(config: &Config) -> Self {
        let mut set = Self::new();

        for (kind, endpoint) in &config.endpoints {
            set.register(Arc::new(json_series::JsonSeriesCollector::new(
                *kind,
                endpoint.clone(),
            )));
        }
        set.register(Arc::new(reddit::RedditCollector::new(config.reddit.clone())));
        set.register(Arc::new(twitter::TwitterCollector::new(config.twitter.clone())));

        debug!("collectors registered for {:?}", set.kinds());
        set
    }

    pub fn kinds(&self) -> Vec<SourceKind> {
        self.by_kind.keys().copied().collect()
    }

    /// Fetches `kind` through its registered collector.
    pub async fn fetch(&self, kind: SourceKind) -> Result<Table, FetchError> {
        match self.by_kind.get(&kind) {
            Some(collector) => collector.fetch(kind).await,
            None => Err(FetchError::Unsupported(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        [Collector]
        in_path_btc = "data/btc/"
        in_path_gtrends = "data/gtrends/"
        in_path_comm = "data/comm/"

        [Reddit]
        data_path = "data/text/"

        [Endpoints.btc_price]
        url = "http://127.0.0.1:9/bpi.json"
        layout = "date_map"
        pointer = "/bpi"
        column = "Close Price"
    "#;

    #[test]
    fn registry_follows_configuration() {
        let cfg = Config::parse(CONFIG).unwrap();
        let set = CollectorSet::from_config(&cfg);

        assert_eq!(
            set.kinds(),
            vec![SourceKind::BtcPrice, SourceKind::RawTweets, SourceKind::RawComments]
        );
    }

    #[tokio::test]
    async fn unregistered_kind_is_unsupported() {
        let set = CollectorSet::new();
        let err = set.fetch(SourceKind::Forex).await.unwrap_err();
        assert!(matches!(err, FetchError::Unsupported(SourceKind::Forex)));
    }
}
