use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Table;

/// Logical metrics the daily run collects.
///
/// These are *logical* sources. Each collector maps a kind to
/// its own upstream API and output columns.
///
/// IMPORTANT:
/// - The snake_case name is also the key used in configuration
///   (`[Endpoints.<kind>]`) and in the run report
/// - Adding a variant requires a new entry in the source catalog
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    BtcPrice,
    TweetCount,
    Volume,
    SearchTrend,
    Forex,
    MarketIndex,
    CommodityPrice,
    RawTweets,
    RawComments,
}

impl SourceKind {
    /// Stable identifier, identical to the serde name.
    pub fn key(&self) -> &'static str {
        match self {
            SourceKind::BtcPrice => "btc_price",
            SourceKind::TweetCount => "tweet_count",
            SourceKind::Volume => "volume",
            SourceKind::SearchTrend => "search_trend",
            SourceKind::Forex => "forex",
            SourceKind::MarketIndex => "market_index",
            SourceKind::CommodityPrice => "commodity_price",
            SourceKind::RawTweets => "raw_tweets",
            SourceKind::RawComments => "raw_comments",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a single fetch produced no data.
///
/// A fetch error only ever skips the affected source; the run
/// continues with the next one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream answered HTTP {status}")]
    Status { status: u16 },

    #[error("unexpected payload: {0}")]
    Decode(String),

    #[error("missing credentials: {0}")]
    Credentials(&'static str),

    #[error("no collector configured for {0}")]
    Unsupported(SourceKind),
}

/// SeriesCollector is the seam between the orchestrator and the
/// upstream data providers.
///
/// Each implementation must:
/// - Declare which source kinds it serves
/// - Fetch the latest data for one kind per call
/// - Normalize the payload into a `Table`
///
/// CONTRACT:
/// - Accumulating kinds return a table with a `Date` column
/// - Raw-text kinds return the export table exactly as it should
///   be written
/// - Failures are reported as `FetchError`, never by panicking
///
/// THREAD SAFETY:
/// - Must be Send + Sync, instances are shared through `Arc`
///
#[async_trait::async_trait]
pub trait SeriesCollector: Send + Sync {
    /// Short collector name used in log lines.
    fn name(&self) -> &'static str;

    /// Source kinds this collector can fetch.
    fn kinds(&self) -> Vec<SourceKind>;

    /// Fetches the latest data for `kind`.
    async fn fetch(&self, kind: SourceKind) -> Result<Table, FetchError>;
}
