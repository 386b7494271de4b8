use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sources::adapter::SourceKind;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// Top-level structure loaded from `config.toml`.
//
// Section names follow the classic INI layout of the collector
// config (`[Collector]`, `[Reddit]`, ...):
// - Output path prefixes
// - Reddit / Twitter collector settings
// - JSON series endpoints, one per source kind
//
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path prefixes for the accumulating history tables
    #[serde(rename = "Collector")]
    pub collector: CollectorPaths,

    /// Reddit collector settings and the raw-text export prefix
    #[serde(rename = "Reddit")]
    pub reddit: RedditConfig,

    /// Twitter collector settings
    #[serde(rename = "Twitter", default)]
    pub twitter: TwitterConfig,

    /// JSON time-series endpoints keyed by source kind
    #[serde(rename = "Endpoints", default)]
    pub endpoints: BTreeMap<SourceKind, EndpointConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config key {0} must not be empty")]
    Empty(&'static str),

    #[error("config key {key} = {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Endpoints.{0}.latest must be at least 1")]
    ZeroLatest(SourceKind),
}

/// Page size bounds of the Twitter v2 recent search endpoint.
const TWEET_PAGE: (u32, u32) = (10, 100);

// ------------------------------------------------------------
// Output path prefixes
// ------------------------------------------------------------
//
// IMPORTANT:
// - Prefixes are concatenated with the file name, not joined.
//   "data/btc/" + "btc_prices.csv" -> "data/btc/btc_prices.csv"
// - A missing trailing separator therefore changes the file name.
//
#[derive(Debug, Deserialize, Clone)]
pub struct CollectorPaths {
    /// Prefix for price, tweet count and volume tables
    pub in_path_btc: String,

    /// Prefix for the search trend table
    pub in_path_gtrends: String,

    /// Prefix for forex, market index and commodity tables
    pub in_path_comm: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedditConfig {
    /// Prefix for the raw tweet and comment exports
    pub data_path: String,

    #[serde(default = "default_subreddit")]
    pub subreddit: String,

    /// Number of comments requested per run
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_reddit_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TwitterConfig {
    /// API v2 bearer token. Empty disables tweet collection.
    #[serde(default)]
    pub bearer_token: String,

    #[serde(default = "default_query")]
    pub query: String,

    #[serde(default = "default_limit")]
    pub max_results: u32,

    #[serde(default = "default_twitter_url")]
    pub base_url: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: String::new(),
            query: default_query(),
            max_results: default_limit(),
            base_url: default_twitter_url(),
        }
    }
}

// ------------------------------------------------------------
// JSON series endpoint
// ------------------------------------------------------------
//
// Describes where a daily series lives inside a JSON document.
//
// Example (CoinDesk close prices):
//   url      = "https://api.coindesk.com/v1/bpi/historical/close.json"
//   layout   = "date_map"
//   pointer  = "/bpi"
//   column   = "Close Price"
//   latest   = 1
//
// Most endpoints serve a trailing window (last month, since a start
// date). Without `latest` every run appends the whole window again.
//
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub url: String,

    pub layout: SeriesLayout,

    /// JSON pointer to the series container ("" = document root)
    #[serde(default)]
    pub pointer: String,

    /// Optional JSON pointer applied to every series entry
    pub value_pointer: Option<String>,

    /// Keep only the newest N entries of the served window
    #[serde(default)]
    pub latest: Option<usize>,

    /// Output column name for the value
    pub column: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesLayout {
    /// `{ "2018-03-01": 10300.1, ... }`
    DateMap,

    /// `[{ "x": 1519862400, "y": 10300.1 }, ...]`
    Points,
}

fn default_subreddit() -> String {
    "Bitcoin".to_string()
}

fn default_limit() -> u32 {
    100
}

fn default_user_agent() -> String {
    concat!("daily-series-collector/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_reddit_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_query() -> String {
    "bitcoin".to_string()
}

fn default_twitter_url() -> String {
    "https://api.twitter.com".to_string()
}

impl Config {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&data).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates configuration text.
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(data).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let prefixes = [
            ("Collector.in_path_btc", &self.collector.in_path_btc),
            ("Collector.in_path_gtrends", &self.collector.in_path_gtrends),
            ("Collector.in_path_comm", &self.collector.in_path_comm),
            ("Reddit.data_path", &self.reddit.data_path),
        ];
        for (key, value) in prefixes {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }

        let (min, max) = TWEET_PAGE;
        if !(min..=max).contains(&self.twitter.max_results) {
            return Err(ConfigError::OutOfRange {
                key: "Twitter.max_results",
                value: self.twitter.max_results.into(),
                min: min.into(),
                max: max.into(),
            });
        }

        for (kind, endpoint) in &self.endpoints {
            if endpoint.latest == Some(0) {
                return Err(ConfigError::ZeroLatest(*kind));
            }
        }
        Ok(())
    }
}
