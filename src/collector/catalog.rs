use std::path::PathBuf;

use crate::config::Config;
use crate::sources::adapter::SourceKind;

/// How a fetched table reaches disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Load the history table, append the new rows, rewrite it.
    Append,

    /// Replace the export file with the new table, discarding history.
    Overwrite,
}

/// Which configured prefix a source's file lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPrefix {
    /// `[Collector].in_path_btc`
    Btc,
    /// `[Collector].in_path_gtrends`
    Trends,
    /// `[Collector].in_path_comm`
    Commodities,
    /// `[Reddit].data_path`
    Text,
}

impl PathPrefix {
    pub fn resolve<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            PathPrefix::Btc => &config.collector.in_path_btc,
            PathPrefix::Trends => &config.collector.in_path_gtrends,
            PathPrefix::Commodities => &config.collector.in_path_comm,
            PathPrefix::Text => &config.reddit.data_path,
        }
    }
}

/// Static description of one daily source.
#[derive(Debug, Clone, Copy)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub file: &'static str,
    pub prefix: PathPrefix,
    pub mode: WriteMode,
    /// Logged when the fetch fails
    pub failure_message: &'static str,
}

impl SourceDescriptor {
    /// Output path: prefix and file name concatenated as-is.
    pub fn path(&self, config: &Config) -> PathBuf {
        PathBuf::from(format!("{}{}", self.prefix.resolve(config), self.file))
    }
}

/// The nine daily sources, in collection order.
pub const SOURCES: [SourceDescriptor; 9] = [
    SourceDescriptor {
        kind: SourceKind::BtcPrice,
        file: "btc_prices.csv",
        prefix: PathPrefix::Btc,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting btc price",
    },
    SourceDescriptor {
        kind: SourceKind::TweetCount,
        file: "tweet_counts.csv",
        prefix: PathPrefix::Btc,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting btc tweet counts",
    },
    SourceDescriptor {
        kind: SourceKind::Volume,
        file: "btc_volume.csv",
        prefix: PathPrefix::Btc,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting btc trans. volume",
    },
    SourceDescriptor {
        kind: SourceKind::SearchTrend,
        file: "GTrendsData.csv",
        prefix: PathPrefix::Trends,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting Google trends.",
    },
    SourceDescriptor {
        kind: SourceKind::Forex,
        file: "usd_exchrate.csv",
        prefix: PathPrefix::Commodities,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting USD forex rate.",
    },
    SourceDescriptor {
        kind: SourceKind::MarketIndex,
        file: "nyse_index.csv",
        prefix: PathPrefix::Commodities,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting NYSE index.",
    },
    SourceDescriptor {
        kind: SourceKind::CommodityPrice,
        file: "oil_price.csv",
        prefix: PathPrefix::Commodities,
        mode: WriteMode::Append,
        failure_message: "Failure while collecting Oil price.",
    },
    SourceDescriptor {
        kind: SourceKind::RawTweets,
        file: "tweets.csv",
        prefix: PathPrefix::Text,
        mode: WriteMode::Overwrite,
        failure_message: "Failure while collecting tweets.",
    },
    SourceDescriptor {
        kind: SourceKind::RawComments,
        file: "reddit_comments.csv",
        prefix: PathPrefix::Text,
        mode: WriteMode::Overwrite,
        failure_message: "Failure while collecting reddit comments.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn every_kind_appears_once() {
        let kinds: BTreeSet<_> = SOURCES.iter().map(|s| s.kind).collect();
        assert_eq!(kinds.len(), SOURCES.len());
    }

    #[test]
    fn only_raw_text_sources_overwrite() {
        let overwrite: Vec<_> = SOURCES
            .iter()
            .filter(|s| s.mode == WriteMode::Overwrite)
            .map(|s| s.kind)
            .collect();
        assert_eq!(overwrite, vec![SourceKind::RawTweets, SourceKind::RawComments]);
    }

    #[test]
    fn paths_concatenate_prefix_and_file() {
        let cfg = Config::parse(
            r#"
            [Collector]
            in_path_btc = "data/btc_"
            in_path_gtrends = "data/gtrends/"
            in_path_comm = "data/comm/"

            [Reddit]
            data_path = "data/text/"
            "#,
        )
        .unwrap();

        assert_eq!(SOURCES[0].path(&cfg), PathBuf::from("data/btc_btc_prices.csv"));
        assert_eq!(SOURCES[3].path(&cfg), PathBuf::from("data/gtrends/GTrendsData.csv"));
        assert_eq!(SOURCES[8].path(&cfg), PathBuf::from("data/text/reddit_comments.csv"));
    }
}
