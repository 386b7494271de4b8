use reqwest::Url;
use serde_json::Value;

use crate::{config::TwitterConfig, schema::Table, util};

use super::adapter::{FetchError, SeriesCollector, SourceKind};

/// Recent tweets matching a search query (Twitter API v2).
///
/// Endpoint:
///   GET /2/tweets/search/recent?query=..&max_results=..&tweet.fields=created_at
///
/// AUTH:
/// - Bearer token from `[Twitter].bearer_token`
/// - An empty token fails the fetch without a request
pub struct TwitterCollector {
    cfg: TwitterConfig,
    client: reqwest::Client,
}

impl TwitterCollector {
    pub fn new(cfg: TwitterConfig) -> Self {
        Self {
            cfg,
            client: util::http_client(),
        }
    }

    fn search_url(&self) -> Result<Url, FetchError> {
        let base = format!(
            "{}/2/tweets/search/recent",
            self.cfg.base_url.trim_end_matches('/')
        );
        Url::parse_with_params(
            &base,
            &[
                ("query", self.cfg.query.clone()),
                ("max_results", self.cfg.max_results.to_string()),
                ("tweet.fields", "created_at".to_string()),
            ],
        )
        .map_err(|e| FetchError::Decode(format!("bad twitter url {base}: {e}")))
    }
}

#[async_trait::async_trait]
impl SeriesCollector for TwitterCollector {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn kinds(&self) -> Vec<SourceKind> {
        vec![SourceKind::RawTweets]
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Table, FetchError> {
        if kind != SourceKind::RawTweets {
            return Err(FetchError::Unsupported(kind));
        }
        if self.cfg.bearer_token.trim().is_empty() {
            return Err(FetchError::Credentials("Twitter.bearer_token"));
        }

        let resp = self
            .client
            .get(self.search_url()?)
            .bearer_auth(&self.cfg.bearer_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
            });
        }

        let doc: Value = resp.json().await?;
        parse_tweets(&doc)
    }
}

/// Converts a search response into `created_at, id, text` rows.
///
/// A response without `data` (zero matches) is an empty table.
pub fn parse_tweets(doc: &Value) -> Result<Table, FetchError> {
    let mut table = Table::new(["created_at", "id", "text"]);

    let Some(data) = doc.get("data") else {
        return Ok(table);
    };
    let tweets = data
        .as_array()
        .ok_or_else(|| FetchError::Decode("tweet data is not an array".into()))?;

    for tweet in tweets {
        let field = |key: &str| tweet.get(key).and_then(util::json_cell).unwrap_or_default();
        table.push_row([field("created_at"), field("id"), field("text")]);
    }

    Ok(table)
}
