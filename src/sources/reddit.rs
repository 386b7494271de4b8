use reqwest::{Url, header::USER_AGENT};
use serde_json::Value;

use crate::{
    config::RedditConfig,
    schema::{INDEX, Table},
    util,
};

use super::adapter::{FetchError, SeriesCollector, SourceKind};

/// Latest comments of one subreddit, via the public JSON listing:
/// `GET /r/<subreddit>/comments.json?limit=<n>`
///
/// Reddit rejects requests without a descriptive User-Agent, so one
/// is always sent.
pub struct RedditCollector {
    cfg: RedditConfig,
    client: reqwest::Client,
}

impl RedditCollector {
    pub fn new(cfg: RedditConfig) -> Self {
        Self {
            cfg,
            client: util::http_client(),
        }
    }

    fn listing_url(&self) -> Result<Url, FetchError> {
        let base = format!(
            "{}/r/{}/comments.json",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.subreddit
        );
        Url::parse_with_params(&base, &[("limit", self.cfg.limit.to_string())])
            .map_err(|e| FetchError::Decode(format!("bad reddit url {base}: {e}")))
    }
}

#[async_trait::async_trait]
impl SeriesCollector for RedditCollector {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn kinds(&self) -> Vec<SourceKind> {
        vec![SourceKind::RawComments]
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Table, FetchError> {
        if kind != SourceKind::RawComments {
            return Err(FetchError::Unsupported(kind));
        }

        let resp = self
            .client
            .get(self.listing_url()?)
            .header(USER_AGENT, &self.cfg.user_agent)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
            });
        }

        let doc: Value = resp.json().await?;
        parse_comments(&doc)
    }
}

/// Converts a listing document into `Date, author, body, score` rows.
///
/// `Date` is the UTC day of `created_utc`.
pub fn parse_comments(doc: &Value) -> Result<Table, FetchError> {
    let children = doc
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Decode("listing without data.children".into()))?;

    let mut table = Table::new([INDEX, "author", "body", "score"]);

    for child in children {
        let Some(c) = child.get("data") else {
            continue;
        };

        // created_utc is a float in the listing ("1519862400.0")
        let created = c
            .get("created_utc")
            .and_then(Value::as_f64)
            .ok_or_else(|| FetchError::Decode("comment without created_utc".into()))?;
        let date = util::date_key_from_unix(created as i64)
            .ok_or_else(|| FetchError::Decode(format!("created_utc {created} out of range")))?;

        let text = |key: &str| c.get(key).and_then(util::json_cell).unwrap_or_default();

        table.push_row([date, text("author"), text("body"), text("score")]);
    }

    Ok(table)
}
