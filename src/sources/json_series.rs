use serde_json::Value;

use crate::{
    config::{EndpointConfig, SeriesLayout},
    schema::{INDEX, Table},
    util,
};

use super::adapter::{FetchError, SeriesCollector, SourceKind};

/// Generic daily time-series collector backed by a JSON endpoint.
///
/// One instance serves exactly one source kind. The endpoint
/// configuration tells it where the series sits in the document and
/// how entries are shaped (see `SeriesLayout`).
///
/// Typical endpoints:
/// - CoinDesk historical close (`date_map` under `/bpi`)
/// - blockchain.info charts (`points` under `/values`)
/// - exchange-rate timeseries (`date_map` + `value_pointer`)
///
/// DESIGN:
/// - Pure protocol translation
/// - One GET per fetch, no paging, no retry
pub struct JsonSeriesCollector {
    kind: SourceKind,
    endpoint: EndpointConfig,
    client: reqwest::Client,
}

impl JsonSeriesCollector {
    pub fn new(kind: SourceKind, endpoint: EndpointConfig) -> Self {
        Self {
            kind,
            endpoint,
            client: util::http_client(),
        }
    }
}

#[async_trait::async_trait]
impl SeriesCollector for JsonSeriesCollector {
    fn name(&self) -> &'static str {
        "json-series"
    }

    fn kinds(&self) -> Vec<SourceKind> {
        vec![self.kind]
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Table, FetchError> {
        if kind != self.kind {
            return Err(FetchError::Unsupported(kind));
        }

        let resp = self.client.get(&self.endpoint.url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
            });
        }

        let doc: Value = resp.json().await?;
        parse_series(&doc, &self.endpoint)
    }
}

/// Extracts a `Date` + value table from a JSON document.
///
/// With `latest` set, only the newest entries survive: the last keys
/// of a `date_map`, the last elements of a `points` array.
pub fn parse_series(doc: &Value, endpoint: &EndpointConfig) -> Result<Table, FetchError> {
    let series = doc.pointer(&endpoint.pointer).ok_or_else(|| {
        FetchError::Decode(format!("nothing at pointer '{}'", endpoint.pointer))
    })?;

    let mut table = Table::new([INDEX, endpoint.column.as_str()]);

    match endpoint.layout {
        // -----------------------------
        // { "<date>": value }
        // -----------------------------
        SeriesLayout::DateMap => {
            let entries = series
                .as_object()
                .ok_or_else(|| FetchError::Decode("date_map series is not an object".into()))?;

            let mut dated: Vec<_> = entries.iter().collect();
            dated.sort_by(|a, b| a.0.cmp(b.0));

            for (date, entry) in dated {
                let value = entry_value(entry, endpoint)?;
                table.push_row([date.clone(), value]);
            }
        }

        // -----------------------------
        // [{ "x": unix, "y": value }]
        // -----------------------------
        SeriesLayout::Points => {
            let points = series
                .as_array()
                .ok_or_else(|| FetchError::Decode("points series is not an array".into()))?;

            for point in points {
                let secs = point
                    .get("x")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| FetchError::Decode("point without integer 'x'".into()))?;
                let date = util::date_key_from_unix(secs)
                    .ok_or_else(|| FetchError::Decode(format!("timestamp {secs} out of range")))?;
                let y = point
                    .get("y")
                    .ok_or_else(|| FetchError::Decode("point without 'y'".into()))?;
                table.push_row([date, entry_value(y, endpoint)?]);
            }
        }
    }

    if let Some(n) = endpoint.latest {
        table.keep_last(n);
    }

    Ok(table)
}

fn entry_value(entry: &Value, endpoint: &EndpointConfig) -> Result<String, FetchError> {
    let target = match &endpoint.value_pointer {
        Some(ptr) => entry
            .pointer(ptr)
            .ok_or_else(|| FetchError::Decode(format!("nothing at value pointer '{ptr}'")))?,
        None => entry,
    };

    util::json_cell(target).ok_or_else(|| {
        FetchError::Decode(format!("value for '{}' is not a scalar", endpoint.column))
    })
}
