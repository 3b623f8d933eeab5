use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Bar, Error, Result};

use crate::provider::MarketData;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Market-data client for the Yahoo Finance v8 chart API.
///
/// Returns whatever history the endpoint has for the requested range; rows
/// with null OHLC entries (provider gaps) are skipped. A response without a
/// chart result maps to an empty series, which the loop treats as
/// "temporarily unavailable".
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .use_rustls_tls()
                .user_agent("goldbot/0.1")
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn fetch_bars(&self, symbol: &str, interval: &str, range: &str) -> Result<Vec<Bar>> {
        let url = format!(
            "{BASE_URL}/v8/finance/chart/{symbol}?interval={interval}&range={range}"
        );

        debug!(symbol = %symbol, interval = %interval, range = %range, "Fetching bars");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::MarketData(format!("HTTP {status}: {body}")));
        }

        parse_chart(&body)
    }
}

// ─── Yahoo chart JSON parsing ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Deserialize)]
struct ChartNode {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let resp: ChartResponse = serde_json::from_str(body)?;

    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &unix) in result.timestamp.iter().enumerate() {
        let row = (
            field(&quote.open, i),
            field(&quote.high, i),
            field(&quote.low, i),
            field(&quote.close, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            continue; // provider gap, skip the row
        };
        let Some(timestamp) = Utc.timestamp_opt(unix, 0).single() else {
            continue;
        };
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
        });
    }
    Ok(bars)
}

fn field(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_rows_in_order() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1709535600, 1709535900],
                    "indicators": {
                        "quote": [{
                            "open":  [2150.0, 2151.0],
                            "high":  [2152.0, 2153.5],
                            "low":   [2149.5, 2150.5],
                            "close": [2151.0, 2153.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let bars = parse_chart(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 2151.0);
        assert_eq!(bars[1].high, 2153.5);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn skips_null_rows() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1709535600, 1709535900, 1709536200],
                    "indicators": {
                        "quote": [{
                            "open":  [2150.0, null, 2152.0],
                            "high":  [2152.0, null, 2154.0],
                            "low":   [2149.5, null, 2151.0],
                            "close": [2151.0, null, 2153.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let bars = parse_chart(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 2153.0);
    }

    #[test]
    fn missing_result_is_an_empty_series() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_chart("{not json").is_err());
    }
}
