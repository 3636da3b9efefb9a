//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from the v8 chart API and earnings/profile
//! metadata from the v10 quoteSummary API. Handles rate limiting and retries
//! with exponential backoff. Yahoo has no official API and is subject to
//! unannounced format changes; parse failures surface as
//! `ResponseFormatChanged` rather than panics.

use std::time::Duration;

use chrono::NaiveDate;
use marketpulse_core::Bar;
use serde::Deserialize;
use tracing::debug;

use super::provider::{
    format_market_cap, BarProvider, DataError, MarketData, ProfileProvider, SymbolProfile,
};

// ── Chart API response ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

// ── quoteSummary API response ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(rename = "calendarEvents")]
    calendar_events: Option<CalendarEvents>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceData>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    earnings: Option<EarningsCalendar>,
}

#[derive(Debug, Deserialize)]
struct EarningsCalendar {
    #[serde(rename = "earningsDate", default)]
    earnings_date: Vec<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
    #[serde(rename = "longBusinessSummary")]
    long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawFloat>,
    #[serde(rename = "quoteType")]
    quote_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFloat {
    raw: Option<f64>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Yahoo Finance client implementing both provider traits.
pub struct YahooClient {
    client: reqwest::blocking::Client,
    /// Chart range parameter, e.g. "1y".
    range: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooClient {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            range: "1y".into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?range={}&interval=1d",
            self.range
        )
    }

    fn quote_summary_url(symbol: &str, modules: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{symbol}\
             ?modules={modules}"
        )
    }

    /// Parse the chart API response into ascending, deduplicated bars.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // All-None rows are non-trading days; leave no hole in the series.
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            bars.push(Bar {
                symbol: symbol.to_string(),
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        if !marketpulse_core::domain::is_strictly_ordered(&bars) {
            return Err(DataError::UnorderedBars {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    /// Next earnings date from the calendar, if any future date is listed.
    fn parse_earnings(resp: QuoteSummaryResponse, today: NaiveDate) -> Option<NaiveDate> {
        let data = resp.quote_summary.result?.into_iter().next()?;
        data.calendar_events?
            .earnings?
            .earnings_date
            .iter()
            .filter_map(|v| v.raw)
            .filter_map(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.naive_utc().date())
            .filter(|d| *d > today)
            .min()
    }

    fn parse_profile(symbol: &str, resp: QuoteSummaryResponse) -> SymbolProfile {
        let Some(data) = resp.quote_summary.result.and_then(|r| r.into_iter().next()) else {
            return SymbolProfile::unknown();
        };

        let is_crypto = data
            .price
            .as_ref()
            .and_then(|p| p.quote_type.as_deref())
            .is_some_and(|t| t == "CRYPTOCURRENCY");

        let (mut sector, mut industry, summary) = match data.asset_profile {
            Some(profile) => (
                profile.sector.unwrap_or_else(|| "Unknown".into()),
                profile.industry.unwrap_or_else(|| "Unknown".into()),
                profile
                    .long_business_summary
                    .map(|s| first_sentence(&s))
                    .unwrap_or_default(),
            ),
            None => ("Unknown".into(), "Unknown".into(), String::new()),
        };
        if is_crypto {
            sector = "Crypto".into();
            industry = "Crypto".into();
        }

        let market_cap = format_market_cap(
            data.price
                .and_then(|p| p.market_cap)
                .and_then(|m| m.raw),
        );

        debug!(%symbol, %sector, %market_cap, "fetched profile");
        SymbolProfile {
            sector,
            industry,
            summary,
            market_cap,
        }
    }

    /// Execute one GET with retry and exponential backoff, then parse JSON.
    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(DataError::Other(format!("HTTP {status} for {url}")));
                        continue;
                    }

                    return resp.json::<T>().map_err(|e| {
                        DataError::ResponseFormatChanged(format!("failed to parse response: {e}"))
                    });
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("retries exhausted".into())))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BarProvider for YahooClient {
    fn name(&self) -> &str {
        "yahoo-finance"
    }

    fn fetch(&self, symbol: &str) -> Result<MarketData, DataError> {
        let chart: ChartResponse = self.get_json(&self.chart_url(symbol))?;
        let bars = Self::parse_chart(symbol, chart)?;

        // The earnings calendar is best-effort: a missing or malformed
        // calendar never fails the bar fetch.
        let today = chrono::Utc::now().naive_utc().date();
        let next_earnings = self
            .get_json::<QuoteSummaryResponse>(&Self::quote_summary_url(symbol, "calendarEvents"))
            .ok()
            .and_then(|resp| Self::parse_earnings(resp, today));

        debug!(%symbol, bars = bars.len(), ?next_earnings, "fetched market data");
        Ok(MarketData {
            symbol: symbol.to_string(),
            bars,
            next_earnings,
        })
    }
}

impl ProfileProvider for YahooClient {
    fn profile(&self, symbol: &str) -> Result<SymbolProfile, DataError> {
        let resp: QuoteSummaryResponse =
            self.get_json(&Self::quote_summary_url(symbol, "assetProfile,price"))?;
        Ok(Self::parse_profile(symbol, resp))
    }
}

/// First sentence of a description, period included.
fn first_sentence(text: &str) -> String {
    match text.split_once(". ") {
        Some((first, _)) => format!("{first}."),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_json() -> &'static str {
        r#"{
            "chart": {
                "result": [{
                    "timestamp": [1735776000, 1735862400, 1736035200],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, 102.0, null],
                            "high":   [105.0, 104.0, null],
                            "low":    [99.0, 100.5, null],
                            "close":  [102.0, 101.0, null],
                            "volume": [1000000, 900000, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#
    }

    #[test]
    fn chart_parsing_skips_empty_rows_and_orders_bars() {
        let resp: ChartResponse = serde_json::from_str(chart_json()).unwrap();
        let bars = YahooClient::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 2); // the all-null row is dropped
        assert!(bars[0].date < bars[1].date);
        assert_eq!(bars[0].close, 102.0);
        assert_eq!(bars[1].volume, 900_000);
        assert_eq!(bars[0].symbol, "AAPL");
    }

    #[test]
    fn chart_error_maps_to_symbol_not_found() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            YahooClient::parse_chart("NOPE", resp),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn earnings_picks_earliest_future_date() {
        let resp: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": [{
                "calendarEvents": {"earnings": {"earningsDate": [
                    {"raw": 1767139200},
                    {"raw": 1759276800}
                ]}}
            }]}}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        // 1759276800 = 2025-10-01, 1767139200 = 2025-12-30
        assert_eq!(
            YahooClient::parse_earnings(resp, today),
            NaiveDate::from_ymd_opt(2025, 10, 1)
        );
    }

    #[test]
    fn earnings_ignores_past_dates() {
        let resp: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": [{
                "calendarEvents": {"earnings": {"earningsDate": [{"raw": 1759276800}]}}
            }]}}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(YahooClient::parse_earnings(resp, today), None);
    }

    #[test]
    fn profile_parsing_with_crypto_override() {
        let resp: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": [{
                "assetProfile": {
                    "sector": "Technology",
                    "industry": "Consumer Electronics",
                    "longBusinessSummary": "Apple designs smartphones. It also sells services."
                },
                "price": {"marketCap": {"raw": 3210000000000.0}, "quoteType": "EQUITY"}
            }]}}"#,
        )
        .unwrap();
        let profile = YahooClient::parse_profile("AAPL", resp);
        assert_eq!(profile.sector, "Technology");
        assert_eq!(profile.summary, "Apple designs smartphones.");
        assert_eq!(profile.market_cap, "$3.21T");

        let crypto: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": [{
                "price": {"marketCap": {"raw": 1200000000000.0}, "quoteType": "CRYPTOCURRENCY"}
            }]}}"#,
        )
        .unwrap();
        let profile = YahooClient::parse_profile("BTC-USD", crypto);
        assert_eq!(profile.sector, "Crypto");
        assert_eq!(profile.industry, "Crypto");
        assert_eq!(profile.market_cap, "$1.20T");
    }

    #[test]
    fn missing_profile_falls_back_to_unknown() {
        let resp: QuoteSummaryResponse =
            serde_json::from_str(r#"{"quoteSummary": {"result": null}}"#).unwrap();
        assert_eq!(
            YahooClient::parse_profile("X", resp),
            SymbolProfile::unknown()
        );
    }
}
