//! Data provider traits and structured error types.
//!
//! The traits abstract over the market-data source (Yahoo Finance in
//! production) so the batch runner can be exercised against mocks. Both
//! contracts require bars in strictly ascending date order — the core's
//! windowed computations are undefined otherwise.

use chrono::NaiveDate;
use marketpulse_core::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("bars for '{symbol}' are not in ascending date order")]
    UnorderedBars { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful bar fetch for one symbol.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub symbol: String,
    /// Daily bars, strictly ascending by date.
    pub bars: Vec<Bar>,
    /// Next earnings date, when the calendar had one.
    pub next_earnings: Option<NaiveDate>,
}

/// Descriptive symbol metadata, already localized display strings.
///
/// The core never parses these; they are threaded through to the output
/// sections untouched. `sector` doubles as the webhook routing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolProfile {
    pub sector: String,
    pub industry: String,
    /// One-sentence business description.
    pub summary: String,
    /// Display string such as "$3.21T".
    pub market_cap: String,
}

impl SymbolProfile {
    pub fn unknown() -> Self {
        Self {
            sector: "Unknown".into(),
            industry: "Unknown".into(),
            summary: String::new(),
            market_cap: "N/A".into(),
        }
    }
}

/// Trait for bar-fetch collaborators.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars (plus the optional next earnings date) for a symbol.
    fn fetch(&self, symbol: &str) -> Result<MarketData, DataError>;
}

/// Trait for symbol-metadata collaborators.
pub trait ProfileProvider: Send + Sync {
    /// Fetch sector, industry, business summary, and market cap.
    fn profile(&self, symbol: &str) -> Result<SymbolProfile, DataError>;
}

/// Format a raw market capitalization into a display string ($T/$B/$M).
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let Some(val) = market_cap.filter(|v| *v > 0.0) else {
        return "N/A".into();
    };
    if val >= 1e12 {
        format!("${:.2}T", val / 1e12)
    } else if val >= 1e9 {
        format!("${:.2}B", val / 1e9)
    } else if val >= 1e6 {
        format!("${:.2}M", val / 1e6)
    } else {
        format!("${val:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_cap_display_buckets() {
        assert_eq!(format_market_cap(Some(3.21e12)), "$3.21T");
        assert_eq!(format_market_cap(Some(45.6e9)), "$45.60B");
        assert_eq!(format_market_cap(Some(890.0e6)), "$890.00M");
        assert_eq!(format_market_cap(Some(125_000.0)), "$125000");
        assert_eq!(format_market_cap(None), "N/A");
        assert_eq!(format_market_cap(Some(0.0)), "N/A");
    }
}
