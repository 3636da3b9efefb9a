//! Indicator snapshot — the last-position view fed to scoring and classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every derived value evaluated at the final bar of an enriched series.
///
/// Each indicator value is either defined (`Some`) or explicitly unavailable
/// (`None`, still inside its warmup window). Consumers treat `None` as "rule
/// does not fire" — the one exception is the long trend average, without
/// which classification cannot proceed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub date: NaiveDate,
    /// Closing price of the final bar.
    pub close: f64,
    /// Volume of the final bar.
    pub volume: u64,
    /// Long trend simple moving average.
    pub trend: Option<f64>,
    /// Trend average `slope_lookback` bars earlier (slope input).
    pub trend_past: Option<f64>,
    /// Medium-term exponential moving average.
    pub ema: Option<f64>,
    /// Bounded oscillator, 0-100.
    pub rsi: Option<f64>,
    /// Directional-strength oscillator, unbounded.
    pub cci: Option<f64>,
    /// Upper volatility band.
    pub bands_upper: Option<f64>,
    /// Rolling volume average.
    pub volume_ma: Option<f64>,
    /// True-range volatility (absolute).
    pub atr: Option<f64>,
    /// Local resistance: maximum high over the resistance window.
    pub resistance: Option<f64>,
}

impl IndicatorSnapshot {
    /// ATR as a percentage of the closing price, when both are usable.
    pub fn atr_pct(&self) -> Option<f64> {
        match self.atr {
            Some(atr) if self.close > 0.0 => Some(atr / self.close * 100.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn bare_snapshot(close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            close,
            volume: 1_000,
            trend: None,
            trend_past: None,
            ema: None,
            rsi: None,
            cci: None,
            bands_upper: None,
            volume_ma: None,
            atr: None,
            resistance: None,
        }
    }

    #[test]
    fn atr_pct_requires_both_inputs() {
        let mut snap = bare_snapshot(200.0);
        assert_eq!(snap.atr_pct(), None);
        snap.atr = Some(10.0);
        assert_eq!(snap.atr_pct(), Some(5.0));
        snap.close = 0.0;
        assert_eq!(snap.atr_pct(), None);
    }
}
