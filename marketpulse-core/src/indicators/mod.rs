//! Indicator set — pure functions from bar history to derived numeric series.
//!
//! Every indicator returns a series the same length as its input, with the
//! first `lookback()` positions `f64::NAN` (warmup). NaN inputs propagate to
//! NaN outputs: an absent sample never gets interpolated or imputed, it just
//! leaves a hole in the derived series.

pub mod atr;
pub mod bands;
pub mod cci;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use atr::{true_range, Atr};
pub use bands::{Band, Bands};
pub use cci::Cci;
pub use ema::Ema;
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::VolumeSma;

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. No indicator value at position t may depend on bars after
/// t; the first `lookback()` values are `f64::NAN`.
pub trait Indicator: Send + Sync {
    /// Series key this indicator is stored under (e.g., "sma_150", "atr_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Plausible OHLV around each close: open = prev close (or close for the
/// first bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
