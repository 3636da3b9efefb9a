//! Simple Moving Average (SMA).
//!
//! Rolling arithmetic mean of close prices. This is the long trend average
//! when run over the trend window. Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_mean(bars, self.period, |b| b.close)
    }
}

/// Rolling arithmetic mean of an extracted bar field.
///
/// A window containing any NaN yields NaN for that position. Shared by the
/// close-price SMA and the volume average.
pub(crate) fn rolling_mean(bars: &[Bar], period: usize, field: impl Fn(&Bar) -> f64) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![f64::NAN; n];
    if n < period {
        return result;
    }

    for (i, window) in bars.windows(period).enumerate() {
        let mut sum = 0.0;
        let mut has_nan = false;
        for bar in window {
            let v = field(bar);
            if v.is_nan() {
                has_nan = true;
                break;
            }
            sum += v;
        }
        if !has_nan {
            result[i + period - 1] = sum / period as f64;
        }
    }

    result
}
