//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (period + 1). Seed: SMA of the first `period` closes.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        // Seed: SMA of first `period` closes. A NaN in the seed window means
        // no valid seed, so the whole output stays NaN.
        let mut sum = 0.0;
        for bar in &bars[..self.period] {
            if bar.close.is_nan() {
                return result;
            }
            sum += bar.close;
        }
        let mut prev = sum / self.period as f64;
        result[self.period - 1] = prev;

        let alpha = 2.0 / (self.period as f64 + 1.0);
        for i in self.period..n {
            if bars[i].close.is_nan() {
                // The recursion is tainted from here on.
                return result;
            }
            prev = alpha * bars[i].close + (1.0 - alpha) * prev;
            result[i] = prev;
        }

        result
    }
}
