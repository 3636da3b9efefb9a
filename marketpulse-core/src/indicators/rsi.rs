//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and losses:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), bounded 0-100.
//! Lookback: period (needs period + 1 bars for the first close-to-close change).
//! Edge cases: avg_loss == 0 -> 100; a fully flat window (both averages
//! zero) -> 50.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0 // no movement at all
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        // Close-to-close changes; NaN where either close is missing.
        let changes: Vec<f64> = (1..n)
            .map(|i| {
                let (prev, curr) = (bars[i - 1].close, bars[i].close);
                if prev.is_nan() || curr.is_nan() {
                    f64::NAN
                } else {
                    curr - prev
                }
            })
            .collect();

        // Seed averages over the first `period` changes.
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for &ch in &changes[..self.period] {
            if ch.is_nan() {
                return result;
            }
            if ch > 0.0 {
                avg_gain += ch;
            } else {
                avg_loss -= ch;
            }
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;
        result[self.period] = rsi_value(avg_gain, avg_loss);

        let alpha = 1.0 / self.period as f64;
        for i in (self.period + 1)..n {
            let ch = changes[i - 1];
            if ch.is_nan() {
                // Wilder recursion is tainted past a missing change.
                return result;
            }
            let gain = ch.max(0.0);
            let loss = (-ch).max(0.0);
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
            result[i] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}
