//! Commodity Channel Index (CCI).
//!
//! Directional-strength oscillator over typical price (H+L+C)/3:
//! CCI = (tp - SMA(tp)) / (0.015 * mean deviation). Unbounded; readings
//! around +-100..+-300 mark strong moves. Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

/// Lambert's scaling constant.
const CCI_SCALE: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    name: String,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            period,
            name: format!("cci_{period}"),
        }
    }
}

impl Indicator for Cci {
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

        let tp: Vec<f64> = bars
            .iter()
            .map(|b| {
                if b.high.is_nan() || b.low.is_nan() || b.close.is_nan() {
                    f64::NAN
                } else {
                    (b.high + b.low + b.close) / 3.0
                }
            })
            .collect();

        for i in (self.period - 1)..n {
            let window = &tp[i + 1 - self.period..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / self.period as f64;
            let mean_dev =
                window.iter().map(|v| (v - mean).abs()).sum::<f64>() / self.period as f64;
            result[i] = if mean_dev == 0.0 {
                0.0
            } else {
                (tp[i] - mean) / (CCI_SCALE * mean_dev)
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_hlc_bars(data: &[(f64, f64, f64)]) -> Vec<Bar> {
        let base_date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn cci_flat_series_is_zero() {
        let bars = make_hlc_bars(&[(10.0, 10.0, 10.0); 5]);
        let result = Cci::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 0.0, DEFAULT_EPSILON);
        assert_approx(result[4], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn cci_known_window() {
        // Typical prices: 10, 11, 15. Mean = 12, mean dev = (2+1+3)/3 = 2.
        // CCI at last = (15 - 12) / (0.015 * 2) = 100.
        let bars = make_hlc_bars(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0), (16.0, 14.0, 15.0)]);
        let result = Cci::new(3).compute(&bars);
        assert_approx(result[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn cci_sign_follows_direction() {
        let rising = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Cci::new(4).compute(&rising);
        assert!(result[4] > 0.0);

        let falling = make_bars(&[14.0, 13.0, 12.0, 11.0, 10.0]);
        let result = Cci::new(4).compute(&falling);
        assert!(result[4] < 0.0);
    }

    #[test]
    fn cci_nan_window_skipped() {
        let mut bars = make_hlc_bars(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0), (16.0, 14.0, 15.0)]);
        bars[1].high = f64::NAN;
        let result = Cci::new(3).compute(&bars);
        assert!(result[2].is_nan());
    }

    #[test]
    fn cci_lookback() {
        assert_eq!(Cci::new(20).lookback(), 19);
    }
}
