//! Volatility bands — moving average +/- standard deviation envelope.
//!
//! Three bands as separate named instances over the single-series trait:
//! - Middle: SMA(close, period)
//! - Upper:  middle + mult * stddev(close, period)
//! - Lower:  middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N). Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

/// Which band of the envelope to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bands {
    period: usize,
    multiplier: f64,
    band: Band,
    name: String,
}

impl Bands {
    pub fn new(period: usize, multiplier: f64, band: Band) -> Self {
        assert!(period >= 1, "band period must be >= 1");
        let tag = match band {
            Band::Upper => "upper",
            Band::Middle => "middle",
            Band::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bands_{tag}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, Band::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, Band::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, Band::Lower)
    }
}

impl Indicator for Bands {
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

        for (i, window) in bars.windows(self.period).enumerate() {
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }
            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            let value = match self.band {
                Band::Middle => mean,
                Band::Upper | Band::Lower => {
                    let var = window
                        .iter()
                        .map(|b| {
                            let d = b.close - mean;
                            d * d
                        })
                        .sum::<f64>()
                        / self.period as f64;
                    let offset = self.multiplier * var.sqrt();
                    match self.band {
                        Band::Upper => mean + offset,
                        _ => mean - offset,
                    }
                }
            };
            result[i + self.period - 1] = value;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_known_window() {
        // Window [10, 12, 14]: mean 12, population stddev = sqrt(8/3).
        let bars = make_bars(&[10.0, 12.0, 14.0]);
        let sd = (8.0_f64 / 3.0).sqrt();

        let upper = Bands::upper(3, 2.0).compute(&bars);
        let middle = Bands::middle(3, 2.0).compute(&bars);
        let lower = Bands::lower(3, 2.0).compute(&bars);

        assert_approx(middle[2], 12.0, DEFAULT_EPSILON);
        assert_approx(upper[2], 12.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(lower[2], 12.0 - 2.0 * sd, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_flat_series_collapse_to_middle() {
        let bars = make_bars(&[20.0; 6]);
        let upper = Bands::upper(4, 2.0).compute(&bars);
        let lower = Bands::lower(4, 2.0).compute(&bars);
        assert_approx(upper[5], 20.0, DEFAULT_EPSILON);
        assert_approx(lower[5], 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_ordering_holds() {
        let bars = make_bars(&[10.0, 14.0, 9.0, 16.0, 12.0, 15.0]);
        let upper = Bands::upper(4, 2.0).compute(&bars);
        let middle = Bands::middle(4, 2.0).compute(&bars);
        let lower = Bands::lower(4, 2.0).compute(&bars);
        for i in 3..bars.len() {
            assert!(upper[i] >= middle[i]);
            assert!(middle[i] >= lower[i]);
        }
    }

    #[test]
    fn bands_warmup_and_names() {
        let bars = make_bars(&[10.0, 11.0]);
        let upper = Bands::upper(3, 2.0);
        assert!(upper.compute(&bars).iter().all(|v| v.is_nan()));
        assert_eq!(upper.lookback(), 2);
        assert_eq!(upper.name(), "bands_upper_3_2");
    }
}
