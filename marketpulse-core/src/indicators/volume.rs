//! Rolling volume average.
//!
//! Simple arithmetic mean of volume over the window, used by the scoring
//! engine's above-average-volume rule. Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::sma::rolling_mean;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_mean(bars, self.period, |b| b.volume as f64)
    }
}
