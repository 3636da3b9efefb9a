//! Analysis pipeline — enrichment, scoring, and classification entry points.
//!
//! One pass per symbol: bars in, enriched series built, the last-position
//! snapshot fed to the scoring engine and the status classifier. Passes are
//! independent and share no mutable state, so callers are free to run one
//! per symbol in parallel.

pub mod classify;
pub mod score;

pub use classify::{classify, Classification, EntryZone, RiskBucket, Slope, Status};
pub use score::{score_snapshot, Contribution, ScoreResult};

use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::domain::{Bar, EnrichedSeries, IndicatorSnapshot};
use crate::indicators::{Atr, Bands, Cci, Ema, Indicator, Rsi, Sma, VolumeSma};

/// Errors from an analysis pass.
///
/// Individual missing indicators are not errors: they surface as `None` in
/// the snapshot and degrade scoring/classification gracefully.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Fewer bars than the largest required lookback. Fatal to the pass;
    /// the long-trend-dependent rules never run on partial history.
    #[error("insufficient data: got {actual} bars, need at least {required}")]
    InsufficientData { required: usize, actual: usize },

    /// The long trend average itself is undefined at the snapshot position.
    /// Without the primary directional reference there is no status.
    #[error("long trend average unavailable: insufficient history at the snapshot position")]
    TrendUnavailable,

    /// The classifier's ordered rule list matched nothing. The rule list
    /// ends in a catch-all, so reaching this is a programming defect.
    #[error("classification rules produced no match: this is a defect, not a market condition")]
    AmbiguousClassification,
}

/// The full indicator set for one analysis pass.
fn indicator_set(cfg: &AnalysisConfig) -> Vec<Box<dyn Indicator>> {
    let ind = &cfg.indicators;
    vec![
        Box::new(Sma::new(ind.trend_period)),
        Box::new(Ema::new(ind.ema_period)),
        Box::new(Rsi::new(ind.rsi_period)),
        Box::new(Cci::new(ind.cci_period)),
        Box::new(Bands::upper(ind.bands_period, ind.bands_std_dev)),
        Box::new(Bands::middle(ind.bands_period, ind.bands_std_dev)),
        Box::new(Bands::lower(ind.bands_period, ind.bands_std_dev)),
        Box::new(VolumeSma::new(ind.volume_ma_period)),
        Box::new(Atr::new(ind.atr_period)),
    ]
}

/// Compute every indicator over the bars.
///
/// Fails with `InsufficientData` when the series is shorter than the largest
/// required lookback (in practice the long trend window); the shortfall is
/// reported in the error.
pub fn enrich(bars: &[Bar], cfg: &AnalysisConfig) -> Result<EnrichedSeries, AnalysisError> {
    let required = cfg.indicators.min_bars();
    if bars.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            actual: bars.len(),
        });
    }

    let mut series = EnrichedSeries::new(bars.to_vec());
    for indicator in indicator_set(cfg) {
        let values = indicator.compute(bars);
        series.insert(indicator.name().to_string(), values);
    }
    Ok(series)
}

/// Build the last-position snapshot for a bar series.
pub fn snapshot(bars: &[Bar], cfg: &AnalysisConfig) -> Result<IndicatorSnapshot, AnalysisError> {
    Ok(enrich(bars, cfg)?.snapshot(cfg))
}

/// Classify a bar series into a trading posture.
///
/// Independent of `score_bars`; both read the same enriched view.
pub fn analyze(bars: &[Bar], cfg: &AnalysisConfig) -> Result<Classification, AnalysisError> {
    let snap = snapshot(bars, cfg)?;
    classify(&snap, &cfg.classify)
}

/// Score a bar series on the additive technical rule set.
pub fn score_bars(bars: &[Bar], cfg: &AnalysisConfig) -> Result<ScoreResult, AnalysisError> {
    let snap = snapshot(bars, cfg)?;
    Ok(score_snapshot(&snap, &cfg.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn enrich_rejects_short_series() {
        let cfg = AnalysisConfig::default();
        let bars = make_bars(&vec![100.0; 60]);
        let err = enrich(&bars, &cfg).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                required: 150,
                actual: 60
            }
        );
    }

    #[test]
    fn enrich_populates_every_series() {
        let cfg = AnalysisConfig::default();
        let bars = make_bars(&vec![100.0; 200]);
        let series = enrich(&bars, &cfg).unwrap();

        let ind = &cfg.indicators;
        for key in [
            ind.trend_key(),
            ind.ema_key(),
            ind.rsi_key(),
            ind.cci_key(),
            ind.bands_upper_key(),
            ind.bands_middle_key(),
            ind.bands_lower_key(),
            ind.volume_ma_key(),
            ind.atr_key(),
        ] {
            let values = series.get_series(&key).unwrap_or_else(|| panic!("missing series {key}"));
            assert_eq!(values.len(), 200);
        }
    }

    #[test]
    fn analyze_and_score_agree_on_trend() {
        let cfg = AnalysisConfig::default();
        // Gentle linear uptrend keeps price above a rising trend average.
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64 * 0.1).collect();
        let bars = make_bars(&closes);

        let classification = analyze(&bars, &cfg).unwrap();
        assert!(classification.is_positive);
        assert_eq!(classification.slope, Slope::Rising);

        let score = score_bars(&bars, &cfg).unwrap();
        assert!(score.score > 0.0);
    }
}
