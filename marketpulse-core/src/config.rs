//! Analysis configuration.
//!
//! Every threshold, window, and weight used by the indicator set, scoring
//! engine, and status classifier lives here. `Default` impls hold the
//! canonical values; the runner may override any field via its TOML config.

use serde::{Deserialize, Serialize};

/// Indicator windows and parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Long trend simple moving average window (multi-month trend).
    pub trend_period: usize,
    /// Medium-term exponential moving average window.
    pub ema_period: usize,
    /// Bounded oscillator (RSI) window.
    pub rsi_period: usize,
    /// Directional-strength oscillator (CCI) window.
    pub cci_period: usize,
    /// Volatility band (Bollinger) window.
    pub bands_period: usize,
    /// Standard deviation multiplier for the volatility bands.
    pub bands_std_dev: f64,
    /// Rolling volume average window.
    pub volume_ma_period: usize,
    /// True-range volatility (ATR) window.
    pub atr_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            trend_period: 150,
            ema_period: 50,
            rsi_period: 14,
            cci_period: 20,
            bands_period: 20,
            bands_std_dev: 2.0,
            volume_ma_period: 20,
            atr_period: 14,
        }
    }
}

impl IndicatorConfig {
    /// The largest lookback any indicator in the set requires.
    ///
    /// `enrich()` rejects series shorter than this; in practice the long
    /// trend window dominates every other indicator.
    pub fn min_bars(&self) -> usize {
        self.trend_period
            .max(self.ema_period)
            .max(self.rsi_period + 1)
            .max(self.cci_period)
            .max(self.bands_period)
            .max(self.volume_ma_period)
            .max(self.atr_period + 1)
    }

    // Series key helpers: enrich() inserts under these names and the
    // snapshot reads them back, so both sides must agree.

    pub fn trend_key(&self) -> String {
        format!("sma_{}", self.trend_period)
    }

    pub fn ema_key(&self) -> String {
        format!("ema_{}", self.ema_period)
    }

    pub fn rsi_key(&self) -> String {
        format!("rsi_{}", self.rsi_period)
    }

    pub fn cci_key(&self) -> String {
        format!("cci_{}", self.cci_period)
    }

    pub fn bands_upper_key(&self) -> String {
        format!("bands_upper_{}_{}", self.bands_period, self.bands_std_dev)
    }

    pub fn bands_middle_key(&self) -> String {
        format!("bands_middle_{}_{}", self.bands_period, self.bands_std_dev)
    }

    pub fn bands_lower_key(&self) -> String {
        format!("bands_lower_{}_{}", self.bands_period, self.bands_std_dev)
    }

    pub fn volume_ma_key(&self) -> String {
        format!("volume_sma_{}", self.volume_ma_period)
    }

    pub fn atr_key(&self) -> String {
        format!("atr_{}", self.atr_period)
    }
}

/// Scoring engine weights and bands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreConfig {
    /// Upper bound of the reported score.
    pub max_score: f64,
    /// Deviation band (percent above the trend average) that still counts
    /// as a fresh crossover.
    pub crossover_pct: f64,
    /// Bonus for price just above the long trend average (crossover entry).
    pub trend_crossover_bonus: f64,
    /// Smaller bonus for price well above the trend average (established trend).
    pub trend_established_bonus: f64,
    /// Bonus for price above the medium-term EMA.
    pub ema_bonus: f64,
    /// Bonus for the bounded oscillator inside its optimal band.
    pub rsi_optimal_bonus: f64,
    /// Bonus for volume above its rolling average.
    pub volume_bonus: f64,
    /// Bonus for the directional-strength oscillator inside its strong band.
    pub cci_strong_bonus: f64,
    /// Penalty (negative) for the bounded oscillator in overbought/oversold territory.
    pub rsi_extreme_penalty: f64,
    /// Penalty (negative) for a close above the upper volatility band.
    pub bands_overextended_penalty: f64,
    /// Optimal band for the bounded oscillator.
    pub rsi_optimal_low: f64,
    pub rsi_optimal_high: f64,
    /// Extreme band edges for the bounded oscillator.
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Strong band for the directional-strength oscillator.
    pub cci_strong_low: f64,
    pub cci_strong_high: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            max_score: 10.0,
            crossover_pct: 5.0,
            trend_crossover_bonus: 3.0,
            trend_established_bonus: 1.0,
            ema_bonus: 2.0,
            rsi_optimal_bonus: 2.0,
            volume_bonus: 1.0,
            cci_strong_bonus: 2.0,
            rsi_extreme_penalty: -2.0,
            bands_overextended_penalty: -2.0,
            rsi_optimal_low: 40.0,
            rsi_optimal_high: 65.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            cci_strong_low: 100.0,
            cci_strong_high: 200.0,
        }
    }
}

/// Status classifier thresholds and windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Percent distance from the trend average beyond which price is extended.
    pub extension_threshold_pct: f64,
    /// Tight distance band (percent) that reads as accumulation near the trend.
    ///
    /// Numerically equal to the scoring crossover band but independently
    /// configured; nothing requires them to stay equal.
    pub accumulation_band_pct: f64,
    /// Bars to look back when measuring the trend average slope.
    pub slope_lookback: usize,
    /// Slope percent-change magnitude below which the trend reads flat.
    pub slope_flat_threshold_pct: f64,
    /// Bars to scan for local resistance (maximum high).
    pub resistance_lookback: usize,
    /// ATR as percent of price at or above this reads as elevated volatility.
    pub atr_elevated_pct: f64,
    /// ATR as percent of price at or above this reads as severe volatility.
    pub atr_severe_pct: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            extension_threshold_pct: 20.0,
            accumulation_band_pct: 5.0,
            slope_lookback: 10,
            slope_flat_threshold_pct: 0.5,
            resistance_lookback: 30,
            atr_elevated_pct: 5.0,
            atr_severe_pct: 8.0,
        }
    }
}

/// Aggregate configuration for a full analysis pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub score: ScoreConfig,
    pub classify: ClassifyConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.indicators.trend_period, 150);
        assert_eq!(cfg.indicators.min_bars(), 150);
        assert_eq!(cfg.score.max_score, 10.0);
        assert_eq!(cfg.classify.extension_threshold_pct, 20.0);
    }

    #[test]
    fn crossover_and_accumulation_bands_are_independent() {
        // They coincide numerically by default, but each is its own knob.
        let mut cfg = AnalysisConfig::default();
        assert_eq!(cfg.score.crossover_pct, cfg.classify.accumulation_band_pct);
        cfg.classify.accumulation_band_pct = 3.0;
        assert_ne!(cfg.score.crossover_pct, cfg.classify.accumulation_band_pct);
    }

    #[test]
    fn partial_toml_override_keeps_defaults() {
        let cfg: AnalysisConfig = toml::from_str(
            r#"
            [classify]
            extension_threshold_pct = 25.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.classify.extension_threshold_pct, 25.0);
        assert_eq!(cfg.classify.slope_lookback, 10);
        assert_eq!(cfg.indicators.trend_period, 150);
    }
}
