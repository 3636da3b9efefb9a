//! Scoring engine — additive technical score with itemized contributions.
//!
//! Stateless: snapshot in, `ScoreResult` out. Every rule is evaluated
//! independently against the snapshot; a rule whose indicator is unavailable
//! simply does not fire. The reported score is the contribution sum clamped
//! to [0, max_score]; contributions themselves stay unclamped so penalties
//! remain auditable.

use serde::{Deserialize, Serialize};

use crate::config::ScoreConfig;
use crate::domain::IndicatorSnapshot;

/// One itemized scoring contribution. Penalties carry negative points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub label: String,
    pub points: f64,
}

/// Bounded score plus the audit trail of rules that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub max_score: f64,
    pub contributions: Vec<Contribution>,
}

impl ScoreResult {
    /// Sum of bonuses (positive contributions).
    pub fn total_added(&self) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.points > 0.0)
            .map(|c| c.points)
            .sum()
    }

    /// Sum of penalties (negative contributions).
    pub fn total_penalties(&self) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.points < 0.0)
            .map(|c| c.points)
            .sum()
    }
}

/// Score a snapshot against the rule set.
pub fn score_snapshot(snap: &IndicatorSnapshot, cfg: &ScoreConfig) -> ScoreResult {
    let mut contributions = Vec::new();
    let mut fire = |label: String, points: f64| {
        contributions.push(Contribution { label, points });
    };

    // Long trend relation. Crossover and established-trend bonuses are
    // mutually exclusive: just above the trend is the better entry.
    if let Some(trend) = snap.trend {
        if snap.close > trend {
            let deviation_pct = (snap.close - trend) / trend * 100.0;
            if deviation_pct <= cfg.crossover_pct {
                fire(
                    format!("price near trend average (+{deviation_pct:.2}%), crossover entry"),
                    cfg.trend_crossover_bonus,
                );
            } else {
                fire(
                    format!("price well above trend average (+{deviation_pct:.2}%), established trend"),
                    cfg.trend_established_bonus,
                );
            }
        }
    }

    // Medium trend relation: flat bonus above the EMA.
    if let Some(ema) = snap.ema {
        if snap.close > ema {
            fire("price above medium-term EMA".into(), cfg.ema_bonus);
        }
    }

    // Bounded oscillator: optimal band rewards, extreme band penalizes,
    // anything in between is neutral.
    if let Some(rsi) = snap.rsi {
        if (cfg.rsi_optimal_low..=cfg.rsi_optimal_high).contains(&rsi) {
            fire(format!("RSI in optimal range ({rsi:.2})"), cfg.rsi_optimal_bonus);
        } else if rsi > cfg.rsi_overbought {
            fire(format!("RSI overbought ({rsi:.2})"), cfg.rsi_extreme_penalty);
        } else if rsi < cfg.rsi_oversold {
            fire(format!("RSI oversold ({rsi:.2})"), cfg.rsi_extreme_penalty);
        }
    }

    // Volume above its rolling average.
    if let Some(volume_ma) = snap.volume_ma {
        if snap.volume as f64 > volume_ma {
            fire("volume above rolling average".into(), cfg.volume_bonus);
        }
    }

    // Directional strength inside the strong band.
    if let Some(cci) = snap.cci {
        if (cfg.cci_strong_low..=cfg.cci_strong_high).contains(&cci) {
            fire(format!("CCI in strong range ({cci:.2})"), cfg.cci_strong_bonus);
        }
    }

    // Close above the upper volatility band reads as overextension.
    if let Some(upper) = snap.bands_upper {
        if snap.close > upper {
            fire(
                "price above upper volatility band, overextended".into(),
                cfg.bands_overextended_penalty,
            );
        }
    }

    let raw: f64 = contributions.iter().map(|c| c.points).sum();
    ScoreResult {
        score: raw.clamp(0.0, cfg.max_score),
        max_score: cfg.max_score,
        contributions,
    }
}
