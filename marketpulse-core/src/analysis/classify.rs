//! Status classifier — decision tree from snapshot to trading posture.
//!
//! Precedence is encoded as an ordered rule list evaluated first-match-wins,
//! so the order is auditable (and testable) without reading nested branches.
//! The five labels are collectively exhaustive: the final rule is a
//! catch-all, and an empty match is reported as a defect, never defaulted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ClassifyConfig;
use crate::domain::IndicatorSnapshot;

use super::AnalysisError;

/// Trading posture label. Exactly one per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Breakout,
    Stretched,
    Breakdown,
    Stagnation,
    Accumulation,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Breakout => "breakout",
            Status::Stretched => "stretched",
            Status::Breakdown => "breakdown",
            Status::Stagnation => "stagnation",
            Status::Accumulation => "accumulation",
        };
        f.write_str(s)
    }
}

/// Trend average slope bucket over the slope lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slope {
    Rising,
    Flat,
    Declining,
    /// Not enough history to measure the slope.
    Unknown,
}

/// Volatility bucket from ATR as a percentage of price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    Normal,
    Elevated,
    Severe,
}

/// Support/resistance pair for the entry zone (price above trend only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    /// Current trend average value.
    pub support: f64,
    /// Maximum high over the resistance window.
    pub resistance: f64,
}

/// Full classification of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub symbol: String,
    pub status: Status,
    /// Price above the long trend average.
    pub is_positive: bool,
    pub slope: Slope,
    /// Percentage distance from the trend average, signed.
    pub distance_pct: f64,
    /// |distance| beyond the extension threshold.
    pub is_extended: bool,
    pub price: f64,
    /// Long trend average value.
    pub trend: f64,
    /// Support/resistance pair; only present when price is above the trend.
    pub entry_zone: Option<EntryZone>,
    /// Price closed above the resistance: it now acts as new support.
    pub retest: bool,
    /// ATR as a percentage of price, when available.
    pub atr_pct: Option<f64>,
    /// Volatility bucket derived from `atr_pct`; independent of `status`.
    pub risk: Option<RiskBucket>,
}

/// Classify the snapshot into exactly one status label.
///
/// The only hard failure is an unavailable long trend average — without the
/// primary directional reference no meaningful status exists. Every other
/// missing indicator degrades the result (no entry zone, no risk bucket)
/// instead of failing.
pub fn classify(
    snap: &IndicatorSnapshot,
    cfg: &ClassifyConfig,
) -> Result<Classification, AnalysisError> {
    let trend = snap.trend.ok_or(AnalysisError::TrendUnavailable)?;

    let is_positive = snap.close > trend;
    let distance_pct = (snap.close - trend) / trend * 100.0;
    let is_extended = distance_pct.abs() > cfg.extension_threshold_pct;
    let slope = slope_bucket(trend, snap.trend_past, cfg.slope_flat_threshold_pct);

    let status = decide(is_positive, slope, distance_pct, is_extended, cfg)?;

    let entry_zone = if is_positive {
        snap.resistance.map(|resistance| EntryZone {
            support: trend,
            resistance,
        })
    } else {
        None
    };
    let retest = entry_zone.is_some_and(|zone| snap.close > zone.resistance);

    let atr_pct = snap.atr_pct();
    let risk = atr_pct.map(|pct| {
        if pct >= cfg.atr_severe_pct {
            RiskBucket::Severe
        } else if pct >= cfg.atr_elevated_pct {
            RiskBucket::Elevated
        } else {
            RiskBucket::Normal
        }
    });

    Ok(Classification {
        symbol: snap.symbol.clone(),
        status,
        is_positive,
        slope,
        distance_pct,
        is_extended,
        price: snap.close,
        trend,
        entry_zone,
        retest,
        atr_pct,
        risk,
    })
}

/// Percentage change of the trend average over the slope window, bucketed.
fn slope_bucket(current: f64, past: Option<f64>, flat_threshold_pct: f64) -> Slope {
    let Some(past) = past else {
        return Slope::Unknown;
    };
    if past == 0.0 {
        return Slope::Unknown;
    }
    let slope_pct = (current - past) / past * 100.0;
    if slope_pct.abs() < flat_threshold_pct {
        Slope::Flat
    } else if slope_pct < 0.0 {
        Slope::Declining
    } else {
        Slope::Rising
    }
}

/// The ordered rule list. First match wins.
fn decide(
    is_positive: bool,
    slope: Slope,
    distance_pct: f64,
    is_extended: bool,
    cfg: &ClassifyConfig,
) -> Result<Status, AnalysisError> {
    let rules = [
        // At or below the trend average: breakdown regardless of anything else.
        (Status::Breakdown, !is_positive),
        // Unusually far from the trend.
        (Status::Stretched, is_extended),
        // Above the trend but the trend itself is not rising.
        (
            Status::Stagnation,
            matches!(slope, Slope::Declining | Slope::Flat),
        ),
        // Rising, not extended, hugging the trend line.
        (
            Status::Accumulation,
            distance_pct.abs() < cfg.accumulation_band_pct,
        ),
        // Rising, not extended, clear of the trend line.
        (Status::Breakout, true),
    ];

    rules
        .into_iter()
        .find_map(|(status, hit)| hit.then_some(status))
        .ok_or(AnalysisError::AmbiguousClassification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(close: f64, trend: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            close,
            volume: 1_000,
            trend: Some(trend),
            trend_past: Some(trend * 0.99), // rising ~1%
            ema: None,
            rsi: None,
            cci: None,
            bands_upper: None,
            volume_ma: None,
            atr: None,
            resistance: Some(close * 1.05),
        }
    }

    #[test]
    fn below_trend_is_breakdown_regardless() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(90.0, 100.0);
        // Even a rising slope or missing resistance cannot override breakdown.
        snap.resistance = None;
        let result = classify(&snap, &cfg).unwrap();
        assert_eq!(result.status, Status::Breakdown);
        assert!(!result.is_positive);
        assert_eq!(result.entry_zone, None);
        assert!(!result.retest);
    }

    #[test]
    fn extension_beats_slope() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(200.0, 140.0); // +42.9%
        snap.trend_past = Some(141.0); // declining slope, still stretched
        let result = classify(&snap, &cfg).unwrap();
        assert_eq!(result.status, Status::Stretched);
        assert!(result.is_extended);
    }

    #[test]
    fn flat_slope_above_trend_is_stagnation() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(102.0, 100.0);
        snap.trend_past = Some(99.9); // +0.1%, under the 0.5% flat threshold
        let result = classify(&snap, &cfg).unwrap();
        assert_eq!(result.status, Status::Stagnation);
        assert_eq!(result.slope, Slope::Flat);
    }

    #[test]
    fn tight_distance_with_rising_slope_is_accumulation() {
        let cfg = ClassifyConfig::default();
        let result = classify(&snapshot(103.0, 100.0), &cfg).unwrap();
        assert_eq!(result.status, Status::Accumulation);
        assert_eq!(result.slope, Slope::Rising);
    }

    #[test]
    fn moderate_distance_with_rising_slope_is_breakout() {
        let cfg = ClassifyConfig::default();
        let result = classify(&snapshot(150.0, 140.0), &cfg).unwrap(); // +7.14%
        assert_eq!(result.status, Status::Breakout);
        assert!(!result.is_extended);
    }

    #[test]
    fn unknown_slope_falls_through_to_distance_rules() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(103.0, 100.0);
        snap.trend_past = None;
        let result = classify(&snap, &cfg).unwrap();
        assert_eq!(result.slope, Slope::Unknown);
        assert_eq!(result.status, Status::Accumulation);
    }

    #[test]
    fn missing_trend_is_a_hard_error() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(100.0, 100.0);
        snap.trend = None;
        assert!(matches!(
            classify(&snap, &cfg),
            Err(AnalysisError::TrendUnavailable)
        ));
    }

    #[test]
    fn retest_flag_when_price_clears_resistance() {
        let cfg = ClassifyConfig::default();
        let mut snap = snapshot(110.0, 100.0);
        snap.resistance = Some(108.0);
        let result = classify(&snap, &cfg).unwrap();
        assert!(result.retest);
        let zone = result.entry_zone.unwrap();
        assert_eq!(zone.support, 100.0);
        assert_eq!(zone.resistance, 108.0);
    }

    #[test]
    fn risk_buckets_from_atr_pct() {
        let cfg = ClassifyConfig::default();

        let mut snap = snapshot(100.0, 90.0);
        snap.atr = Some(3.0); // 3%
        assert_eq!(classify(&snap, &cfg).unwrap().risk, Some(RiskBucket::Normal));

        snap.atr = Some(6.0); // 6%
        assert_eq!(classify(&snap, &cfg).unwrap().risk, Some(RiskBucket::Elevated));

        snap.atr = Some(9.0); // 9%
        assert_eq!(classify(&snap, &cfg).unwrap().risk, Some(RiskBucket::Severe));

        snap.atr = None;
        let result = classify(&snap, &cfg).unwrap();
        assert_eq!(result.risk, None);
        assert_eq!(result.atr_pct, None);
    }
}
