//! Documented classification scenarios, checked end to end through
//! classify + narrate so the label and the prose stay in lockstep.

use chrono::NaiveDate;
use marketpulse_core::{
    classify, narrate, narrate_and_format, score_snapshot, AnalysisConfig, IndicatorSnapshot,
    LineKind, Locale, NarrativeContext, SectionKind, Status,
};

fn snapshot(close: f64, trend: f64) -> IndicatorSnapshot {
    IndicatorSnapshot {
        symbol: "TEST".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        close,
        volume: 2_000,
        trend: Some(trend),
        trend_past: Some(trend / 1.012), // rising ~1.2%
        ema: Some(close * 0.97),
        rsi: Some(55.0),
        cci: Some(150.0),
        bands_upper: Some(close * 1.1),
        volume_ma: Some(1_500.0),
        atr: Some(close * 0.02),
        resistance: Some(close * 1.04),
    }
}

fn ctx() -> NarrativeContext {
    NarrativeContext::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
}

#[test]
fn scenario_a_moderate_distance_rising_slope_is_breakout() {
    let cfg = AnalysisConfig::default();
    // price 150 vs trend 140: +7.14%, outside the 5% accumulation band,
    // under the 20% extension threshold, slope rising +1.2%.
    let result = classify(&snapshot(150.0, 140.0), &cfg.classify).unwrap();
    assert_eq!(result.status, Status::Breakout);
    assert!((result.distance_pct - 7.142857).abs() < 1e-4);
    assert!(!result.is_extended);
}

#[test]
fn scenario_b_below_trend_is_breakdown_regardless() {
    let cfg = AnalysisConfig::default();
    let mut snap = snapshot(90.0, 100.0);
    // Deliberately contradictory side inputs: none of them matter.
    snap.rsi = Some(90.0);
    snap.cci = None;
    snap.trend_past = None;
    let result = classify(&snap, &cfg.classify).unwrap();
    assert_eq!(result.status, Status::Breakdown);
}

#[test]
fn scenario_c_extension_is_stretched_with_no_chase_instruction() {
    let cfg = AnalysisConfig::default();
    // +42.9% beyond the 20% threshold.
    let result = classify(&snapshot(200.0, 140.0), &cfg.classify).unwrap();
    assert_eq!(result.status, Status::Stretched);

    let record = narrate(&result, None, &ctx(), Locale::En);
    let instruction = record
        .lines()
        .iter()
        .find(|l| l.kind == LineKind::Instruction)
        .unwrap();
    assert!(instruction.text.contains("do not chase"));
}

#[test]
fn scenario_d_flat_slope_is_stagnation() {
    let cfg = AnalysisConfig::default();
    let mut snap = snapshot(102.0, 100.0);
    snap.trend_past = Some(99.9); // +0.1%, under the 0.5% flat threshold
    let result = classify(&snap, &cfg.classify).unwrap();
    assert_eq!(result.status, Status::Stagnation);
}

#[test]
fn scenario_e_partial_snapshot_degrades_gracefully() {
    let cfg = AnalysisConfig::default();
    let mut snap = snapshot(103.0, 100.0); // +3%, inside the accumulation band
    snap.rsi = None;
    snap.cci = None;
    snap.volume_ma = None;

    // Classification still succeeds.
    let result = classify(&snap, &cfg.classify).unwrap();
    assert_eq!(result.status, Status::Accumulation);

    // The score reflects only the fired rules: trend crossover + EMA.
    let score = score_snapshot(&snap, &cfg.score);
    assert_eq!(score.score, 5.0);
    assert_eq!(score.contributions.len(), 2);
    for c in &score.contributions {
        assert!(
            !c.label.contains("RSI") && !c.label.contains("CCI") && !c.label.contains("volume"),
            "missing indicator produced a contribution: {}",
            c.label
        );
    }
}

#[test]
fn scenarios_format_into_the_same_section_shape() {
    let cfg = AnalysisConfig::default();
    for (close, trend) in [(150.0, 140.0), (90.0, 100.0), (200.0, 140.0)] {
        let classification = classify(&snapshot(close, trend), &cfg.classify).unwrap();
        let report = narrate_and_format(&classification, None, &ctx(), Locale::He);

        for kind in [
            SectionKind::Header,
            SectionKind::Events,
            SectionKind::Signal,
            SectionKind::Status,
            SectionKind::Risk,
            SectionKind::Strategy,
            SectionKind::Summary,
        ] {
            assert!(
                report.section(kind).is_some(),
                "missing section {kind:?} for close={close}"
            );
        }
    }
}
