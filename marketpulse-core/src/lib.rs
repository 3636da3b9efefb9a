//! MarketPulse core — indicator-driven trading-posture classification.
//!
//! The pipeline per symbol:
//! - Indicator set: bar series in, enriched series (named NaN-warmup series) out
//! - Scoring engine and status classifier: independent reads of the
//!   last-position snapshot
//! - Narrative generator: deterministic tagged lines keyed by the classification
//! - Output formatter: tagged lines grouped into delivery-ready sections
//!
//! Everything here is pure and synchronous; fetching bars, earnings dates,
//! and delivering reports live in the surrounding collaborators.

pub mod analysis;
pub mod config;
pub mod domain;
pub mod indicators;
pub mod narrative;
pub mod report;

pub use analysis::{analyze, classify, score_bars, score_snapshot, AnalysisError};
pub use analysis::{Classification, Contribution, EntryZone, RiskBucket, ScoreResult, Slope, Status};
pub use config::{AnalysisConfig, ClassifyConfig, IndicatorConfig, ScoreConfig};
pub use domain::{Bar, EnrichedSeries, IndicatorSnapshot};
pub use narrative::{narrate, LineKind, Locale, NarrativeContext, NarrativeLine, NarrativeRecord};
pub use report::{format_report, Report, Section, SectionKind};

/// Narrate a classification and group the result into sections.
///
/// The single entry point a renderer should call to get delivery-ready
/// content; `score` adds the optional technical-score line.
pub fn narrate_and_format(
    classification: &Classification,
    score: Option<&ScoreResult>,
    ctx: &NarrativeContext,
    locale: Locale,
) -> Report {
    format_report(&narrate(classification, score, ctx, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the per-pass types are Send + Sync, so a host may
    /// run one analysis pass per symbol on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<EnrichedSeries>();
        require_sync::<EnrichedSeries>();
        require_send::<IndicatorSnapshot>();
        require_sync::<IndicatorSnapshot>();
        require_send::<Classification>();
        require_sync::<Classification>();
        require_send::<ScoreResult>();
        require_sync::<ScoreResult>();
        require_send::<NarrativeRecord>();
        require_sync::<NarrativeRecord>();
        require_send::<Report>();
        require_sync::<Report>();
        require_send::<AnalysisConfig>();
        require_sync::<AnalysisConfig>();
    }
}
