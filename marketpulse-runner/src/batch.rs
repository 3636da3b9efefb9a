//! Batch orchestration.
//!
//! Runs the full pipeline (fetch, enrich, classify, score, narrate, format)
//! across a symbol universe in parallel. Per-symbol failures are isolated:
//! one bad ticker never aborts the batch.

use chrono::NaiveDate;
use marketpulse_core::{
    analyze, narrate_and_format, score_bars, AnalysisError, Classification, NarrativeContext,
    Report, ScoreResult, Status,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::data::{BarProvider, DataError, ProfileProvider, SymbolProfile};
use crate::notify::{DiscordNotifier, NotifyError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Complete pipeline output for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub classification: Classification,
    pub score: ScoreResult,
    pub report: Report,
    pub profile: Option<SymbolProfile>,
    pub next_earnings: Option<NaiveDate>,
}

/// Results of a batch run, successes and failures side by side.
#[derive(Debug)]
pub struct BatchOutcome {
    pub analyses: Vec<SymbolAnalysis>,
    pub failures: Vec<(String, RunError)>,
}

impl BatchOutcome {
    /// Count of symbols per classified status, for the run summary.
    pub fn status_counts(&self) -> Vec<(Status, usize)> {
        let mut counts: Vec<(Status, usize)> = Vec::new();
        for analysis in &self.analyses {
            let status = analysis.classification.status;
            match counts.iter_mut().find(|(s, _)| *s == status) {
                Some((_, n)) => *n += 1,
                None => counts.push((status, 1)),
            }
        }
        counts
    }
}

/// Run the pipeline for a single symbol.
pub fn analyze_symbol(
    bars: &dyn BarProvider,
    profiles: Option<&dyn ProfileProvider>,
    symbol: &str,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<SymbolAnalysis, RunError> {
    let data = bars.fetch(symbol)?;
    let classification = analyze(&data.bars, &config.analysis)?;
    let score = score_bars(&data.bars, &config.analysis)?;

    let mut ctx = NarrativeContext::new(today);
    if let Some(date) = data.next_earnings {
        let days = (date - today).num_days();
        if days >= 0 {
            ctx = ctx.with_earnings(days, Some(date));
        }
    }

    let report = narrate_and_format(&classification, Some(&score), &ctx, config.locale);

    // Profile lookup is cosmetic; a failure downgrades to a bare briefing.
    let profile = profiles.and_then(|p| match p.profile(symbol) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(%symbol, error = %e, "profile lookup failed");
            None
        }
    });

    Ok(SymbolAnalysis {
        symbol: symbol.to_string(),
        classification,
        score,
        report,
        profile,
        next_earnings: data.next_earnings,
    })
}

/// Score one symbol without the narrative stages.
pub fn score_symbol(
    bars: &dyn BarProvider,
    symbol: &str,
    config: &RunConfig,
) -> Result<ScoreResult, RunError> {
    let data = bars.fetch(symbol)?;
    Ok(score_bars(&data.bars, &config.analysis)?)
}

/// Run the pipeline across the configured universe in parallel.
///
/// Output order follows the config's ticker order regardless of which
/// worker finishes first.
pub fn run_batch(
    bars: &dyn BarProvider,
    profiles: Option<&dyn ProfileProvider>,
    config: &RunConfig,
    today: NaiveDate,
) -> BatchOutcome {
    info!(
        symbols = config.tickers.len(),
        provider = bars.name(),
        "starting batch run"
    );

    let results: Vec<(String, Result<SymbolAnalysis, RunError>)> = config
        .tickers
        .par_iter()
        .map(|symbol| {
            let result = analyze_symbol(bars, profiles, symbol, config, today);
            match &result {
                Ok(a) => info!(
                    %symbol,
                    status = %a.classification.status,
                    score = a.score.score,
                    "analyzed"
                ),
                Err(e) => error!(%symbol, error = %e, "analysis failed"),
            }
            (symbol.clone(), result)
        })
        .collect();

    let mut analyses = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (symbol, result) in results {
        match result {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => failures.push((symbol, e)),
        }
    }

    let outcome = BatchOutcome { analyses, failures };
    info!(
        ok = outcome.analyses.len(),
        failed = outcome.failures.len(),
        counts = ?outcome.status_counts(),
        "batch run complete"
    );
    outcome
}

/// Deliver a batch's briefings over Discord.
///
/// Posts a batch header to the default webhook, then one message per symbol,
/// routed by sector when a sector webhook is configured. Delivery errors are
/// logged and skipped; the count of delivered messages is returned.
pub fn deliver_briefings(
    notifier: &DiscordNotifier,
    outcome: &BatchOutcome,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<usize, NotifyError> {
    if config.webhook_url.is_empty() && config.sector_webhooks.is_empty() {
        info!("no webhook configured, skipping delivery");
        return Ok(0);
    }

    if !config.webhook_url.is_empty() {
        let header = DiscordNotifier::batch_header(today, outcome.analyses.len());
        notifier.post_paced(&config.webhook_url, &header)?;
    }

    let mut delivered = 0;
    for analysis in &outcome.analyses {
        let sector = analysis
            .profile
            .as_ref()
            .map(|p| p.sector.as_str())
            .unwrap_or("Unknown");
        let Some(webhook) = config.webhook_for(sector) else {
            continue;
        };

        let message = DiscordNotifier::render(
            &analysis.report,
            analysis.classification.is_positive,
            analysis.profile.as_ref(),
        );
        match notifier.post_paced(webhook, &message) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(symbol = %analysis.symbol, error = %e, "delivery failed"),
        }
    }

    info!(delivered, "delivery complete");
    Ok(delivered)
}
