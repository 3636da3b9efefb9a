//! Narrative generator — deterministic, pre-tagged briefing lines.
//!
//! Templates are selected solely by the classifier's output fields, so the
//! prose can never contradict the label. Every line carries an explicit
//! `LineKind` tag; the formatter keys off those tags instead of sniffing
//! text content. The current date and earnings calendar are injected through
//! `NarrativeContext`, keeping this layer pure and idempotent.

pub mod templates;

pub use templates::Locale;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analysis::{Classification, ScoreResult};

use templates::fmt_money;

/// Semantic tag of a narrative line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Header,
    Date,
    Earnings,
    Signal,
    Status,
    Risk,
    Instruction,
    Summary,
    /// Unmarked explanatory text; the formatter groups it under the most
    /// recent section.
    Body,
}

/// One tagged line of the briefing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeLine {
    pub kind: LineKind,
    pub text: String,
}

/// The full briefing, in fixed order. Never mutated after creation —
/// downstream formatting only regroups lines, it never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRecord {
    lines: Vec<NarrativeLine>,
}

impl NarrativeRecord {
    pub fn lines(&self) -> &[NarrativeLine] {
        &self.lines
    }

    /// Plain-text rendering, one line per row.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Calendar and identity inputs the core does not compute itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContext {
    /// "Today" as the caller sees it; injected for determinism.
    pub today: NaiveDate,
    /// Days until the next earnings report, when the calendar collaborator
    /// supplied one.
    pub days_to_earnings: Option<i64>,
    /// The earnings date itself.
    pub earnings_date: Option<NaiveDate>,
}

impl NarrativeContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            days_to_earnings: None,
            earnings_date: None,
        }
    }

    pub fn with_earnings(mut self, days: i64, date: Option<NaiveDate>) -> Self {
        self.days_to_earnings = Some(days);
        self.earnings_date = date;
        self
    }
}

/// Generate the briefing for one classification.
///
/// Line order is fixed: header, date, optional earnings countdown, entry
/// signal, status, explanation, optional score, risk, instruction, summary.
/// Only the earnings line may be absent.
pub fn narrate(
    classification: &Classification,
    score: Option<&ScoreResult>,
    ctx: &NarrativeContext,
    locale: Locale,
) -> NarrativeRecord {
    let mut lines = Vec::with_capacity(10);
    let mut push = |kind: LineKind, text: String| lines.push(NarrativeLine { kind, text });
    let c = classification;

    push(
        LineKind::Header,
        format!("**{}** - {}$", c.symbol, fmt_money(c.price)),
    );

    let date_str = ctx.today.format("%d.%m.%Y").to_string();
    let weekday = locale.weekday_name(ctx.today.weekday());
    push(LineKind::Date, locale.date_line(&date_str, weekday));

    if let Some(days) = ctx.days_to_earnings {
        let date_info = ctx
            .earnings_date
            .map(|d| format!(" ({})", d.format("%d.%m.%Y")))
            .unwrap_or_default();
        push(LineKind::Earnings, locale.earnings_line(days, &date_info));
    }

    let signal = if c.is_positive {
        match c.entry_zone {
            Some(zone) if c.retest => locale.entry_retest(&fmt_money(zone.resistance)),
            Some(zone) => locale.entry_zone(
                &fmt_money(zone.support),
                &fmt_money(zone.resistance),
                c.distance_pct,
            ),
            None => locale.entry_no_resistance(&fmt_money(c.trend), c.distance_pct),
        }
    } else {
        locale.no_entry(&fmt_money(c.trend), c.distance_pct.abs())
    };
    push(LineKind::Signal, signal);

    push(
        LineKind::Status,
        format!(
            "{}{} {}: {}",
            locale.rlm(),
            locale.status_emoji(c.status),
            locale.status_label(),
            locale.status_name(c.status)
        ),
    );

    push(
        LineKind::Body,
        locale.explanation(c.is_positive, c.slope, c.is_extended, c.distance_pct),
    );

    if let Some(score) = score {
        push(
            LineKind::Body,
            locale.score_line(score.score, score.max_score),
        );
    }

    push(LineKind::Risk, locale.risk_line(c.risk, c.atr_pct));
    push(
        LineKind::Instruction,
        locale.instruction(c.status, c.is_extended),
    );
    push(LineKind::Summary, locale.summary(c.status));

    NarrativeRecord { lines }
}
