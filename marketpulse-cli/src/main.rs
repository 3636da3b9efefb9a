//! MarketPulse CLI — analyze and score commands.
//!
//! Commands:
//! - `analyze` — run the full pipeline for a symbol universe and print (or
//!   deliver) the briefings
//! - `score` — print the score breakdown for one or more symbols

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketpulse_core::{Classification, Locale, Report, ScoreResult};
use marketpulse_runner::{
    deliver_briefings, run_batch, score_symbol, DiscordNotifier, RunConfig, YahooClient,
};

#[derive(Parser)]
#[command(
    name = "marketpulse",
    about = "MarketPulse CLI — trading-posture briefings from daily bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print or deliver the briefings.
    Analyze {
        /// Symbols to analyze (e.g., AAPL NVDA MSFT). Overrides the config's
        /// ticker list when given.
        symbols: Vec<String>,

        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Narrative language: he or en. Overrides the config.
        #[arg(long)]
        locale: Option<String>,

        /// Deliver briefings to the configured Discord webhooks.
        #[arg(long, default_value_t = false)]
        notify: bool,

        /// Emit machine-readable JSON instead of briefing text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the score breakdown for each symbol.
    Score {
        /// Symbols to score.
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Path to a TOML run config (for parameter overrides).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit machine-readable JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            symbols,
            config,
            locale,
            notify,
            json,
        } => run_analyze(symbols, config, locale, notify, json),
        Commands::Score {
            symbols,
            config,
            json,
        } => run_score(symbols, config, json),
    }
}

fn load_config(path: Option<PathBuf>, symbols: Vec<String>) -> Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::from_toml_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if !symbols.is_empty() {
        config.tickers = symbols;
    }
    if config.tickers.is_empty() {
        bail!("no symbols: pass them as arguments or list them in a config file");
    }
    Ok(config)
}

fn parse_locale(s: &str) -> Result<Locale> {
    match s {
        "he" => Ok(Locale::He),
        "en" => Ok(Locale::En),
        other => bail!("unknown locale {other:?} (expected he or en)"),
    }
}

/// One briefing in JSON output.
#[derive(Serialize)]
struct AnalysisJson<'a> {
    symbol: &'a str,
    classification: &'a Classification,
    score: &'a ScoreResult,
    report: &'a Report,
}

fn run_analyze(
    symbols: Vec<String>,
    config_path: Option<PathBuf>,
    locale: Option<String>,
    notify: bool,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path, symbols)?;
    if let Some(locale) = locale.as_deref() {
        config.locale = parse_locale(locale)?;
    }

    let client = YahooClient::new();
    let today = chrono::Local::now().date_naive();
    let profiles: &dyn marketpulse_runner::ProfileProvider = &client;
    let outcome = run_batch(&client, Some(profiles), &config, today);

    if json {
        let items: Vec<AnalysisJson> = outcome
            .analyses
            .iter()
            .map(|a| AnalysisJson {
                symbol: &a.symbol,
                classification: &a.classification,
                score: &a.score,
                report: &a.report,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for analysis in &outcome.analyses {
            for section in analysis.report.sections() {
                for line in &section.lines {
                    println!("{line}");
                }
            }
            println!();
        }

        let counts = outcome
            .status_counts()
            .iter()
            .map(|(status, n)| format!("{status}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{} analyzed, {} failed{}{counts}",
            outcome.analyses.len(),
            outcome.failures.len(),
            if counts.is_empty() { "" } else { " | " },
        );
    }

    for (symbol, error) in &outcome.failures {
        eprintln!("Error for {symbol}: {error}");
    }

    if notify {
        let notifier = DiscordNotifier::new();
        let delivered = deliver_briefings(&notifier, &outcome, &config, today)?;
        info!(delivered, "briefings delivered");
    }

    if outcome.analyses.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Serialize)]
struct ScoreJson<'a> {
    symbol: &'a str,
    score: &'a ScoreResult,
}

fn run_score(symbols: Vec<String>, config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path, symbols)?;
    let client = YahooClient::new();

    let mut failed = 0usize;
    let mut scored: Vec<(String, ScoreResult)> = Vec::new();
    for symbol in &config.tickers {
        match score_symbol(&client, symbol, &config) {
            Ok(score) => scored.push((symbol.clone(), score)),
            Err(e) => {
                eprintln!("Error for {symbol}: {e}");
                failed += 1;
            }
        }
    }

    if json {
        let items: Vec<ScoreJson> = scored
            .iter()
            .map(|(symbol, score)| ScoreJson { symbol, score })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (symbol, score) in &scored {
            println!("{symbol}: {:.1}/{:.0}", score.score, score.max_score);
            for c in &score.contributions {
                println!("  {:+.1}  {}", c.points, c.label);
            }
        }
    }

    if failed > 0 && scored.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
