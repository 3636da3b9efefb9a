//! MarketPulse Runner — data acquisition, batch orchestration, delivery.
//!
//! This crate builds on `marketpulse-core` to provide:
//! - Yahoo Finance market data and profile providers with retry/backoff
//! - TOML run configuration (universe, locale, webhooks, parameter overrides)
//! - Parallel batch analysis with per-symbol failure isolation
//! - Discord webhook rendering and rate-limited delivery

pub mod batch;
pub mod config;
pub mod data;
pub mod notify;

pub use batch::{
    analyze_symbol, deliver_briefings, run_batch, score_symbol, BatchOutcome, RunError,
    SymbolAnalysis,
};
pub use config::{ConfigError, RunConfig};
pub use data::{BarProvider, DataError, MarketData, ProfileProvider, SymbolProfile, YahooClient};
pub use notify::{DiscordNotifier, NotifyError};
