//! Market data acquisition.

pub mod provider;
pub mod yahoo;

pub use provider::{
    format_market_cap, BarProvider, DataError, MarketData, ProfileProvider, SymbolProfile,
};
pub use yahoo::YahooClient;
