//! Domain types for MarketPulse.

pub mod bar;
pub mod series;
pub mod snapshot;

pub use bar::{is_strictly_ordered, Bar};
pub use series::EnrichedSeries;
pub use snapshot::IndicatorSnapshot;

/// Symbol type alias
pub type Symbol = String;
