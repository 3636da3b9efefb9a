//! Enriched series — bars plus named derived value sequences.
//!
//! Derived series are index-aligned 1:1 with the bars: position i of a
//! derived sequence corresponds to bar i. Warmup positions hold `f64::NAN`
//! (the first `lookback()` values of each indicator).

use std::collections::HashMap;

use crate::config::AnalysisConfig;
use crate::domain::Bar;

use super::snapshot::IndicatorSnapshot;

/// Bars plus precomputed indicator series, keyed by indicator name.
///
/// Built once per analysis pass by `enrich()` and discarded with the pass.
#[derive(Debug, Clone, Default)]
pub struct EnrichedSeries {
    bars: Vec<Bar>,
    series: HashMap<String, Vec<f64>>,
}

impl EnrichedSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            series: HashMap::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Insert a named derived series. Must be the same length as the bars.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.bars.len(), "derived series misaligned");
        self.series.insert(name.into(), values);
    }

    /// Derived value at a specific bar index. `None` when the series does not
    /// exist or the index is out of bounds; NaN warmup values come back as-is.
    pub fn value_at(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())
    }

    /// Derived value at a bar index, with NaN mapped to `None`.
    pub fn defined_at(&self, name: &str, index: usize) -> Option<f64> {
        self.value_at(name, index).filter(|v| !v.is_nan())
    }

    /// Full derived series by name.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Evaluate every derived value at the last bar position.
    ///
    /// This is the only view the scoring engine and status classifier consume.
    /// Values that are undefined at the last position (still in warmup) come
    /// out as `None` — never silently zero. The snapshot also carries the two
    /// window reads the classifier needs: the trend value `slope_lookback`
    /// bars back and the local resistance (maximum high over the resistance
    /// window, falling back to the whole series when shorter).
    ///
    /// Panics if the series is empty; `enrich()` guarantees it is not.
    pub fn snapshot(&self, cfg: &AnalysisConfig) -> IndicatorSnapshot {
        let last = self.bars.len() - 1;
        let bar = &self.bars[last];
        let ind = &cfg.indicators;

        let trend_past = last
            .checked_sub(cfg.classify.slope_lookback)
            .and_then(|i| self.defined_at(&ind.trend_key(), i));

        IndicatorSnapshot {
            symbol: bar.symbol.clone(),
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
            trend: self.defined_at(&ind.trend_key(), last),
            trend_past,
            ema: self.defined_at(&ind.ema_key(), last),
            rsi: self.defined_at(&ind.rsi_key(), last),
            cci: self.defined_at(&ind.cci_key(), last),
            bands_upper: self.defined_at(&ind.bands_upper_key(), last),
            volume_ma: self.defined_at(&ind.volume_ma_key(), last),
            atr: self.defined_at(&ind.atr_key(), last),
            resistance: self.local_resistance(cfg.classify.resistance_lookback),
        }
    }

    /// Maximum high over the trailing `lookback` bars (full series fallback),
    /// skipping NaN highs. `None` when no valid high exists.
    fn local_resistance(&self, lookback: usize) -> Option<f64> {
        let window = lookback.min(self.bars.len());
        self.bars[self.bars.len() - window..]
            .iter()
            .map(|b| b.high)
            .filter(|h| !h.is_nan())
            .fold(None, |acc: Option<f64>, h| {
                Some(acc.map_or(h, |m| m.max(h)))
            })
    }
}
