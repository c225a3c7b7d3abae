//! Indicator precomputation and the per-symbol panel.
//!
//! All indicators are computed once, up front; rules and reports then read
//! the panel by name and position. Undefined (warmup) values surface as
//! `None` from the typed accessors.

use crate::domain::{PriceBar, Symbol};
use crate::indicators::Indicator;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// The whole series is shorter than the indicator's minimum window.
    /// Shorter-than-window positions inside an adequate series are undefined
    /// values, not errors.
    #[error("indicator '{indicator}' needs at least {needed} bars, got {got}")]
    InsufficientHistory {
        indicator: String,
        needed: usize,
        got: usize,
    },
}

/// Precomputed indicator series for one symbol, aligned to the bar dates.
#[derive(Debug, Clone, Default)]
pub struct IndicatorPanel {
    dates: Vec<NaiveDate>,
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorPanel {
    /// Compute all indicator series for one bar sequence.
    ///
    /// Fails with `InsufficientHistory` when the series cannot produce a
    /// single defined value for some indicator.
    pub fn compute(
        bars: &[PriceBar],
        indicators: &[Box<dyn Indicator>],
    ) -> Result<Self, IndicatorError> {
        for indicator in indicators {
            let needed = indicator.lookback() + 1;
            if bars.len() < needed {
                return Err(IndicatorError::InsufficientHistory {
                    indicator: indicator.name().to_string(),
                    needed,
                    got: bars.len(),
                });
            }
        }

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        let mut series = HashMap::new();
        for indicator in indicators {
            let values = indicator.compute(bars);
            debug_assert_eq!(
                values.len(),
                bars.len(),
                "indicator '{}' produced {} values for {} bars",
                indicator.name(),
                values.len(),
                bars.len()
            );
            series.insert(indicator.name().to_string(), values);
        }
        Ok(Self { dates, series })
    }

    /// Value by position; undefined (warmup) and out-of-range are `None`.
    pub fn at(&self, name: &str, index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(index).copied())
            .filter(|v| !v.is_nan())
    }

    /// Value by date; `None` for dates outside the axis or undefined values.
    pub fn on(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let index = self.dates.binary_search(&date).ok()?;
        self.at(name, index)
    }

    /// Full raw series including the NaN warmup prefix.
    pub fn raw_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// The shared date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows (bars) the panel covers.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of indicator series stored.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Names of the stored series, sorted for deterministic output.
    pub fn series_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The warmup length of an indicator set: the maximum lookback. No rule
/// output before this position can be anything but neutral.
pub fn warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}

/// Precompute panels for many symbols in parallel.
///
/// Pure fan-out over rayon; per-symbol results are identical to sequential
/// evaluation. The first failing symbol's error is returned.
pub fn compute_panel_batch(
    bars_by_symbol: &HashMap<Symbol, Vec<PriceBar>>,
    indicators: &[Box<dyn Indicator>],
) -> Result<HashMap<Symbol, IndicatorPanel>, IndicatorError> {
    bars_by_symbol
        .par_iter()
        .map(|(symbol, bars)| {
            IndicatorPanel::compute(bars, indicators).map(|panel| (symbol.clone(), panel))
        })
        .collect()
}
