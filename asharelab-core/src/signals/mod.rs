//! Signal rules — threshold and crossover classification over indicator
//! panels.
//!
//! Rules are stateless and evaluated independently per date with
//! deterministic tie-breaks. A rule must return `Neutral` whenever any
//! indicator it references is undefined at the evaluated position.

pub mod cross;
pub mod rules;

pub use cross::{cross_at, Cross};
pub use rules::{
    AdxTrendRule, BollingerRsiRule, KdjCrossRule, MaCrossRule, MacdRsiMaRule, MacdTrendRule,
    RsiMaRule,
};

use crate::domain::{PriceBar, Signal, SignalKind};
use crate::engine::{IndicatorError, IndicatorPanel};
use crate::indicators::Indicator;

/// A classification rule evaluated once per bar.
pub trait Rule: Send + Sync {
    /// Rule name, recorded as the rationale of every signal it emits.
    fn name(&self) -> &str;

    /// The indicator set this rule reads; the caller precomputes exactly
    /// these into the panel.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Verdict for the bar at `index`.
    fn evaluate(&self, bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind;
}

/// Run a rule across an entire series, one signal per bar.
pub fn classify(bars: &[PriceBar], panel: &IndicatorPanel, rule: &dyn Rule) -> Vec<Signal> {
    bars.iter()
        .enumerate()
        .map(|(index, bar)| Signal {
            date: bar.date,
            kind: rule.evaluate(bars, index, panel),
            rationale: rule.name().to_string(),
        })
        .collect()
}

/// Precompute the rule's own indicator set, then classify.
pub fn classify_series(bars: &[PriceBar], rule: &dyn Rule) -> Result<Vec<Signal>, IndicatorError> {
    let panel = IndicatorPanel::compute(bars, &rule.indicators())?;
    Ok(classify(bars, &panel, rule))
}
