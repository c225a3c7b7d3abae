//! Technical indicators over daily price series.
//!
//! Every indicator is a pure function: ordered bar series in, numeric series
//! of the same length out. Positions before the lookback window hold
//! `f64::NAN` (undefined) — never a fabricated zero. Values are never
//! computed past the end of available history.
//!
//! Multi-line indicators (MACD, KDJ, Bollinger) are exposed as one named
//! instance per line, keeping the single-series `Indicator` trait unchanged.

pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod five_day;
pub mod kdj;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;

pub use adx::Adx;
pub use bollinger::{Bollinger, Band};
pub use ema::Ema;
pub use five_day::FiveDayLine;
pub use kdj::{Kdj, KdjLine};
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as `bars`, with the
/// first `lookback()` positions undefined (`f64::NAN`).
pub trait Indicator: Send + Sync {
    /// Series name used as the panel key (e.g. "sma_20", "kdj_k_9_3_3").
    fn name(&self) -> &str;

    /// Bars consumed before the first defined output position.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = previous close (or close for the first
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                symbol: "600519".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Create synthetic bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| PriceBar {
            symbol: "600519".to_string(),
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
