//! Five-day reference line — an intraday-aware variant of SMA5.
//!
//! value[t] = (close[t-4] + close[t-3] + close[t-2] + close[t-1] + open[t]) / 5
//!
//! Unlike `Sma::new(5)`, the current bar contributes its open instead of its
//! close, so the line is already known at the session open and a live price
//! can be compared against it intraday. Kept as a documented variant of the
//! trailing five-close average, not a replacement for it.
//! Lookback: 4.

use crate::domain::PriceBar;
use crate::indicators::Indicator;

#[derive(Debug, Clone, Default)]
pub struct FiveDayLine {
    name: String,
}

impl FiveDayLine {
    pub fn new() -> Self {
        Self {
            name: "five_day_line".to_string(),
        }
    }
}

impl Indicator for FiveDayLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        4
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut out = vec![f64::NAN; n];
        for i in 4..n {
            let prior_closes: f64 = bars[i - 4..i].iter().map(|b| b.close).sum();
            out[i] = (prior_closes + bars[i].open) / 5.0;
        }
        out
    }
}
