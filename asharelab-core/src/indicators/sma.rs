//! Simple Moving Average (SMA).
//!
//! Rolling arithmetic mean of close prices.
//! Lookback: window - 1 (first defined value at index window-1).

use crate::domain::PriceBar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut out = vec![f64::NAN; n];
        if n < self.window {
            return out;
        }

        let mut sum: f64 = bars[..self.window].iter().map(|b| b.close).sum();
        out[self.window - 1] = sum / self.window as f64;

        for i in self.window..n {
            sum += bars[i].close - bars[i - self.window].close;
            out[i] = sum / self.window as f64;
        }
        out
    }
}
