//! MACD — Moving Average Convergence Divergence.
//!
//! macd      = EMA(close, fast) - EMA(close, slow)
//! signal    = EMA(macd, signal_window), seeded where the macd line
//!             becomes defined
//! histogram = macd - signal
//!
//! Exposed as one named instance per line.
//! Lookback: slow - 1 for the macd line; slow + signal_window - 2 for the
//! signal line and histogram.

use crate::domain::PriceBar;
use crate::indicators::ema::ema_of_series;
use crate::indicators::Indicator;

/// Which line of the MACD complex to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal_window: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn macd(fast: usize, slow: usize, signal_window: usize) -> Self {
        Self::with_line(fast, slow, signal_window, MacdLine::Macd)
    }

    pub fn signal(fast: usize, slow: usize, signal_window: usize) -> Self {
        Self::with_line(fast, slow, signal_window, MacdLine::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal_window: usize) -> Self {
        Self::with_line(fast, slow, signal_window, MacdLine::Histogram)
    }

    fn with_line(fast: usize, slow: usize, signal_window: usize, line: MacdLine) -> Self {
        assert!(fast >= 1, "MACD fast window must be >= 1");
        assert!(slow > fast, "MACD slow window must be > fast");
        assert!(signal_window >= 1, "MACD signal window must be >= 1");
        let tag = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
            MacdLine::Histogram => "macd_hist",
        };
        Self {
            fast,
            slow,
            signal_window,
            line,
            name: format!("{tag}_{fast}_{slow}_{signal_window}"),
        }
    }

    fn macd_line(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast_ema = ema_of_series(&closes, self.fast);
        let slow_ema = ema_of_series(&closes, self.slow);
        fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(f, s)| f - s)
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal_window - 2,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let macd = self.macd_line(bars);
        if self.line == MacdLine::Macd {
            return macd;
        }

        // Smooth the defined tail of the macd line.
        let start = self.slow - 1;
        let mut signal = vec![f64::NAN; n];
        if n > start {
            let tail = ema_of_series(&macd[start..], self.signal_window);
            for (offset, v) in tail.into_iter().enumerate() {
                signal[start + offset] = v;
            }
        }

        match self.line {
            MacdLine::Signal => signal,
            MacdLine::Histogram => macd
                .iter()
                .zip(&signal)
                .map(|(m, s)| m - s)
                .collect(),
            MacdLine::Macd => unreachable!(),
        }
    }
}
