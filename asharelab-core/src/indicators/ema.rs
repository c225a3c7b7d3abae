//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], with
//! alpha = 2 / (window + 1), seeded with the SMA of the first window values.
//! Lookback: window - 1.

use crate::domain::PriceBar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    name: String,
}

impl Ema {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "EMA window must be >= 1");
        Self {
            window,
            name: format!("ema_{window}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.window)
    }
}

/// EMA over a plain value slice.
///
/// Used by composed indicators (MACD signal line) that smooth a derived
/// series rather than raw closes. The input must be free of undefined
/// values; callers slice off any NaN prefix first.
pub fn ema_of_series(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }

    let seed: f64 = values[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = seed;

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = seed;
    for i in window..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_window_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5
        // Seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12.0 = 13.0
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_series_shorter_than_window_all_undefined() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Ema::new(5).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let from_bars = Ema::new(3).compute(&bars);
        let from_series = ema_of_series(&closes, 3);
        for i in 0..6 {
            if from_bars[i].is_nan() {
                assert!(from_series[i].is_nan());
            } else {
                assert_approx(from_bars[i], from_series[i], DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(26).lookback(), 25);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
