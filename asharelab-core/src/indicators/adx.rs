//! ADX — Average Directional Index (Wilder).
//!
//! 1. +DM / -DM from consecutive bars
//! 2. Wilder-smooth +DM, -DM, and true range
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * window - 1 (a window of directional moves for the DI
//! seed, then a window of DX values for the ADX seed, sharing one bar).

use crate::domain::PriceBar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Adx {
    window: usize,
    name: String,
}

impl Adx {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "ADX window must be >= 1");
        Self {
            window,
            name: format!("adx_{window}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.window - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        if n < 2 {
            return vec![f64::NAN; n];
        }

        // Directional movement; index 0 has no prior bar.
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let up = bars[i].high - bars[i - 1].high;
            let down = bars[i - 1].low - bars[i].low;
            plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
        }

        let tr = true_range(bars);
        let smooth_tr = wilder_smooth(&tr, self.window);
        let smooth_plus = wilder_smooth(&plus_dm, self.window);
        let smooth_minus = wilder_smooth(&minus_dm, self.window);

        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if smooth_tr[i].is_nan() || smooth_tr[i] == 0.0 {
                continue;
            }
            let plus_di = 100.0 * smooth_plus[i] / smooth_tr[i];
            let minus_di = 100.0 * smooth_minus[i] / smooth_tr[i];
            let di_sum = plus_di + minus_di;
            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };
        }

        wilder_smooth(&dx, self.window)
    }
}

/// True range: max(high - low, |high - prev_close|, |low - prev_close|).
/// Index 0 is undefined (no prior close).
fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let prev_close = bars[i - 1].close;
        tr[i] = (bars[i].high - bars[i].low)
            .max((bars[i].high - prev_close).abs())
            .max((bars[i].low - prev_close).abs());
    }
    tr
}

/// Wilder smoothing over a series with an optional NaN prefix.
///
/// Seeds with the mean of the first `window` defined values, then
/// S[t] = S[t-1] + (x[t] - S[t-1]) / window.
fn wilder_smooth(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    if n - start < window {
        return out;
    }

    let seed: f64 = values[start..start + window].iter().sum::<f64>() / window as f64;
    out[start + window - 1] = seed;

    let mut prev = seed;
    for i in (start + window)..n {
        prev += (values[i] - prev) / window as f64;
        out[i] = prev;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    fn choppy_bars() -> Vec<PriceBar> {
        make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ])
    }

    #[test]
    fn adx_bounds() {
        let result = Adx::new(3).compute(&choppy_bars());
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn adx_elevated_in_strong_trend() {
        let data: Vec<(f64, f64, f64, f64)> = (0..20)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0)
            })
            .collect();
        let bars = make_ohlc_bars(&data);
        let result = Adx::new(5).compute(&bars);

        let last = result.iter().rev().find(|v| !v.is_nan());
        assert!(last.is_some());
        if let Some(&v) = last {
            assert!(v > 20.0, "ADX should be elevated in a strong trend, got {v}");
        }
    }

    #[test]
    fn adx_undefined_through_double_warmup() {
        let result = Adx::new(3).compute(&choppy_bars());
        // TR/DM defined from 1, DI seed at 3, DX from 3, ADX seed at 5.
        for (i, v) in result.iter().enumerate().take(5) {
            assert!(v.is_nan(), "expected undefined at index {i}");
        }
        assert!(!result[5].is_nan());
    }

    #[test]
    fn adx_too_few_bars() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0)]);
        let result = Adx::new(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn wilder_smooth_seed_is_mean() {
        let values = [f64::NAN, 2.0, 4.0, 6.0, 8.0];
        let smoothed = wilder_smooth(&values, 3);
        assert!(smoothed[0].is_nan());
        assert!(smoothed[2].is_nan());
        // Seed at index 3: mean(2,4,6) = 4; next: 4 + (8-4)/3
        assert_approx(smoothed[3], 4.0, DEFAULT_EPSILON);
        assert_approx(smoothed[4], 4.0 + 4.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).lookback(), 27);
        assert_eq!(Adx::new(3).lookback(), 5);
    }
}
