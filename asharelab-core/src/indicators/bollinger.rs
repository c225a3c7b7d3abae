//! Bollinger Bands — moving average +/- k standard deviations.
//!
//! - Middle: SMA(close, window)
//! - Upper:  middle + k * stddev(close, window)
//! - Lower:  middle - k * stddev(close, window)
//!
//! Uses population stddev (divide by N). Exposed as one named instance per
//! band. Lookback: window - 1.

use crate::domain::PriceBar;
use crate::indicators::Indicator;

/// Which Bollinger band to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    k: f64,
    band: Band,
    name: String,
}

impl Bollinger {
    pub fn upper(window: usize, k: f64) -> Self {
        Self::with_band(window, k, Band::Upper)
    }

    pub fn middle(window: usize, k: f64) -> Self {
        Self::with_band(window, k, Band::Middle)
    }

    pub fn lower(window: usize, k: f64) -> Self {
        Self::with_band(window, k, Band::Lower)
    }

    fn with_band(window: usize, k: f64, band: Band) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        assert!(k >= 0.0, "Bollinger k must be >= 0");
        let tag = match band {
            Band::Upper => "boll_upper",
            Band::Middle => "boll_middle",
            Band::Lower => "boll_lower",
        };
        Self {
            window,
            k,
            band,
            name: format!("{tag}_{window}_{k}"),
        }
    }
}

impl Indicator for Bollinger {
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

        for i in (self.window - 1)..n {
            let window = &bars[i + 1 - self.window..=i];
            let mean: f64 =
                window.iter().map(|b| b.close).sum::<f64>() / self.window as f64;

            out[i] = match self.band {
                Band::Middle => mean,
                Band::Upper | Band::Lower => {
                    let variance = window
                        .iter()
                        .map(|b| {
                            let diff = b.close - mean;
                            diff * diff
                        })
                        .sum::<f64>()
                        / self.window as f64;
                    let offset = self.k * variance.sqrt();
                    if self.band == Band::Upper {
                        mean + offset
                    } else {
                        mean - offset
                    }
                }
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn middle_band_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::middle(3, 2.0).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_are_symmetric_about_middle() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Bollinger::middle(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        for i in 2..5 {
            assert_approx(upper[i] - middle[i], middle[i] - lower[i], DEFAULT_EPSILON);
            assert!(upper[i] > lower[i]);
        }
    }

    #[test]
    fn known_population_stddev() {
        // Window [10, 12, 14]: mean 12, variance (4+0+4)/3, stddev sqrt(8/3)
        let bars = make_bars(&[10.0, 12.0, 14.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        assert_approx(upper[2], 12.0 + 2.0 * (8.0f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn constant_price_collapses_bands() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn series_shorter_than_window_all_undefined() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Bollinger::upper(20, 2.0).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}
