//! KDJ stochastic oscillator.
//!
//! RSV[t] = (close[t] - min(low, n)) / (max(high, n) - min(low, n)) * 100
//! K = (m1-1)/m1 * K[-1] + 1/m1 * RSV   (seeded at the first defined RSV)
//! D = (m2-1)/m2 * D[-1] + 1/m2 * K     (seeded at the first K)
//! J = 3K - 2D
//!
//! RSV is undefined until the n-day window fills, like every other
//! window-based indicator here; the pandas renditions that start at the
//! first bar (min_periods=1) deliberately differ. A zero-range window
//! (rolling high == rolling low) pins RSV at 50 instead of dividing by
//! zero.
//!
//! Exposed as one named instance per line. Lookback: n - 1 for all three.

use crate::domain::PriceBar;
use crate::indicators::Indicator;

/// Which line of the KDJ oscillator to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdjLine {
    K,
    D,
    J,
}

#[derive(Debug, Clone)]
pub struct Kdj {
    n: usize,
    m1: usize,
    m2: usize,
    line: KdjLine,
    name: String,
}

impl Kdj {
    pub fn k(n: usize, m1: usize, m2: usize) -> Self {
        Self::with_line(n, m1, m2, KdjLine::K)
    }

    pub fn d(n: usize, m1: usize, m2: usize) -> Self {
        Self::with_line(n, m1, m2, KdjLine::D)
    }

    pub fn j(n: usize, m1: usize, m2: usize) -> Self {
        Self::with_line(n, m1, m2, KdjLine::J)
    }

    fn with_line(n: usize, m1: usize, m2: usize, line: KdjLine) -> Self {
        assert!(n >= 1, "KDJ window must be >= 1");
        assert!(m1 >= 1, "KDJ m1 must be >= 1");
        assert!(m2 >= 1, "KDJ m2 must be >= 1");
        let tag = match line {
            KdjLine::K => "kdj_k",
            KdjLine::D => "kdj_d",
            KdjLine::J => "kdj_j",
        };
        Self {
            n,
            m1,
            m2,
            line,
            name: format!("{tag}_{n}_{m1}_{m2}"),
        }
    }
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.n - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let len = bars.len();
        let mut out = vec![f64::NAN; len];
        if len < self.n {
            return out;
        }

        let mut k = 0.0;
        let mut d = 0.0;
        for i in (self.n - 1)..len {
            let window = &bars[i + 1 - self.n..=i];
            let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let high = window
                .iter()
                .map(|b| b.high)
                .fold(f64::NEG_INFINITY, f64::max);
            let range = high - low;
            let rsv = if range == 0.0 {
                50.0
            } else {
                (bars[i].close - low) / range * 100.0
            };

            if i == self.n - 1 {
                k = rsv;
                d = k;
            } else {
                k = ((self.m1 - 1) as f64 * k + rsv) / self.m1 as f64;
                d = ((self.m2 - 1) as f64 * d + k) / self.m2 as f64;
            }

            out[i] = match self.line {
                KdjLine::K => k,
                KdjLine::D => d,
                KdjLine::J => 3.0 * k - 2.0 * d,
            };
        }
        out
    }
}
