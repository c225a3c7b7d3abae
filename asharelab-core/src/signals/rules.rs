//! Concrete classification rules.
//!
//! Each rule AND-combines its predicates; whenever a referenced indicator is
//! undefined at the evaluated bar the rule is `Neutral` for that bar. Names
//! carry the parameterization so two differently-tuned instances never
//! collide in a report.

use crate::domain::{PriceBar, SignalKind};
use crate::engine::IndicatorPanel;
use crate::indicators::{Adx, Bollinger, Indicator, Kdj, Macd, Rsi, Sma};
use crate::signals::cross::{cross_at, Cross};
use crate::signals::Rule;

/// Golden/death cross of a fast SMA over a slow SMA.
#[derive(Debug, Clone)]
pub struct MaCrossRule {
    fast: usize,
    slow: usize,
    fast_name: String,
    slow_name: String,
    name: String,
}

impl MaCrossRule {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1, "fast window must be >= 1");
        assert!(slow > fast, "slow window must be > fast");
        Self {
            fast,
            slow,
            fast_name: Sma::new(fast).name().to_string(),
            slow_name: Sma::new(slow).name().to_string(),
            name: format!("ma_cross_{fast}_{slow}"),
        }
    }
}

impl Rule for MaCrossRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Sma::new(self.fast)), Box::new(Sma::new(self.slow))]
    }

    fn evaluate(&self, _bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let (Some(fast), Some(slow)) = (
            panel.raw_series(&self.fast_name),
            panel.raw_series(&self.slow_name),
        ) else {
            return SignalKind::Neutral;
        };
        match cross_at(fast, slow, index) {
            Some(Cross::Golden) => SignalKind::Buy,
            Some(Cross::Death) => SignalKind::Sell,
            None => SignalKind::Neutral,
        }
    }
}

/// MACD above its signal line, confirmed by close above a trend SMA.
#[derive(Debug, Clone)]
pub struct MacdTrendRule {
    fast: usize,
    slow: usize,
    signal_window: usize,
    trend: usize,
    macd_name: String,
    signal_name: String,
    trend_name: String,
    name: String,
}

impl MacdTrendRule {
    pub fn new(fast: usize, slow: usize, signal_window: usize, trend: usize) -> Self {
        Self {
            fast,
            slow,
            signal_window,
            trend,
            macd_name: Macd::macd(fast, slow, signal_window).name().to_string(),
            signal_name: Macd::signal(fast, slow, signal_window).name().to_string(),
            trend_name: Sma::new(trend).name().to_string(),
            name: format!("macd_trend_{fast}_{slow}_{signal_window}_{trend}"),
        }
    }
}

impl Rule for MacdTrendRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Macd::macd(self.fast, self.slow, self.signal_window)),
            Box::new(Macd::signal(self.fast, self.slow, self.signal_window)),
            Box::new(Sma::new(self.trend)),
        ]
    }

    fn evaluate(&self, bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let Some(bar) = bars.get(index) else {
            return SignalKind::Neutral;
        };
        let (Some(macd), Some(signal), Some(trend)) = (
            panel.at(&self.macd_name, index),
            panel.at(&self.signal_name, index),
            panel.at(&self.trend_name, index),
        ) else {
            return SignalKind::Neutral;
        };

        if macd > signal && bar.close > trend {
            SignalKind::Buy
        } else if macd < signal && bar.close < trend {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }
}

/// MA regime gated by RSI: trend-following entries only while RSI is not
/// stretched.
#[derive(Debug, Clone)]
pub struct RsiMaRule {
    fast: usize,
    slow: usize,
    rsi_window: usize,
    overbought: f64,
    oversold: f64,
    fast_name: String,
    slow_name: String,
    rsi_name: String,
    name: String,
}

impl RsiMaRule {
    pub fn new(fast: usize, slow: usize, rsi_window: usize, overbought: f64, oversold: f64) -> Self {
        assert!(overbought > oversold, "overbought must exceed oversold");
        Self {
            fast,
            slow,
            rsi_window,
            overbought,
            oversold,
            fast_name: Sma::new(fast).name().to_string(),
            slow_name: Sma::new(slow).name().to_string(),
            rsi_name: Rsi::new(rsi_window).name().to_string(),
            name: format!("rsi_ma_{fast}_{slow}_{rsi_window}"),
        }
    }
}

impl Rule for RsiMaRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(self.fast)),
            Box::new(Sma::new(self.slow)),
            Box::new(Rsi::new(self.rsi_window)),
        ]
    }

    fn evaluate(&self, _bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let (Some(fast), Some(slow), Some(rsi)) = (
            panel.at(&self.fast_name, index),
            panel.at(&self.slow_name, index),
            panel.at(&self.rsi_name, index),
        ) else {
            return SignalKind::Neutral;
        };

        if fast > slow && rsi < self.overbought {
            SignalKind::Buy
        } else if fast < slow && rsi > self.oversold {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }
}

/// Mean reversion at the Bollinger bands, confirmed by a stretched RSI.
#[derive(Debug, Clone)]
pub struct BollingerRsiRule {
    window: usize,
    k: f64,
    rsi_window: usize,
    overbought: f64,
    oversold: f64,
    upper_name: String,
    lower_name: String,
    rsi_name: String,
    name: String,
}

impl BollingerRsiRule {
    pub fn new(window: usize, k: f64, rsi_window: usize, overbought: f64, oversold: f64) -> Self {
        assert!(overbought > oversold, "overbought must exceed oversold");
        Self {
            window,
            k,
            rsi_window,
            overbought,
            oversold,
            upper_name: Bollinger::upper(window, k).name().to_string(),
            lower_name: Bollinger::lower(window, k).name().to_string(),
            rsi_name: Rsi::new(rsi_window).name().to_string(),
            name: format!("bollinger_rsi_{window}_{k}_{rsi_window}"),
        }
    }
}

impl Rule for BollingerRsiRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Bollinger::upper(self.window, self.k)),
            Box::new(Bollinger::lower(self.window, self.k)),
            Box::new(Rsi::new(self.rsi_window)),
        ]
    }

    fn evaluate(&self, bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let Some(bar) = bars.get(index) else {
            return SignalKind::Neutral;
        };
        let (Some(upper), Some(lower), Some(rsi)) = (
            panel.at(&self.upper_name, index),
            panel.at(&self.lower_name, index),
            panel.at(&self.rsi_name, index),
        ) else {
            return SignalKind::Neutral;
        };

        if bar.close < lower && rsi < self.oversold {
            SignalKind::Buy
        } else if bar.close > upper && rsi > self.overbought {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }
}

/// MA regime gated by ADX trend strength: act only when a trend exists.
#[derive(Debug, Clone)]
pub struct AdxTrendRule {
    fast: usize,
    slow: usize,
    adx_window: usize,
    threshold: f64,
    fast_name: String,
    slow_name: String,
    adx_name: String,
    name: String,
}

impl AdxTrendRule {
    pub fn new(fast: usize, slow: usize, adx_window: usize, threshold: f64) -> Self {
        Self {
            fast,
            slow,
            adx_window,
            threshold,
            fast_name: Sma::new(fast).name().to_string(),
            slow_name: Sma::new(slow).name().to_string(),
            adx_name: Adx::new(adx_window).name().to_string(),
            name: format!("adx_trend_{fast}_{slow}_{adx_window}"),
        }
    }
}

impl Rule for AdxTrendRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(self.fast)),
            Box::new(Sma::new(self.slow)),
            Box::new(Adx::new(self.adx_window)),
        ]
    }

    fn evaluate(&self, _bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let (Some(fast), Some(slow), Some(adx)) = (
            panel.at(&self.fast_name, index),
            panel.at(&self.slow_name, index),
            panel.at(&self.adx_name, index),
        ) else {
            return SignalKind::Neutral;
        };

        if adx <= self.threshold {
            return SignalKind::Neutral;
        }
        if fast > slow {
            SignalKind::Buy
        } else if fast < slow {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }
}

/// Three-way confirmation: MACD momentum, trend SMA regime, RSI gate.
#[derive(Debug, Clone)]
pub struct MacdRsiMaRule {
    fast: usize,
    slow: usize,
    signal_window: usize,
    trend: usize,
    rsi_window: usize,
    overbought: f64,
    oversold: f64,
    macd_name: String,
    signal_name: String,
    trend_name: String,
    rsi_name: String,
    name: String,
}

impl MacdRsiMaRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fast: usize,
        slow: usize,
        signal_window: usize,
        trend: usize,
        rsi_window: usize,
        overbought: f64,
        oversold: f64,
    ) -> Self {
        assert!(overbought > oversold, "overbought must exceed oversold");
        Self {
            fast,
            slow,
            signal_window,
            trend,
            rsi_window,
            overbought,
            oversold,
            macd_name: Macd::macd(fast, slow, signal_window).name().to_string(),
            signal_name: Macd::signal(fast, slow, signal_window).name().to_string(),
            trend_name: Sma::new(trend).name().to_string(),
            rsi_name: Rsi::new(rsi_window).name().to_string(),
            name: format!("macd_rsi_ma_{fast}_{slow}_{signal_window}_{trend}_{rsi_window}"),
        }
    }
}

impl Rule for MacdRsiMaRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Macd::macd(self.fast, self.slow, self.signal_window)),
            Box::new(Macd::signal(self.fast, self.slow, self.signal_window)),
            Box::new(Sma::new(self.trend)),
            Box::new(Rsi::new(self.rsi_window)),
        ]
    }

    fn evaluate(&self, bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let Some(bar) = bars.get(index) else {
            return SignalKind::Neutral;
        };
        let (Some(macd), Some(signal), Some(trend), Some(rsi)) = (
            panel.at(&self.macd_name, index),
            panel.at(&self.signal_name, index),
            panel.at(&self.trend_name, index),
            panel.at(&self.rsi_name, index),
        ) else {
            return SignalKind::Neutral;
        };

        if macd > signal && bar.close > trend && rsi < self.overbought {
            SignalKind::Buy
        } else if macd < signal && bar.close < trend && rsi > self.oversold {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }
}

/// K line crossing the D line: golden cross buys, death cross sells.
#[derive(Debug, Clone)]
pub struct KdjCrossRule {
    n: usize,
    m1: usize,
    m2: usize,
    k_name: String,
    d_name: String,
    name: String,
}

impl KdjCrossRule {
    pub fn new(n: usize, m1: usize, m2: usize) -> Self {
        Self {
            n,
            m1,
            m2,
            k_name: Kdj::k(n, m1, m2).name().to_string(),
            d_name: Kdj::d(n, m1, m2).name().to_string(),
            name: format!("kdj_cross_{n}_{m1}_{m2}"),
        }
    }
}

impl Rule for KdjCrossRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Kdj::k(self.n, self.m1, self.m2)),
            Box::new(Kdj::d(self.n, self.m1, self.m2)),
        ]
    }

    fn evaluate(&self, _bars: &[PriceBar], index: usize, panel: &IndicatorPanel) -> SignalKind {
        let (Some(k), Some(d)) = (
            panel.raw_series(&self.k_name),
            panel.raw_series(&self.d_name),
        ) else {
            return SignalKind::Neutral;
        };
        match cross_at(k, d, index) {
            Some(Cross::Golden) => SignalKind::Buy,
            Some(Cross::Death) => SignalKind::Sell,
            None => SignalKind::Neutral,
        }
    }
}
