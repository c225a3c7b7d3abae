//! Analysis configuration — TOML-serializable parameter set.
//!
//! Replaces the ambient per-script globals of ad-hoc analysis with one
//! explicit, round-trippable document. Defaults match the conventional
//! A-share parameters: 20/50 MAs, RSI 14 with 70/30 bands, MACD 12/26/9,
//! KDJ 9/3/3, Bollinger 20/2, ADX 14 with a 25 threshold.

use crate::indicators::{Adx, Bollinger, FiveDayLine, Indicator, Kdj, Macd, Rsi, Sma};
use crate::signals::{
    AdxTrendRule, BollingerRsiRule, KdjCrossRule, MaCrossRule, MacdRsiMaRule, MacdTrendRule,
    Rule, RsiMaRule,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown rule '{0}' (valid: ma_cross, macd_trend, rsi_ma, bollinger_rsi, adx_trend, macd_rsi_ma, kdj_cross)")]
    UnknownRule(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaParams {
    pub fast: usize,
    pub slow: usize,
}

impl Default for MaParams {
    fn default() -> Self {
        Self { fast: 20, slow: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub window: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            window: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdjParams {
    pub n: usize,
    pub m1: usize,
    pub m2: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self { n: 9, m1: 3, m2: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub window: usize,
    pub k: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self { window: 20, k: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxParams {
    pub window: usize,
    pub threshold: f64,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self {
            window: 14,
            threshold: 25.0,
        }
    }
}

/// The full parameter set for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ma: MaParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub kdj: KdjParams,
    pub bollinger: BollingerParams,
    pub adx: AdxParams,
    /// Which classification rule `build_rule` constructs.
    pub rule: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma: MaParams::default(),
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            kdj: KdjParams::default(),
            bollinger: BollingerParams::default(),
            adx: AdxParams::default(),
            rule: "ma_cross".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the configured classification rule.
    pub fn build_rule(&self) -> Result<Box<dyn Rule>, ConfigError> {
        let rule: Box<dyn Rule> = match self.rule.as_str() {
            "ma_cross" => Box::new(MaCrossRule::new(self.ma.fast, self.ma.slow)),
            "macd_trend" => Box::new(MacdTrendRule::new(
                self.macd.fast,
                self.macd.slow,
                self.macd.signal,
                self.ma.slow,
            )),
            "rsi_ma" => Box::new(RsiMaRule::new(
                self.ma.fast,
                self.ma.slow,
                self.rsi.window,
                self.rsi.overbought,
                self.rsi.oversold,
            )),
            "bollinger_rsi" => Box::new(BollingerRsiRule::new(
                self.bollinger.window,
                self.bollinger.k,
                self.rsi.window,
                self.rsi.overbought,
                self.rsi.oversold,
            )),
            "adx_trend" => Box::new(AdxTrendRule::new(
                self.ma.fast,
                self.ma.slow,
                self.adx.window,
                self.adx.threshold,
            )),
            "macd_rsi_ma" => Box::new(MacdRsiMaRule::new(
                self.macd.fast,
                self.macd.slow,
                self.macd.signal,
                self.ma.slow,
                self.rsi.window,
                self.rsi.overbought,
                self.rsi.oversold,
            )),
            "kdj_cross" => Box::new(KdjCrossRule::new(self.kdj.n, self.kdj.m1, self.kdj.m2)),
            other => return Err(ConfigError::UnknownRule(other.to_string())),
        };
        Ok(rule)
    }

    /// The full indicator set for a panel report.
    pub fn panel_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(self.ma.fast)),
            Box::new(Sma::new(self.ma.slow)),
            Box::new(FiveDayLine::new()),
            Box::new(Rsi::new(self.rsi.window)),
            Box::new(Macd::macd(self.macd.fast, self.macd.slow, self.macd.signal)),
            Box::new(Macd::signal(self.macd.fast, self.macd.slow, self.macd.signal)),
            Box::new(Macd::histogram(self.macd.fast, self.macd.slow, self.macd.signal)),
            Box::new(Kdj::k(self.kdj.n, self.kdj.m1, self.kdj.m2)),
            Box::new(Kdj::d(self.kdj.n, self.kdj.m1, self.kdj.m2)),
            Box::new(Kdj::j(self.kdj.n, self.kdj.m1, self.kdj.m2)),
            Box::new(Bollinger::upper(self.bollinger.window, self.bollinger.k)),
            Box::new(Bollinger::middle(self.bollinger.window, self.bollinger.k)),
            Box::new(Bollinger::lower(self.bollinger.window, self.bollinger.k)),
            Box::new(Adx::new(self.adx.window)),
        ]
    }
}
