//! Discrete trade signals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a classified signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Buy,
    Sell,
    Neutral,
}

/// One rule verdict for one trading day.
///
/// Derived, never persisted; recomputed on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub kind: SignalKind,
    /// Name of the rule that produced this verdict.
    pub rationale: String,
}
