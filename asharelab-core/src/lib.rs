//! AShareLab Core — typed domain records, trading calendar, indicator
//! engine, signal rules, and limit-up aggregation for A-share analysis.
//!
//! The core is pure and synchronous: complete in-memory tables in, derived
//! series and reports out. It performs no I/O of its own beyond the CSV
//! boundary in `data`; fetching, chart rendering, and dashboards are
//! external collaborators behind the `data::provider` traits.
//!
//! - Domain types (price bars, limit-up records, signals)
//! - Trading calendar with previous/next/most-recent resolution
//! - Indicator trait and precomputed per-symbol panels
//! - Crossover and composite classification rules
//! - Limit-up reason-tag and promotion-rate aggregation

pub mod calendar;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod limitup;
pub mod signals;
