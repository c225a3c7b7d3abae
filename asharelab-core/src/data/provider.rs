//! Collaborator traits and structured data errors.
//!
//! The core operates on complete in-memory tables. These traits abstract
//! the external providers that produce them (vendor HTTP pulls, CSV
//! exports) so implementations can be swapped and mocked for tests.
//! Timeouts, retries, and backoff live behind the trait, never in the core:
//! on provider failure the core receives nothing and does not proceed.

use crate::calendar::{CalendarError, TradingCalendar};
use crate::domain::{LimitUpRecord, MalformedReasonTag, PriceBar};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for the data boundary.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("series for {symbol} is missing expected trading day {date}")]
    MissingTradingDay { symbol: String, date: NaiveDate },

    #[error("series for {symbol} is not strictly ascending at {date}")]
    UnsortedSeries { symbol: String, date: NaiveDate },

    #[error("series for {symbol} has a bar on closed day {date}")]
    BarOnClosedDay { symbol: String, date: NaiveDate },

    #[error("missing column '{column}' in {origin}")]
    MissingColumn { column: String, origin: String },

    #[error("{origin} row {row}: {message}")]
    BadRow {
        origin: String,
        row: usize,
        message: String,
    },

    #[error(transparent)]
    MalformedReasonTag(#[from] MalformedReasonTag),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daily OHLCV history for one symbol over a date range.
pub trait PriceHistoryProvider: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError>;
}

/// Exchange open/closed table for a configurable window.
pub trait CalendarSource: Send + Sync {
    fn load(&self, start: NaiveDate, end: NaiveDate) -> Result<TradingCalendar, DataError>;
}

/// Limit-up screener table for one trading day.
///
/// Absence of data for a date is a valid empty table, not an error.
pub trait LimitUpScreener: Send + Sync {
    fn fetch(&self, date: NaiveDate) -> Result<Vec<LimitUpRecord>, DataError>;
}
