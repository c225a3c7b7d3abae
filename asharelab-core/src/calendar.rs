//! Trading-day resolution against an exchange calendar.
//!
//! The calendar is an externally sourced table of open dates covering a
//! bounded window (default: the Shanghai/Shenzhen A-share calendar).
//! Membership is binary and never inferred from price data presence. Every
//! query outside the loaded window fails with `InvalidDateRange` — there is
//! no clamping and no guessing past the table's edges.

use chrono::{NaiveDate, NaiveTime, Timelike};
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use thiserror::Error;

/// Minutes since midnight of the A-share session open (09:30).
const SESSION_OPEN_MINUTES: u32 = 9 * 60 + 30;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("date {date} outside loaded calendar window {first}..={last}")]
    InvalidDateRange {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },
    #[error("calendar window is empty or inverted")]
    EmptyWindow,
}

/// Exchange trading calendar over a loaded window of dates.
///
/// Holds the set of open dates plus the bounds the backing source covered;
/// closed days inside the window are represented by absence from the set.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    open_days: BTreeSet<NaiveDate>,
    first: NaiveDate,
    last: NaiveDate,
}

impl TradingCalendar {
    /// Build from the loaded window bounds and the open dates inside it.
    ///
    /// Open dates outside `[first, last]` are discarded — the window is what
    /// the source actually covered, not what the rows happen to span.
    pub fn new(
        first: NaiveDate,
        last: NaiveDate,
        open_days: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, CalendarError> {
        if first > last {
            return Err(CalendarError::EmptyWindow);
        }
        let open_days = open_days
            .into_iter()
            .filter(|d| *d >= first && *d <= last)
            .collect();
        Ok(Self {
            open_days,
            first,
            last,
        })
    }

    /// First date of the loaded window (inclusive).
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Last date of the loaded window (inclusive).
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Number of open days in the loaded window.
    pub fn open_day_count(&self) -> usize {
        self.open_days.len()
    }

    fn check_bounds(&self, date: NaiveDate) -> Result<(), CalendarError> {
        if date < self.first || date > self.last {
            return Err(CalendarError::InvalidDateRange {
                date,
                first: self.first,
                last: self.last,
            });
        }
        Ok(())
    }

    /// Whether the market is open on `date`.
    pub fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        self.check_bounds(date)?;
        Ok(self.open_days.contains(&date))
    }

    /// Latest open day strictly before `date`.
    ///
    /// Always steps at least one day back before testing, even when `date`
    /// itself is a trading day. Walking past the window start is
    /// `InvalidDateRange`.
    pub fn previous_trading_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.check_bounds(date)?;
        self.open_days
            .range(..date)
            .next_back()
            .copied()
            .ok_or(CalendarError::InvalidDateRange {
                date,
                first: self.first,
                last: self.last,
            })
    }

    /// Earliest open day strictly after `date`.
    pub fn next_trading_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.check_bounds(date)?;
        self.open_days
            .range((Excluded(date), Unbounded))
            .next()
            .copied()
            .ok_or(CalendarError::InvalidDateRange {
                date,
                first: self.first,
                last: self.last,
            })
    }

    /// Latest open day on or before `date`.
    pub fn most_recent_trading_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.check_bounds(date)?;
        self.open_days
            .range(..=date)
            .next_back()
            .copied()
            .ok_or(CalendarError::InvalidDateRange {
                date,
                first: self.first,
                last: self.last,
            })
    }

    /// The trading day a timestamped analysis run refers to.
    ///
    /// Before the 09:30 session open on a trading day the screener tables
    /// still describe the previous session, so reports resolve to the
    /// previous trading day. On a closed day this is the most recent open
    /// day.
    pub fn session_reference_day(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<NaiveDate, CalendarError> {
        if self.is_trading_day(date)? {
            if time.hour() * 60 + time.minute() < SESSION_OPEN_MINUTES {
                self.previous_trading_day(date)
            } else {
                Ok(date)
            }
        } else {
            self.most_recent_trading_day(date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Two trading weeks in October 2024; 2024-10-07 is a holiday Monday
    /// (National Day week tail), weekends closed.
    fn october_calendar() -> TradingCalendar {
        let open = [
            d(2024, 10, 8),
            d(2024, 10, 9),
            d(2024, 10, 10),
            d(2024, 10, 11),
            d(2024, 10, 14),
            d(2024, 10, 15),
            d(2024, 10, 16),
            d(2024, 10, 17),
            d(2024, 10, 18),
        ];
        TradingCalendar::new(d(2024, 10, 1), d(2024, 10, 20), open).unwrap()
    }

    #[test]
    fn membership() {
        let cal = october_calendar();
        assert!(cal.is_trading_day(d(2024, 10, 8)).unwrap());
        assert!(!cal.is_trading_day(d(2024, 10, 7)).unwrap()); // holiday
        assert!(!cal.is_trading_day(d(2024, 10, 12)).unwrap()); // Saturday
    }

    #[test]
    fn previous_steps_back_even_from_trading_day() {
        let cal = october_calendar();
        // Monday 10-14 is itself a trading day; previous is Friday 10-11.
        assert_eq!(
            cal.previous_trading_day(d(2024, 10, 14)).unwrap(),
            d(2024, 10, 11)
        );
    }

    #[test]
    fn previous_from_weekend_skips_to_friday() {
        let cal = october_calendar();
        assert_eq!(
            cal.previous_trading_day(d(2024, 10, 13)).unwrap(),
            d(2024, 10, 11)
        );
    }

    #[test]
    fn next_skips_weekend() {
        let cal = october_calendar();
        assert_eq!(
            cal.next_trading_day(d(2024, 10, 11)).unwrap(),
            d(2024, 10, 14)
        );
    }

    #[test]
    fn most_recent_on_open_day_is_itself() {
        let cal = october_calendar();
        assert_eq!(
            cal.most_recent_trading_day(d(2024, 10, 15)).unwrap(),
            d(2024, 10, 15)
        );
        assert_eq!(
            cal.most_recent_trading_day(d(2024, 10, 13)).unwrap(),
            d(2024, 10, 11)
        );
    }

    #[test]
    fn out_of_window_is_invalid_range() {
        let cal = october_calendar();
        assert!(matches!(
            cal.is_trading_day(d(2024, 9, 30)),
            Err(CalendarError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            cal.next_trading_day(d(2024, 11, 1)),
            Err(CalendarError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn previous_before_earliest_open_day_fails() {
        let cal = october_calendar();
        // In-window, but no open day exists before it.
        assert!(matches!(
            cal.previous_trading_day(d(2024, 10, 5)),
            Err(CalendarError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn next_past_last_open_day_fails() {
        let cal = october_calendar();
        assert!(matches!(
            cal.next_trading_day(d(2024, 10, 19)),
            Err(CalendarError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn session_reference_before_open_uses_previous_day() {
        let cal = october_calendar();
        let pre_open = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        let mid_session = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(
            cal.session_reference_day(d(2024, 10, 15), pre_open).unwrap(),
            d(2024, 10, 14)
        );
        assert_eq!(
            cal.session_reference_day(d(2024, 10, 15), mid_session)
                .unwrap(),
            d(2024, 10, 15)
        );
    }

    #[test]
    fn session_reference_on_closed_day_is_most_recent() {
        let cal = october_calendar();
        let any_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(
            cal.session_reference_day(d(2024, 10, 12), any_time).unwrap(),
            d(2024, 10, 11)
        );
    }

    #[test]
    fn inverted_window_rejected() {
        let err = TradingCalendar::new(d(2024, 2, 1), d(2024, 1, 1), []);
        assert_eq!(err.unwrap_err(), CalendarError::EmptyWindow);
    }

    #[test]
    fn out_of_window_open_days_discarded() {
        let cal = TradingCalendar::new(
            d(2024, 10, 1),
            d(2024, 10, 20),
            [d(2024, 9, 30), d(2024, 10, 8)],
        )
        .unwrap();
        assert_eq!(cal.open_day_count(), 1);
    }
}
