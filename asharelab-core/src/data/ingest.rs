//! CSV ingestion of vendor exports.
//!
//! Header resolution happens once per file: each logical field accepts the
//! vendor's Chinese header, its bracketed per-day form
//! (`连续涨停天数[20241022]`), or a plain English alias. Everything past
//! this module sees typed records only.

use crate::calendar::TradingCalendar;
use crate::data::provider::DataError;
use crate::domain::{parse_reason_tags, LimitUpRecord, PriceBar};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_HEADERS: &[&str] = &["日期", "date", "trade_date"];
const OPEN_HEADERS: &[&str] = &["开盘", "open"];
const HIGH_HEADERS: &[&str] = &["最高", "high"];
const LOW_HEADERS: &[&str] = &["最低", "low"];
const CLOSE_HEADERS: &[&str] = &["收盘", "close"];
const VOLUME_HEADERS: &[&str] = &["成交量", "volume", "vol"];

const CAL_DATE_HEADERS: &[&str] = &["cal_date", "日期", "date"];
const CAL_OPEN_HEADERS: &[&str] = &["is_open", "是否开市"];

const SYMBOL_HEADERS: &[&str] = &["股票代码", "code", "symbol"];
const NAME_HEADERS: &[&str] = &["股票简称", "name", "display_name"];
const STREAK_HEADERS: &[&str] = &["连续涨停天数", "连板天数", "streak", "streak_length"];
const REASON_HEADERS: &[&str] = &["涨停原因类别", "reason", "reason_tags"];

/// Find a logical field among the file's headers.
///
/// Matches an exact header or the vendor's bracketed per-day form
/// (`candidate[YYYYMMDD]`). The first header cell may carry a BOM.
fn resolve_column(
    headers: &StringRecord,
    candidates: &[&str],
    source: &str,
) -> Result<usize, DataError> {
    for (index, raw) in headers.iter().enumerate() {
        let header = raw.trim_start_matches('\u{feff}').trim();
        for candidate in candidates {
            if header == *candidate || header.starts_with(&format!("{candidate}[")) {
                return Ok(index);
            }
        }
    }
    Err(DataError::MissingColumn {
        column: candidates[0].to_string(),
        origin: source.to_string(),
    })
}

fn try_resolve_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    resolve_column(headers, candidates, "").ok()
}

/// Accept both ISO (`2024-10-22`) and vendor-compact (`20241022`) dates.
fn parse_date(text: &str, source: &str, row: usize) -> Result<NaiveDate, DataError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
        .map_err(|_| DataError::BadRow {
            origin: source.to_string(),
            row,
            message: format!("unparseable date {text:?}"),
        })
}

fn parse_f64(text: &str, field: &str, source: &str, row: usize) -> Result<f64, DataError> {
    text.trim().parse::<f64>().map_err(|_| DataError::BadRow {
        origin: source.to_string(),
        row,
        message: format!("unparseable {field} {text:?}"),
    })
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

/// Read a daily OHLCV table.
///
/// Vendors deliver either sort order; rows are sorted ascending here and a
/// duplicate date is an `UnsortedSeries` error.
pub fn read_price_bars<R: Read>(
    reader: R,
    symbol: &str,
    source: &str,
) -> Result<Vec<PriceBar>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let date_col = resolve_column(&headers, DATE_HEADERS, source)?;
    let open_col = resolve_column(&headers, OPEN_HEADERS, source)?;
    let high_col = resolve_column(&headers, HIGH_HEADERS, source)?;
    let low_col = resolve_column(&headers, LOW_HEADERS, source)?;
    let close_col = resolve_column(&headers, CLOSE_HEADERS, source)?;
    let volume_col = resolve_column(&headers, VOLUME_HEADERS, source)?;

    let mut bars = Vec::new();
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let row_number = row_index + 2; // 1-based, after the header line
        // Vendors export volume as an integer or a float-formatted count.
        let volume_text = field(&row, volume_col);
        let volume = parse_f64(volume_text, "volume", source, row_number)? as u64;

        bars.push(PriceBar {
            symbol: symbol.to_string(),
            date: parse_date(field(&row, date_col), source, row_number)?,
            open: parse_f64(field(&row, open_col), "open", source, row_number)?,
            high: parse_f64(field(&row, high_col), "high", source, row_number)?,
            low: parse_f64(field(&row, low_col), "low", source, row_number)?,
            close: parse_f64(field(&row, close_col), "close", source, row_number)?,
            volume,
        });
    }

    bars.sort_by_key(|b| b.date);
    for pair in bars.windows(2) {
        if pair[1].date == pair[0].date {
            return Err(DataError::UnsortedSeries {
                symbol: symbol.to_string(),
                date: pair[1].date,
            });
        }
    }
    Ok(bars)
}

/// Read a daily OHLCV table from a file on disk.
pub fn load_price_bars(path: &Path, symbol: &str) -> Result<Vec<PriceBar>, DataError> {
    read_price_bars(File::open(path)?, symbol, &path.display().to_string())
}

/// Read an exchange calendar table (`cal_date`, `is_open`).
///
/// The loaded window is the span of the rows; queries outside it fail with
/// `InvalidDateRange` downstream.
pub fn read_calendar<R: Read>(reader: R, source: &str) -> Result<TradingCalendar, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let date_col = resolve_column(&headers, CAL_DATE_HEADERS, source)?;
    let open_col = resolve_column(&headers, CAL_OPEN_HEADERS, source)?;

    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;
    let mut open_days = Vec::new();

    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let row_number = row_index + 2;
        let date = parse_date(field(&row, date_col), source, row_number)?;
        first = Some(first.map_or(date, |d| d.min(date)));
        last = Some(last.map_or(date, |d| d.max(date)));

        let open_text = field(&row, open_col).trim();
        let is_open = matches!(open_text, "1" | "true" | "TRUE");
        if is_open {
            open_days.push(date);
        }
    }

    let (Some(first), Some(last)) = (first, last) else {
        return Err(DataError::BadRow {
            origin: source.to_string(),
            row: 1,
            message: "calendar table has no rows".to_string(),
        });
    };
    Ok(TradingCalendar::new(first, last, open_days)?)
}

/// Read an exchange calendar table from a file on disk.
pub fn load_calendar(path: &Path) -> Result<TradingCalendar, DataError> {
    read_calendar(File::open(path)?, &path.display().to_string())
}

/// A parsed limit-up screener table plus ingestion warnings.
#[derive(Debug, Clone)]
pub struct LimitUpTable {
    pub records: Vec<LimitUpRecord>,
    /// Rows whose reason string failed to parse: the tag contribution was
    /// skipped, the record itself kept.
    pub warnings: Vec<String>,
}

/// Read one day's limit-up screener export.
///
/// A file with headers and no rows is a valid empty table. The reason
/// column is optional; without it every record carries an empty tag set.
pub fn read_limit_up_table<R: Read>(
    reader: R,
    date: NaiveDate,
    source: &str,
) -> Result<LimitUpTable, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let symbol_col = resolve_column(&headers, SYMBOL_HEADERS, source)?;
    let name_col = resolve_column(&headers, NAME_HEADERS, source)?;
    let streak_col = resolve_column(&headers, STREAK_HEADERS, source)?;
    let reason_col = try_resolve_column(&headers, REASON_HEADERS);

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let row_number = row_index + 2;

        let streak_text = field(&row, streak_col);
        let streak_length = parse_f64(streak_text, "streak length", source, row_number)? as u32;
        if streak_length < 1 {
            return Err(DataError::BadRow {
                origin: source.to_string(),
                row: row_number,
                message: format!("streak length must be >= 1, got {streak_text:?}"),
            });
        }

        let reason_tags = match reason_col {
            Some(col) => match parse_reason_tags(field(&row, col)) {
                Ok(tags) => tags,
                Err(err) => {
                    warnings.push(format!(
                        "{source} row {row_number}: {err}; tag contribution skipped"
                    ));
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };

        records.push(LimitUpRecord {
            date,
            symbol: field(&row, symbol_col).trim().to_string(),
            display_name: field(&row, name_col).trim().to_string(),
            streak_length,
            reason_tags,
        });
    }

    Ok(LimitUpTable { records, warnings })
}

/// Read one day's limit-up screener export from a file on disk.
pub fn load_limit_up_table(path: &Path, date: NaiveDate) -> Result<LimitUpTable, DataError> {
    read_limit_up_table(File::open(path)?, date, &path.display().to_string())
}

/// Check a bar series against the exchange calendar.
///
/// Enforces three invariants: strictly ascending dates, no bar on a closed
/// day, and no calendar-expected trading day missing from the series.
pub fn validate_series(bars: &[PriceBar], calendar: &TradingCalendar) -> Result<(), DataError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DataError::UnsortedSeries {
                symbol: pair[1].symbol.clone(),
                date: pair[1].date,
            });
        }
    }

    let Some(first_bar) = bars.first() else {
        return Ok(());
    };
    let last_date = bars[bars.len() - 1].date;

    let present: BTreeSet<NaiveDate> = bars.iter().map(|b| b.date).collect();
    for bar in bars {
        if !calendar.is_trading_day(bar.date)? {
            return Err(DataError::BarOnClosedDay {
                symbol: bar.symbol.clone(),
                date: bar.date,
            });
        }
    }

    let mut date = first_bar.date;
    while date < last_date {
        date = calendar.next_trading_day(date)?;
        if date > last_date {
            break;
        }
        if !present.contains(&date) {
            return Err(DataError::MissingTradingDay {
                symbol: first_bar.symbol.clone(),
                date,
            });
        }
    }
    Ok(())
}
