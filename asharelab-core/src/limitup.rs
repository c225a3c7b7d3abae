//! Limit-up pool aggregation — reason-tag counts, streak ranking, and
//! level-by-level promotion rates.
//!
//! Every operation is a pure function over one or two days' record slices.
//! A zero promotion denominator is an undefined rate (`None`), never zero
//! and never an error.

use crate::domain::LimitUpRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tally each reason tag across a day's records.
///
/// A record carrying several tags increments each of them once; the record
/// itself still counts once in any per-day record total. Records whose
/// reason string failed to parse arrive with an empty tag set and simply
/// contribute nothing here.
pub fn explode_reason_tags(records: &[LimitUpRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        for tag in &record.reason_tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Rank descending by streak length; ties break by ascending symbol code
/// for determinism. Idempotent: ranking a ranked slice reproduces it.
pub fn rank_by_streak(records: &[LimitUpRecord]) -> Vec<LimitUpRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        b.streak_length
            .cmp(&a.streak_length)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked
}

/// Promotion rate from `level` consecutive boards to `level + 1`:
/// today's count at level+1 over yesterday's count at level.
///
/// `None` when yesterday had no stocks at `level` — the rate is undefined.
pub fn promotion_rate(
    today: &[LimitUpRecord],
    yesterday: &[LimitUpRecord],
    level: u32,
) -> Option<f64> {
    let base = count_at_level(yesterday, level);
    if base == 0 {
        return None;
    }
    let promoted = count_at_level(today, level + 1);
    Some(promoted as f64 / base as f64)
}

fn count_at_level(records: &[LimitUpRecord], level: u32) -> usize {
    records
        .iter()
        .filter(|r| r.streak_length == level)
        .count()
}

/// One row of the level-by-level promotion report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionLevel {
    /// Streak level the row promotes from (`level` boards to `level + 1`).
    pub level: u32,
    /// Today's records at level + 1.
    pub promoted: usize,
    /// Yesterday's records at level.
    pub base: usize,
    /// `promoted / base`; undefined when the base is empty.
    pub rate: Option<f64>,
    /// Symbols that made the jump, sorted ascending.
    pub promoted_symbols: Vec<String>,
}

/// Promotion rates for every level from 1 up to the highest streak seen on
/// either day (exclusive — a stock at the top level has nowhere to promote
/// from below it).
pub fn promotion_table(
    today: &[LimitUpRecord],
    yesterday: &[LimitUpRecord],
) -> Vec<PromotionLevel> {
    let max_streak = today
        .iter()
        .chain(yesterday)
        .map(|r| r.streak_length)
        .max()
        .unwrap_or(0);

    (1..max_streak)
        .map(|level| {
            let base = count_at_level(yesterday, level);
            let mut promoted_symbols: Vec<String> = today
                .iter()
                .filter(|r| r.streak_length == level + 1)
                .map(|r| r.symbol.clone())
                .collect();
            promoted_symbols.sort_unstable();
            let promoted = promoted_symbols.len();
            PromotionLevel {
                level,
                promoted,
                base,
                rate: (base > 0).then(|| promoted as f64 / base as f64),
                promoted_symbols,
            }
        })
        .collect()
}

/// Day-over-day change in a reason tag's frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDelta {
    pub tag: String,
    pub today: usize,
    pub yesterday: usize,
    pub change: i64,
}

/// Compare tag frequencies between two days, today's count descending
/// (ties by tag for determinism). Tags present on either day appear.
pub fn tag_count_delta(today: &[LimitUpRecord], yesterday: &[LimitUpRecord]) -> Vec<TagDelta> {
    let today_counts = explode_reason_tags(today);
    let yesterday_counts = explode_reason_tags(yesterday);

    let mut rows: Vec<TagDelta> = today_counts
        .keys()
        .chain(yesterday_counts.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|tag| {
            let today = today_counts.get(tag).copied().unwrap_or(0);
            let yesterday = yesterday_counts.get(tag).copied().unwrap_or(0);
            TagDelta {
                tag: tag.clone(),
                today,
                yesterday,
                change: today as i64 - yesterday as i64,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.today.cmp(&a.today).then_with(|| a.tag.cmp(&b.tag)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_reason_tags;
    use chrono::NaiveDate;

    fn record(symbol: &str, streak: u32, reasons: &str) -> LimitUpRecord {
        LimitUpRecord {
            date: NaiveDate::from_ymd_opt(2024, 10, 22).unwrap(),
            symbol: symbol.to_string(),
            display_name: format!("股票{symbol}"),
            streak_length: streak,
            reason_tags: parse_reason_tags(reasons).unwrap(),
        }
    }

    #[test]
    fn explode_counts_each_tag_once_per_record() {
        let records = [record("600001", 1, "AI+Chip"), record("600002", 1, "AI")];
        let counts = explode_reason_tags(&records);
        assert_eq!(counts["AI"], 2);
        assert_eq!(counts["Chip"], 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn explode_ignores_tagless_records() {
        let mut bad = record("600003", 2, "AI");
        bad.reason_tags.clear(); // parse failed upstream, tags skipped
        let records = [record("600001", 1, "AI"), bad];
        let counts = explode_reason_tags(&records);
        assert_eq!(counts["AI"], 1);
    }

    #[test]
    fn rank_orders_by_streak_then_symbol() {
        let records = [
            record("600300", 1, "Chip"),
            record("600200", 3, "AI"),
            record("600100", 3, "AI"),
        ];
        let ranked = rank_by_streak(&records);
        let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["600100", "600200", "600300"]);
    }

    #[test]
    fn rank_is_idempotent() {
        let records = [
            record("600300", 2, "Chip"),
            record("600200", 5, "AI"),
            record("600100", 2, "AI"),
            record("600400", 1, "Solar"),
        ];
        let once = rank_by_streak(&records);
        let twice = rank_by_streak(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn promotion_rate_counts_levels() {
        let yesterday = [
            record("600100", 1, "AI"),
            record("600200", 1, "Chip"),
            record("600300", 2, "AI"),
        ];
        let today = [record("600100", 2, "AI"), record("600300", 3, "AI")];
        // 1 -> 2: one of two promoted.
        assert_eq!(promotion_rate(&today, &yesterday, 1), Some(0.5));
        // 2 -> 3: the single second-board stock promoted.
        assert_eq!(promotion_rate(&today, &yesterday, 2), Some(1.0));
    }

    #[test]
    fn promotion_rate_zero_base_is_undefined() {
        let yesterday = [record("600100", 1, "AI")];
        let today = [record("600200", 4, "Chip")];
        // Nobody was at level 3 yesterday: undefined, not 0%, not an error.
        assert_eq!(promotion_rate(&today, &yesterday, 3), None);
    }

    #[test]
    fn promotion_table_covers_levels_below_max() {
        let yesterday = [
            record("600100", 1, "AI"),
            record("600200", 1, "Chip"),
            record("600300", 2, "AI"),
        ];
        let today = [
            record("600100", 2, "AI"),
            record("600300", 3, "AI"),
            record("600500", 1, "Solar"),
        ];
        let table = promotion_table(&today, &yesterday);
        assert_eq!(table.len(), 2); // levels 1 and 2; max streak 3

        assert_eq!(table[0].level, 1);
        assert_eq!(table[0].base, 2);
        assert_eq!(table[0].promoted, 1);
        assert_eq!(table[0].rate, Some(0.5));
        assert_eq!(table[0].promoted_symbols, ["600100"]);

        assert_eq!(table[1].level, 2);
        assert_eq!(table[1].rate, Some(1.0));
    }

    #[test]
    fn promotion_table_undefined_rows_keep_counts() {
        let yesterday: [LimitUpRecord; 0] = [];
        let today = [record("600100", 2, "AI")];
        let table = promotion_table(&today, &yesterday);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].base, 0);
        assert_eq!(table[0].promoted, 1);
        assert_eq!(table[0].rate, None);
    }

    #[test]
    fn empty_days_produce_empty_reports() {
        assert!(explode_reason_tags(&[]).is_empty());
        assert!(rank_by_streak(&[]).is_empty());
        assert!(promotion_table(&[], &[]).is_empty());
        assert!(tag_count_delta(&[], &[]).is_empty());
    }

    #[test]
    fn tag_delta_merges_both_days() {
        let yesterday = [record("600100", 1, "AI+Chip"), record("600200", 1, "Chip")];
        let today = [
            record("600100", 2, "AI"),
            record("600300", 1, "AI"),
            record("600400", 1, "Solar"),
        ];
        let rows = tag_count_delta(&today, &yesterday);

        assert_eq!(rows[0].tag, "AI");
        assert_eq!(rows[0].today, 2);
        assert_eq!(rows[0].yesterday, 1);
        assert_eq!(rows[0].change, 1);

        let chip = rows.iter().find(|r| r.tag == "Chip").unwrap();
        assert_eq!(chip.today, 0);
        assert_eq!(chip.change, -2);

        let solar = rows.iter().find(|r| r.tag == "Solar").unwrap();
        assert_eq!(solar.change, 1);
    }
}
