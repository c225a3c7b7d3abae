//! Limit-up screener records and reason-tag parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// One stock's limit-up row for one trading day.
///
/// `reason_tags` is parsed once at the data boundary from the vendor's
/// composite reason string (tags joined by `+`); computations never see the
/// raw string. A record whose reason string failed to parse keeps an empty
/// tag set — it still counts in streak rankings and record totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitUpRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub display_name: String,
    /// Consecutive limit-up trading days including this one; always >= 1.
    pub streak_length: u32,
    pub reason_tags: BTreeSet<String>,
}

/// Unparseable composite reason string.
///
/// The caller skips the record's tag contribution and continues; one bad
/// row never aborts a whole day's aggregation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed reason tag string {raw:?}")]
pub struct MalformedReasonTag {
    pub raw: String,
}

/// Split a vendor composite reason string into its tag set.
///
/// Tags are separated by `+` and surrounding whitespace is dropped. A string
/// that is blank, or that contains a blank segment (`"AI++Chip"`), is
/// malformed as a whole.
pub fn parse_reason_tags(raw: &str) -> Result<BTreeSet<String>, MalformedReasonTag> {
    if raw.trim().is_empty() {
        return Err(MalformedReasonTag { raw: raw.to_string() });
    }
    let mut tags = BTreeSet::new();
    for segment in raw.split('+') {
        let tag = segment.trim();
        if tag.is_empty() {
            return Err(MalformedReasonTag { raw: raw.to_string() });
        }
        tags.insert(tag.to_string());
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_composite_reason() {
        let tags = parse_reason_tags("人工智能+芯片").unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("人工智能"));
        assert!(tags.contains("芯片"));
    }

    #[test]
    fn single_tag_is_fine() {
        let tags = parse_reason_tags("军工").unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn duplicate_tags_collapse() {
        let tags = parse_reason_tags("AI+AI").unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn trims_whitespace_around_tags() {
        let tags = parse_reason_tags(" 风电 + 光伏 ").unwrap();
        assert!(tags.contains("风电"));
        assert!(tags.contains("光伏"));
    }

    #[test]
    fn blank_string_is_malformed() {
        assert!(parse_reason_tags("   ").is_err());
    }

    #[test]
    fn blank_segment_is_malformed() {
        assert!(parse_reason_tags("AI++芯片").is_err());
        assert!(parse_reason_tags("AI+").is_err());
    }

    #[test]
    fn record_serialization_roundtrip() {
        let record = LimitUpRecord {
            date: NaiveDate::from_ymd_opt(2024, 10, 22).unwrap(),
            symbol: "002865".into(),
            display_name: "钧达股份".into(),
            streak_length: 3,
            reason_tags: parse_reason_tags("光伏+出海").unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let deser: LimitUpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deser);
    }
}
