//! Partition path parsing.
//!
//! Footprint datasets are written as hive-style partitions, e.g.
//!
//! ```text
//! footprints/delta/2023-04-25/ml-buildings.parquet/RegionName=Abyei/quadkey=122321003/
//! ```
//!
//! Tokens sit at fixed offsets from the end of the path, described by a
//! [`PathLayout`]. Parsing is all or nothing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{FootprintsError, Result};
use crate::models::dataset::PathLayout;

pub const REGION_KEY: &str = "RegionName";
pub const QUADKEY_KEY: &str = "quadkey";

/// Quadtree tile address as written in the partition path.
///
/// The digit string is kept so leading zeros survive tile conversion; the
/// integer value is what appears in item ids and properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quadkey {
    digits: String,
    value: u64,
}

impl Quadkey {
    pub fn parse(token: &str) -> Result<Self> {
        let value = token.parse::<u64>().map_err(|e| FootprintsError::InvalidQuadkey {
            value: token.to_string(),
            reason: e.to_string(),
        })?;

        // u64 parsing accepts a leading '+'
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FootprintsError::InvalidQuadkey {
                value: token.to_string(),
                reason: "quadkey must contain only digits".to_string(),
            });
        }

        Ok(Self { digits: token.to_string(), value })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Zoom level encoded by the quadkey (one digit per level)
    pub fn zoom(&self) -> usize {
        self.digits.len()
    }
}

impl fmt::Display for Quadkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Quadkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

/// Fields extracted from a dataset partition path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionPath {
    pub region: String,
    /// Date token normalized to UTC; tokens without an offset are read as UTC
    pub processing_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadkey: Option<Quadkey>,
}

impl PartitionPath {
    /// Parse a partition path according to `layout`
    pub fn parse(path: &str, layout: &PathLayout) -> Result<Self> {
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        let expected = layout.min_segments();
        if segments.len() < expected {
            return Err(FootprintsError::PathTooShort {
                path: path.to_string(),
                found: segments.len(),
                expected,
            });
        }

        let segment_at = |offset: usize| segments[segments.len() - offset];

        let region = key_value(path, segment_at(layout.region_offset), REGION_KEY)?.to_string();
        let processing_date = parse_processing_date(segment_at(layout.date_offset))?;
        let quadkey = layout
            .quadkey_offset
            .map(|offset| key_value(path, segment_at(offset), QUADKEY_KEY).and_then(Quadkey::parse))
            .transpose()?;

        Ok(Self { region, processing_date, quadkey })
    }

    /// Processing date as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.processing_date.date_naive().format("%Y-%m-%d").to_string()
    }
}

/// Value of a `key=value` segment: everything after the first `=`
fn key_value<'a>(path: &str, segment: &'a str, key: &str) -> Result<&'a str> {
    let segment_error = |reason: String| FootprintsError::PathSegment {
        path: path.to_string(),
        segment: segment.to_string(),
        reason,
    };

    let (found_key, value) = segment
        .split_once('=')
        .ok_or_else(|| segment_error(format!("expected {}=<value>", key)))?;

    if !found_key.eq_ignore_ascii_case(key) {
        return Err(segment_error(format!("expected key '{}', found '{}'", key, found_key)));
    }
    if value.is_empty() {
        return Err(segment_error(format!("empty value for '{}'", key)));
    }

    Ok(value)
}

/// Parse a free-form date or date-time token and normalize it to UTC.
///
/// Tokens without an offset are taken as UTC; a bare date is midnight UTC.
pub fn parse_processing_date(token: &str) -> Result<DateTime<Utc>> {
    let token = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y%m%dT%H%M%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(token, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight.and_utc());
            }
        }
    }

    Err(FootprintsError::InvalidDate {
        value: token.to_string(),
        reason: "not an ISO-8601 date or date-time".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_region_layout() {
        let parts = PartitionPath::parse(
            "abfs://footprints/sample/2022-06-01/ml-buildings.parquet/RegionName=Abyei/",
            &PathLayout::REGION,
        )
        .unwrap();

        assert_eq!(parts.region, "Abyei");
        assert_eq!(parts.processing_date, Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(parts.processing_date.to_rfc3339(), "2022-06-01T00:00:00+00:00");
        assert!(parts.quadkey.is_none());
    }

    #[test]
    fn test_parse_quadkey_layout() {
        let parts = PartitionPath::parse(
            "footprints/delta/2023-04-25/ml-buildings.parquet/RegionName=Abyei/quadkey=122321003/",
            &PathLayout::REGION_QUADKEY,
        )
        .unwrap();

        assert_eq!(parts.region, "Abyei");
        assert_eq!(parts.quadkey.as_ref().unwrap().value(), 122321003);
        assert_eq!(parts.date_string(), "2023-04-25");
    }

    #[test]
    fn test_trailing_slash_optional() {
        let with = PartitionPath::parse("a/2022-06-01/b/RegionName=X/", &PathLayout::REGION).unwrap();
        let without = PartitionPath::parse("a/2022-06-01/b/RegionName=X", &PathLayout::REGION).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_value_after_first_equals() {
        let parts = PartitionPath::parse("2022-06-01/b/RegionName=A=B", &PathLayout::REGION).unwrap();
        assert_eq!(parts.region, "A=B");
    }

    #[test]
    fn test_too_few_segments() {
        let err = PartitionPath::parse("RegionName=Abyei/quadkey=1", &PathLayout::REGION_QUADKEY)
            .unwrap_err();
        assert!(matches!(err, FootprintsError::PathTooShort { found: 2, expected: 4, .. }));
    }

    #[test]
    fn test_non_integer_quadkey() {
        let err = PartitionPath::parse(
            "2023-04-25/b.parquet/RegionName=Abyei/quadkey=12a/",
            &PathLayout::REGION_QUADKEY,
        )
        .unwrap_err();
        assert!(matches!(err, FootprintsError::InvalidQuadkey { .. }));
    }

    #[test]
    fn test_missing_key_value_separator() {
        let err = PartitionPath::parse("2022-06-01/b/Abyei/", &PathLayout::REGION).unwrap_err();
        assert!(matches!(err, FootprintsError::PathSegment { .. }));
    }

    #[test]
    fn test_wrong_key() {
        let err = PartitionPath::parse("2022-06-01/b/Country=Abyei/", &PathLayout::REGION).unwrap_err();
        assert!(matches!(err, FootprintsError::PathSegment { .. }));
    }

    #[test]
    fn test_bad_date() {
        let err = PartitionPath::parse("latest/b/RegionName=Abyei/", &PathLayout::REGION).unwrap_err();
        assert!(matches!(err, FootprintsError::InvalidDate { .. }));
    }

    #[test]
    fn test_date_formats() {
        let expected = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_processing_date("2022-06-01").unwrap(), expected);
        assert_eq!(parse_processing_date("20220601").unwrap(), expected);
        assert_eq!(parse_processing_date("2022-06-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_processing_date("2022-06-01T02:00:00+02:00").unwrap(), expected);
    }

    #[test]
    fn test_quadkey_keeps_leading_zeros() {
        let quadkey = Quadkey::parse("0123").unwrap();
        assert_eq!(quadkey.value(), 123);
        assert_eq!(quadkey.as_str(), "0123");
        assert_eq!(quadkey.zoom(), 4);
        assert_eq!(quadkey.to_string(), "123");
        assert!(Quadkey::parse("+12").is_err());
    }
}
