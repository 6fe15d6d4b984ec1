//! Inclusive calendar-date narrowing of the working set.

use chrono::NaiveDate;
use insights_core::CampaignRecord;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Optional inclusive bounds on `CampaignRecord::date`.
///
/// An inverted range (`start > end`) is valid and selects nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const UNBOUNDED: DateRange = DateRange {
        start: None,
        end: None,
    };

    #[must_use]
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parse raw `yyyy-MM-dd` bounds. Missing or blank strings leave that
    /// bound open.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] if a non-blank bound does not parse.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, EngineError> {
        Ok(Self {
            start: parse_date_bound(start)?,
            end: parse_date_bound(end)?,
        })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    /// Records whose date falls within the range, in input order.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a CampaignRecord>
    where
        I: IntoIterator<Item = &'a CampaignRecord>,
    {
        if self.is_inverted() {
            return Vec::new();
        }
        records
            .into_iter()
            .filter(|record| self.contains(record.date))
            .collect()
    }
}

/// Parse one optional date bound; blank input means "no bound".
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`] if `raw` is non-blank and not `yyyy-MM-dd`.
pub fn parse_date_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, EngineError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|source| EngineError::InvalidDate {
                value: value.to_string(),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use insights_core::CampaignStatus;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record_on(id: u32, day: &str) -> CampaignRecord {
        CampaignRecord {
            id,
            campaign_name: format!("Retargeting {id}"),
            revenue: 1_000,
            users: 10,
            conversions: 1,
            growth: 0.0,
            date: date(day),
            channel: "LinkedIn".to_string(),
            status: CampaignStatus::Completed,
            ctr: 1.5,
            cpc: 0.75,
        }
    }

    fn records() -> Vec<CampaignRecord> {
        vec![
            record_on(1, "2024-03-04"),
            record_on(2, "2024-03-05"),
            record_on(3, "2024-03-07"),
            record_on(4, "2024-03-10"),
            record_on(5, "2024-03-11"),
        ]
    }

    fn ids(selected: &[&CampaignRecord]) -> Vec<u32> {
        selected.iter().map(|r| r.id).collect()
    }

    #[test]
    fn unbounded_range_selects_everything() {
        let data = records();
        assert_eq!(ids(&DateRange::UNBOUNDED.select(&data)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn both_bounds_are_inclusive() {
        let data = records();
        let range = DateRange::new(Some(date("2024-03-05")), Some(date("2024-03-10")));
        assert_eq!(ids(&range.select(&data)), vec![2, 3, 4]);
    }

    #[test]
    fn start_only_and_end_only() {
        let data = records();
        let from = DateRange::new(Some(date("2024-03-10")), None);
        assert_eq!(ids(&from.select(&data)), vec![4, 5]);
        let until = DateRange::new(None, Some(date("2024-03-05")));
        assert_eq!(ids(&until.select(&data)), vec![1, 2]);
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let data = records();
        let range = DateRange::parse(Some("2024-03-10"), Some("2024-03-05")).unwrap();
        assert!(range.is_inverted());
        assert!(range.select(&data).is_empty());
    }

    #[test]
    fn parse_treats_blank_as_unbounded() {
        let range = DateRange::parse(Some(""), Some("  ")).unwrap();
        assert_eq!(range, DateRange::UNBOUNDED);
        assert_eq!(DateRange::parse(None, None).unwrap(), DateRange::UNBOUNDED);
    }

    #[test]
    fn parse_compares_as_dates_not_strings() {
        // Unpadded month would sort after "2024-10-01" as a string.
        let range = DateRange::parse(Some("2024-9-30"), None).unwrap();
        assert!(range.contains(date("2024-10-01")));
        assert!(!range.contains(date("2024-09-29")));
    }

    #[test]
    fn parse_rejects_malformed_date() {
        let err = DateRange::parse(Some("03/10/2024"), None).unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidDate { ref value, .. } if value == "03/10/2024"),
            "unexpected error: {err:?}"
        );
    }
}
