//! Raw string-typed view parameters, as they arrive from a query string or
//! command-line flags, and their conversion into engine inputs.

use insights_core::CampaignStatus;
use serde::Deserialize;

use crate::date_range::DateRange;
use crate::error::EngineError;
use crate::query::{SortDirection, SortField, SortState, TableQuery};

/// Unvalidated table and range parameters. Blank strings count as unset,
/// and `"all"` clears the channel and status filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryParams {
    pub search: Option<String>,
    pub channel: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl QueryParams {
    /// # Errors
    ///
    /// Returns [`EngineError`] for an unknown status, sort field or direction.
    pub fn table_query(&self) -> Result<TableQuery, EngineError> {
        let status = present(self.status.as_deref())
            .map(str::parse::<CampaignStatus>)
            .transpose()?;
        let sort = parse_sort(present(self.sort.as_deref()), present(self.direction.as_deref()))?;

        Ok(TableQuery {
            search_term: self.search.clone().unwrap_or_default(),
            channel: present(self.channel.as_deref()).map(str::to_string),
            status,
            sort,
            page: self.page.unwrap_or(1),
        })
    }

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDate`] for a malformed bound.
    pub fn date_range(&self) -> Result<DateRange, EngineError> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// A field without a direction sorts descending, the same as a fresh
/// column-header click.
fn parse_sort(field: Option<&str>, direction: Option<&str>) -> Result<SortState, EngineError> {
    let default = SortState::default();
    let field = field.map(str::parse::<SortField>).transpose()?;
    let direction = direction.map(str::parse::<SortDirection>).transpose()?;
    Ok(SortState {
        field: field.unwrap_or(default.field),
        direction: direction.unwrap_or(SortDirection::Desc),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_params_mean_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.table_query().unwrap(), TableQuery::default());
        assert_eq!(params.date_range().unwrap(), DateRange::UNBOUNDED);
    }

    #[test]
    fn parses_every_parameter() {
        let params = QueryParams {
            search: Some("summer".to_string()),
            channel: Some("Google Ads".to_string()),
            status: Some("Active".to_string()),
            sort: Some("campaignName".to_string()),
            direction: Some("asc".to_string()),
            page: Some(3),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-03-31".to_string()),
        };
        let query = params.table_query().unwrap();
        assert_eq!(query.search_term, "summer");
        assert_eq!(query.channel.as_deref(), Some("Google Ads"));
        assert_eq!(query.status, Some(CampaignStatus::Active));
        assert_eq!(query.sort.field, SortField::CampaignName);
        assert_eq!(query.sort.direction, SortDirection::Asc);
        assert_eq!(query.page, 3);

        let range = params.date_range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn all_and_blank_clear_filters() {
        let params = QueryParams {
            channel: Some("all".to_string()),
            status: Some("  ".to_string()),
            ..QueryParams::default()
        };
        let query = params.table_query().unwrap();
        assert_eq!(query.channel, None);
        assert_eq!(query.status, None);
    }

    #[test]
    fn field_without_direction_sorts_descending() {
        let params = QueryParams {
            sort: Some("users".to_string()),
            ..QueryParams::default()
        };
        let sort = params.table_query().unwrap().sort;
        assert_eq!(sort.field, SortField::Users);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_unknown_values() {
        let bad_status = QueryParams {
            status: Some("archived".to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            bad_status.table_query(),
            Err(EngineError::InvalidStatus(_))
        ));

        let bad_sort = QueryParams {
            sort: Some("budget".to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            bad_sort.table_query(),
            Err(EngineError::UnknownSortField(_))
        ));

        let bad_date = QueryParams {
            end_date: Some("03/05/2024".to_string()),
            ..QueryParams::default()
        };
        assert!(matches!(
            bad_date.date_range(),
            Err(EngineError::InvalidDate { .. })
        ));
    }
}
