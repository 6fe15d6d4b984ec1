//! The table query pipeline: search → categorical filter → sort → paginate.
//!
//! Every stage is a pure function of its input, so identical inputs over an
//! unchanged snapshot always produce identical pages. Sorting is stable:
//! records with equal keys keep their relative input order.

use std::cmp::Ordering;
use std::str::FromStr;

use insights_core::{CampaignRecord, CampaignStatus};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A sortable column of the campaign table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    CampaignName,
    Revenue,
    Users,
    Conversions,
    Growth,
    Date,
    Channel,
    Status,
    Ctr,
    Cpc,
}

impl SortField {
    /// Ascending comparison of two records on this field.
    #[must_use]
    pub fn compare(self, a: &CampaignRecord, b: &CampaignRecord) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::CampaignName => collate(&a.campaign_name, &b.campaign_name),
            SortField::Revenue => a.revenue.cmp(&b.revenue),
            SortField::Users => a.users.cmp(&b.users),
            SortField::Conversions => a.conversions.cmp(&b.conversions),
            SortField::Growth => a.growth.total_cmp(&b.growth),
            SortField::Date => a.date.cmp(&b.date),
            SortField::Channel => collate(&a.channel, &b.channel),
            SortField::Status => collate(a.status.as_str(), b.status.as_str()),
            SortField::Ctr => a.ctr.total_cmp(&b.ctr),
            SortField::Cpc => a.cpc.total_cmp(&b.cpc),
        }
    }
}

impl FromStr for SortField {
    type Err = EngineError;

    /// Accepts snake_case and camelCase column names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "id" => Ok(SortField::Id),
            "campaignname" | "campaign" | "name" => Ok(SortField::CampaignName),
            "revenue" => Ok(SortField::Revenue),
            "users" => Ok(SortField::Users),
            "conversions" => Ok(SortField::Conversions),
            "growth" => Ok(SortField::Growth),
            "date" => Ok(SortField::Date),
            "channel" => Ok(SortField::Channel),
            "status" => Ok(SortField::Status),
            "ctr" => Ok(SortField::Ctr),
            "cpc" => Ok(SortField::Cpc),
            _ => Err(EngineError::UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(EngineError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// Current sort column and direction. Defaults to revenue, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Revenue,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Column-header click: the active column flips direction, any other
    /// column becomes active sorted descending.
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }

    #[must_use]
    pub fn compare(self, a: &CampaignRecord, b: &CampaignRecord) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }
}

/// Inputs of one pipeline run. Empty search and unset filters pass all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    pub search_term: String,
    pub channel: Option<String>,
    pub status: Option<CampaignStatus>,
    pub sort: SortState,
    /// 1-based; clamped into the valid page range when the query runs.
    pub page: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            channel: None,
            status: None,
            sort: SortState::default(),
            page: 1,
        }
    }
}

impl TableQuery {
    fn matcher(&self) -> RowMatcher<'_> {
        RowMatcher {
            needle: self.search_term.to_lowercase(),
            channel: self.channel.as_deref().filter(|c| !c.is_empty()),
            status: self.status,
        }
    }

    /// Whether `record` passes the search and categorical filters.
    #[must_use]
    pub fn matches(&self, record: &CampaignRecord) -> bool {
        self.matcher().matches(record)
    }
}

struct RowMatcher<'q> {
    needle: String,
    channel: Option<&'q str>,
    status: Option<CampaignStatus>,
}

impl RowMatcher<'_> {
    fn matches(&self, record: &CampaignRecord) -> bool {
        let name_matches =
            self.needle.is_empty() || record.campaign_name.to_lowercase().contains(&self.needle);
        name_matches
            && self.channel.is_none_or(|channel| record.channel == channel)
            && self.status.is_none_or(|status| record.status == status)
    }
}

/// One page of pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPage {
    pub records: Vec<CampaignRecord>,
    /// Rows passing the filters, across all pages.
    pub total_count: usize,
    pub total_pages: usize,
    /// The page actually served after clamping.
    pub page: usize,
    pub page_size: usize,
}

/// 1-based "showing `start` to `end` of `total`" row range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowingRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl CampaignPage {
    #[must_use]
    pub fn showing(&self) -> ShowingRange {
        if self.total_count == 0 {
            return ShowingRange {
                start: 0,
                end: 0,
                total: 0,
            };
        }
        let offset = (self.page - 1) * self.page_size;
        ShowingRange {
            start: offset + 1,
            end: (offset + self.page_size).min(self.total_count),
            total: self.total_count,
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter and sort without paginating: the full result a CSV export wants.
pub fn filter_and_sort<'a, I>(records: I, query: &TableQuery) -> Vec<&'a CampaignRecord>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let matcher = query.matcher();
    let mut rows: Vec<&CampaignRecord> = records
        .into_iter()
        .filter(|record| matcher.matches(record))
        .collect();
    // `sort_by` is stable.
    rows.sort_by(|a, b| query.sort.compare(a, b));
    rows
}

/// Slice one page out of already filtered and sorted rows.
///
/// `page` is clamped to `1..=total_pages`; with no rows the page is 1 and
/// empty. A `page_size` of 0 is treated as 1.
#[must_use]
pub fn paginate(rows: &[&CampaignRecord], page: usize, page_size: usize) -> CampaignPage {
    let page_size = page_size.max(1);
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * page_size;
    let end = (offset + page_size).min(total_count);

    CampaignPage {
        records: rows
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|record| (*record).clone())
            .collect(),
        total_count,
        total_pages,
        page,
        page_size,
    }
}

/// Run the whole pipeline over `records`.
pub fn run_query<'a, I>(records: I, query: &TableQuery, page_size: usize) -> CampaignPage
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let rows = filter_and_sort(records, query);
    paginate(&rows, query.page, page_size)
}

/// Distinct values offered by the table's filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub channels: Vec<String>,
    pub statuses: Vec<CampaignStatus>,
}

/// Distinct channels and statuses present in `records`, in first-seen order.
pub fn filter_options<'a, I>(records: I) -> FilterOptions
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let mut options = FilterOptions::default();
    for record in records {
        if !options.channels.contains(&record.channel) {
            options.channels.push(record.channel.clone());
        }
        if !options.statuses.contains(&record.status) {
            options.statuses.push(record.status);
        }
    }
    options
}

/// Case-insensitive primary ordering with a deterministic tiebreak.
///
/// On a case-only difference lowercase sorts first, as common locale
/// collations do.
fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
