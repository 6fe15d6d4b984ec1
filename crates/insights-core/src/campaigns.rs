use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 3] = [
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown campaign status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for CampaignStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "completed" => Ok(CampaignStatus::Completed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// One campaign's performance row.
///
/// `id` is the identity anchor: live updates rewrite the performance
/// counters in place but never touch `id`, `campaign_name`, `date`,
/// `channel` or `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: u32,
    pub campaign_name: String,
    pub revenue: u64,
    pub users: u64,
    pub conversions: u64,
    /// Signed growth percentage, e.g. `-4.2`.
    pub growth: f64,
    pub date: NaiveDate,
    /// Open set of acquisition channels (`"Google Ads"`, `"Facebook"`, ...).
    pub channel: String,
    pub status: CampaignStatus,
    /// Click-through rate as a percentage.
    pub ctr: f64,
    /// Cost per click in dollars.
    pub cpc: f64,
}

/// One day of the revenue trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Display label, e.g. `"Mar 05"`.
    pub date: String,
    pub revenue: i64,
    pub users: i64,
    pub conversions: i64,
}

/// A slice of the channel breakdown donut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelShare {
    pub name: String,
    /// Percentage share, 0–100.
    pub value: u8,
    /// Presentation hint, a hex color like `"#3B82F6"`.
    pub color: String,
}

/// Summary figures derived from a set of campaign records. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_revenue: u64,
    pub total_users: u64,
    pub total_conversions: u64,
    pub avg_growth: f64,
}
