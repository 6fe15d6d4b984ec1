//! Synthetic campaign, trend and channel datasets.
//!
//! Stands in for a real data source: every explicit refresh regenerates the
//! whole dataset from these functions. Callers pass the RNG and the current
//! date so output is reproducible under a seeded RNG.

use chrono::{Days, NaiveDate};
use insights_core::{CampaignRecord, CampaignStatus, ChannelShare, ChartPoint};
use rand::Rng;

pub const CHANNELS: [&str; 7] = [
    "Google Ads",
    "Facebook",
    "Instagram",
    "LinkedIn",
    "Twitter",
    "TikTok",
    "YouTube",
];

pub const CAMPAIGN_TYPES: [&str; 7] = [
    "Summer Sale",
    "Black Friday",
    "Holiday Special",
    "Brand Awareness",
    "Product Launch",
    "Retargeting",
    "Lead Gen",
];

/// Campaign dates fall within this many days before `today`.
const DATE_SPREAD_DAYS: u64 = 90;

/// Everything a refresh swaps into the store at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub campaigns: Vec<CampaignRecord>,
    pub chart: Vec<ChartPoint>,
    pub channels: Vec<ChannelShare>,
}

/// Sizes of a generated [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub campaign_count: usize,
    pub chart_days: usize,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            campaign_count: 100,
            chart_days: 30,
        }
    }
}

/// Generate a full dataset: campaigns, trend series and channel shares.
pub fn generate_dataset<R: Rng + ?Sized>(
    spec: DatasetSpec,
    today: NaiveDate,
    rng: &mut R,
) -> Dataset {
    Dataset {
        campaigns: generate_campaigns(spec.campaign_count, today, rng),
        chart: generate_chart_series(spec.chart_days, today, rng),
        channels: channel_shares(),
    }
}

/// Generate `count` campaign records with ids `1..=count`.
pub fn generate_campaigns<R: Rng + ?Sized>(
    count: usize,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<CampaignRecord> {
    (1..=count)
        .map_while(|n| u32::try_from(n).ok())
        .map(|id| {
            let campaign_type = CAMPAIGN_TYPES[rng.random_range(0..CAMPAIGN_TYPES.len())];
            let days_ago = rng.random_range(0..DATE_SPREAD_DAYS);
            CampaignRecord {
                id,
                campaign_name: format!("{campaign_type} {id}"),
                revenue: rng.random_range(5_000..55_000),
                users: rng.random_range(1_000..11_000),
                conversions: rng.random_range(50..550),
                growth: rng.random::<f64>() * 40.0 - 10.0,
                date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
                channel: CHANNELS[rng.random_range(0..CHANNELS.len())].to_string(),
                status: CampaignStatus::ALL[rng.random_range(0..CampaignStatus::ALL.len())],
                ctr: rng.random::<f64>() * 5.0 + 1.0,
                cpc: rng.random::<f64>() * 3.0 + 0.5,
            }
        })
        .collect()
}

/// Generate one trend point per day ending at `today`, oldest first.
///
/// Revenue follows a weekly sine wave around 15 000 with uniform noise;
/// users and conversions are scaled from the same base.
pub fn generate_chart_series<R: Rng + ?Sized>(
    days: usize,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<ChartPoint> {
    (0..days)
        .map(|i| {
            let offset = u64::try_from(days - 1 - i).unwrap_or(u64::MAX);
            let date = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
            #[allow(clippy::cast_precision_loss)]
            let base = 15_000.0 + (i as f64 / 7.0).sin() * 3_000.0;
            ChartPoint {
                date: date.format("%b %d").to_string(),
                revenue: floor_to_i64(base + rng.random::<f64>() * 5_000.0 - 2_500.0),
                users: floor_to_i64(base / 3.0 + rng.random::<f64>() * 2_000.0 - 1_000.0),
                conversions: floor_to_i64(base / 50.0 + rng.random::<f64>() * 100.0 - 50.0),
            }
        })
        .collect()
}

/// The fixed channel breakdown. Values sum to 100.
#[must_use]
pub fn channel_shares() -> Vec<ChannelShare> {
    [
        ("Google Ads", 35, "#3B82F6"),
        ("Facebook", 25, "#8B5CF6"),
        ("Instagram", 20, "#F59E0B"),
        ("LinkedIn", 12, "#10B981"),
        ("Twitter", 5, "#EF4444"),
        ("Others", 3, "#6B7280"),
    ]
    .into_iter()
    .map(|(name, value, color)| ChannelShare {
        name: name.to_string(),
        value,
        color: color.to_string(),
    })
    .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn floor_to_i64(value: f64) -> i64 {
    value.floor() as i64
}
