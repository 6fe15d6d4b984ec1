//! Summary metrics over an arbitrary record subset.
//!
//! Always a full recompute from the records handed in; nothing here keeps
//! running totals between calls.

use insights_core::{AggregateMetrics, CampaignRecord};

/// Sum revenue, users and conversions and average growth.
///
/// An empty input yields all zeros, including `avg_growth`.
pub fn aggregate<'a, I>(records: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let mut metrics = AggregateMetrics::default();
    let mut growth_sum = 0.0_f64;
    let mut count = 0_usize;

    for record in records {
        metrics.total_revenue += record.revenue;
        metrics.total_users += record.users;
        metrics.total_conversions += record.conversions;
        growth_sum += record.growth;
        count += 1;
    }

    if count > 0 {
        #[allow(clippy::cast_precision_loss)]
        let denom = count as f64;
        metrics.avg_growth = growth_sum / denom;
    }
    metrics
}

/// The `n` highest-revenue records, highest first. Ties keep input order.
pub fn top_by_revenue<'a, I>(records: I, n: usize) -> Vec<CampaignRecord>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let mut rows: Vec<&CampaignRecord> = records.into_iter().collect();
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rows.into_iter().take(n).cloned().collect()
}
