//! Command handlers for the CLI.
//!
//! Each command generates its own dataset, so runs with the same `--seed`
//! on the same day print the same numbers.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use insights_core::{AggregateMetrics, AppConfig};
use insights_engine::export::{CsvExporter, ExportAdapter};
use insights_engine::{
    aggregate, apply_tick, filter_and_sort, run_query, DatasetSpec, Perturbation,
    QueryParams, RecordStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng_for(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

pub(crate) fn load_store(config: &AppConfig, seed: Option<u64>) -> RecordStore {
    let spec = DatasetSpec {
        campaign_count: config.campaign_count,
        chart_days: config.chart_days,
    };
    let store = RecordStore::new();
    store.load(spec, Utc::now().date_naive(), &mut rng_for(seed));
    tracing::debug!(campaigns = store.len(), "generated dataset");
    store
}

/// # Errors
///
/// Returns an error for malformed filter parameters or a failed write.
pub(crate) fn print_campaigns<W: Write>(
    out: &mut W,
    store: &RecordStore,
    params: &QueryParams,
    page_size: usize,
) -> anyhow::Result<()> {
    let range = params.date_range()?;
    let query = params.table_query()?;
    let snapshot = store.snapshot();
    let page = run_query(range.select(&snapshot.campaigns), &query, page_size);

    writeln!(
        out,
        "{:<4} {:<24} {:>10} {:>8} {:>6} {:>7} {:<12} {:<9}",
        "ID", "Campaign", "Revenue", "Users", "Conv", "Growth", "Channel", "Status"
    )?;
    for record in &page.records {
        writeln!(
            out,
            "{:<4} {:<24} {:>10} {:>8} {:>6} {:>6.1}% {:<12} {:<9}",
            record.id,
            record.campaign_name,
            record.revenue,
            record.users,
            record.conversions,
            record.growth,
            record.channel,
            record.status,
        )?;
    }
    let showing = page.showing();
    writeln!(
        out,
        "Showing {} to {} of {} results (page {} of {})",
        showing.start,
        showing.end,
        showing.total,
        page.page,
        page.total_pages.max(1)
    )?;
    Ok(())
}

/// # Errors
///
/// Returns an error for a malformed date range or a failed write.
pub(crate) fn print_metrics<W: Write>(
    out: &mut W,
    store: &RecordStore,
    params: &QueryParams,
) -> anyhow::Result<()> {
    let range = params.date_range()?;
    let snapshot = store.snapshot();
    write_totals(out, &aggregate(range.select(&snapshot.campaigns)))
}

fn write_totals<W: Write>(out: &mut W, metrics: &AggregateMetrics) -> anyhow::Result<()> {
    writeln!(
        out,
        "revenue={} users={} conversions={} avg_growth={:.1}%",
        metrics.total_revenue, metrics.total_users, metrics.total_conversions, metrics.avg_growth
    )?;
    Ok(())
}

/// Write all filtered rows to `path` and return how many were written.
///
/// # Errors
///
/// Returns an error for malformed filter parameters, a failed export or an
/// unwritable path.
pub(crate) fn export_csv(
    store: &RecordStore,
    params: &QueryParams,
    path: &Path,
) -> anyhow::Result<usize> {
    let range = params.date_range()?;
    let query = params.table_query()?;
    let snapshot = store.snapshot();
    let rows: Vec<_> = filter_and_sort(range.select(&snapshot.campaigns), &query)
        .into_iter()
        .cloned()
        .collect();

    let artifact = CsvExporter::default().export(&rows)?;
    std::fs::write(path, &artifact.bytes)?;
    tracing::info!(rows = rows.len(), path = %path.display(), "exported campaigns");
    Ok(rows.len())
}

/// Apply `ticks` live-update ticks, `every` seconds apart, printing the
/// totals after each one.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub(crate) async fn watch<W: Write>(
    out: &mut W,
    store: &RecordStore,
    ticks: u32,
    every: u64,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let perturbation = Perturbation::default();
    let mut rng = rng_for(seed.map(|s| s.wrapping_add(1)));
    let mut interval = (every > 0).then(|| tokio::time::interval(Duration::from_secs(every)));
    if let Some(interval) = interval.as_mut() {
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
    }

    write!(out, "tick 0: ")?;
    write_totals(out, &aggregate(&store.snapshot().campaigns))?;
    for tick in 1..=ticks {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        apply_tick(store, &perturbation, &mut rng);
        write!(out, "tick {tick}: ")?;
        write_totals(out, &aggregate(&store.snapshot().campaigns))?;
    }
    Ok(())
}
