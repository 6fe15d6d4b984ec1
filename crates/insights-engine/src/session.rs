//! One dashboard session: the store plus the two actors that write to it.
//!
//! Read views follow the dashboard's data flow: snapshot → date range →
//! pipeline or aggregation. Each view takes one snapshot up front, so a
//! concurrent tick or refresh never changes a view halfway through.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use insights_core::{AggregateMetrics, AppConfig, CampaignRecord, ChannelShare, ChartPoint};

use crate::aggregate::{aggregate, top_by_revenue};
use crate::date_range::DateRange;
use crate::generate::DatasetSpec;
use crate::live_update::{LiveUpdateScheduler, Perturbation};
use crate::query::{filter_and_sort, filter_options, run_query, CampaignPage, FilterOptions, TableQuery};
use crate::refresh::{RefreshController, RefreshOutcome, RefreshState};
use crate::store::{RecordStore, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub page_size: usize,
    pub live_update_interval: Duration,
    pub refresh_latency: Duration,
    pub dataset: DatasetSpec,
    pub top_campaigns: usize,
    pub perturbation: Perturbation,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            live_update_interval: config.live_update_interval,
            refresh_latency: config.refresh_latency,
            dataset: DatasetSpec {
                campaign_count: config.campaign_count,
                chart_days: config.chart_days,
            },
            top_campaigns: config.top_campaigns,
            perturbation: Perturbation::default(),
        }
    }
}

pub struct DashboardSession {
    config: SessionConfig,
    store: RecordStore,
    refresh: RefreshController,
    live_updates: LiveUpdateScheduler,
    shut_down: AtomicBool,
}

impl DashboardSession {
    /// Create a session over an empty store. Nothing runs until [`start`].
    ///
    /// [`start`]: DashboardSession::start
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_store(config, RecordStore::new())
    }

    /// Create a session over an existing store handle.
    #[must_use]
    pub fn with_store(config: SessionConfig, store: RecordStore) -> Self {
        let refresh =
            RefreshController::new(store.clone(), config.dataset, config.refresh_latency);
        let live_updates = LiveUpdateScheduler::new(
            store.clone(),
            config.live_update_interval,
            config.perturbation,
        );
        Self {
            config,
            store,
            refresh,
            live_updates,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Kick off the initial load and start the live-update timer.
    ///
    /// Returns `None` without starting anything once the session has been
    /// shut down.
    pub fn start(&self) -> Option<RefreshOutcome> {
        if self.is_shut_down() {
            tracing::warn!("session: start ignored after shutdown");
            return None;
        }
        let outcome = self.refresh.request();
        self.live_updates.start();
        tracing::info!(
            page_size = self.config.page_size,
            campaigns = self.config.dataset.campaign_count,
            "session: started"
        );
        Some(outcome)
    }

    /// Tear the session down. Only the first call does anything.
    pub fn shutdown(&self) -> bool {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.live_updates.stop();
        tracing::info!("session: shut down");
        true
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn request_refresh(&self) -> RefreshOutcome {
        self.refresh.request()
    }

    pub async fn wait_until_idle(&self) {
        self.refresh.wait_until_idle().await;
    }

    #[must_use]
    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_state() == RefreshState::Refreshing
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live_updates.is_running()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Date-filtered records of the current snapshot.
    #[must_use]
    pub fn working_set(&self, range: &DateRange) -> Vec<CampaignRecord> {
        let snapshot = self.snapshot();
        range
            .select(&snapshot.campaigns)
            .into_iter()
            .cloned()
            .collect()
    }

    /// One table page over the date-filtered working set.
    #[must_use]
    pub fn table(&self, range: &DateRange, query: &TableQuery) -> CampaignPage {
        let snapshot = self.snapshot();
        run_query(range.select(&snapshot.campaigns), query, self.config.page_size)
    }

    /// Every filtered, sorted row of the working set, unpaginated.
    #[must_use]
    pub fn export_rows(&self, range: &DateRange, query: &TableQuery) -> Vec<CampaignRecord> {
        let snapshot = self.snapshot();
        filter_and_sort(range.select(&snapshot.campaigns), query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn metrics(&self, range: &DateRange) -> AggregateMetrics {
        let snapshot = self.snapshot();
        aggregate(range.select(&snapshot.campaigns))
    }

    /// Highest-revenue campaigns in range; `limit` defaults to the configured count.
    #[must_use]
    pub fn top_campaigns(&self, range: &DateRange, limit: Option<usize>) -> Vec<CampaignRecord> {
        let snapshot = self.snapshot();
        top_by_revenue(
            range.select(&snapshot.campaigns),
            limit.unwrap_or(self.config.top_campaigns),
        )
    }

    #[must_use]
    pub fn filter_options(&self, range: &DateRange) -> FilterOptions {
        let snapshot = self.snapshot();
        filter_options(range.select(&snapshot.campaigns))
    }

    #[must_use]
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.snapshot().chart.clone()
    }

    #[must_use]
    pub fn channel_shares(&self) -> Vec<ChannelShare> {
        self.snapshot().channels.clone()
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insights_core::CampaignStatus;

    use super::*;
    use crate::generate::Dataset;

    fn config() -> SessionConfig {
        SessionConfig {
            page_size: 2,
            dataset: DatasetSpec {
                campaign_count: 12,
                chart_days: 5,
            },
            ..SessionConfig::default()
        }
    }

    fn record(id: u32, day: u32, revenue: u64) -> CampaignRecord {
        CampaignRecord {
            id,
            campaign_name: format!("Holiday Special {id}"),
            revenue,
            users: 10,
            conversions: 1,
            growth: 2.0,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            channel: if id % 2 == 0 { "Instagram" } else { "Twitter" }.to_string(),
            status: CampaignStatus::Active,
            ctr: 1.0,
            cpc: 1.0,
        }
    }

    fn seeded_session() -> DashboardSession {
        let store = RecordStore::with_dataset(Dataset {
            campaigns: vec![
                record(1, 4, 100),
                record(2, 5, 400),
                record(3, 7, 300),
                record(4, 10, 200),
                record(5, 11, 500),
            ],
            chart: vec![],
            channels: crate::generate::channel_shares(),
        });
        DashboardSession::with_store(config(), store)
    }

    fn march(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 3, day)
    }

    #[test]
    fn views_apply_date_range_before_pipeline_and_metrics() {
        let session = seeded_session();
        let range = DateRange::new(march(5), march(10));

        let metrics = session.metrics(&range);
        assert_eq!(metrics.total_revenue, 900);

        let page = session.table(&range, &TableQuery::default());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        let ids: Vec<u32> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let rows: Vec<u32> = session
            .export_rows(&range, &TableQuery::default())
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(rows, vec![2, 3, 4]);
    }

    #[test]
    fn inverted_range_empties_every_view() {
        let session = seeded_session();
        let range = DateRange::new(march(10), march(5));
        assert!(session.working_set(&range).is_empty());
        assert_eq!(session.metrics(&range), AggregateMetrics::default());
        assert_eq!(session.table(&range, &TableQuery::default()).total_count, 0);
        assert!(session.top_campaigns(&range, None).is_empty());
    }

    #[test]
    fn top_campaigns_uses_configured_default() {
        let session = seeded_session();
        let top = session.top_campaigns(&DateRange::UNBOUNDED, Some(2));
        let ids: Vec<u32> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 2]);
        assert_eq!(session.top_campaigns(&DateRange::UNBOUNDED, None).len(), 5);
    }

    #[test]
    fn filter_options_follow_working_set() {
        let session = seeded_session();
        let options = session.filter_options(&DateRange::new(march(11), None));
        assert_eq!(options.channels, vec!["Twitter"]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_loads_data_and_goes_live() {
        let session = DashboardSession::new(config());
        assert!(session.store().is_empty());

        assert_eq!(session.start(), Some(RefreshOutcome::Started));
        assert!(session.is_refreshing());
        assert!(session.is_live());
        assert!(session.store().is_empty(), "empty until the first load lands");

        session.wait_until_idle().await;
        assert_eq!(session.store().len(), 12);
        assert_eq!(session.chart_series().len(), 5);
        assert_eq!(session.channel_shares().len(), 6);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(session.snapshot().ticks, 1);
        assert!(session.shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_is_idempotent_across_refreshes() {
        let session = DashboardSession::new(config());
        session.start();
        session.wait_until_idle().await;
        for _ in 0..3 {
            assert_eq!(session.request_refresh(), RefreshOutcome::Started);
            session.wait_until_idle().await;
        }
        assert_eq!(session.store().generation(), 4);

        assert!(session.shutdown());
        assert!(!session.shutdown());
        assert!(session.is_shut_down());
        assert!(!session.is_live());

        let ticks = session.snapshot().ticks;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(session.snapshot().ticks, ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_shutdown_does_not_revive_timer() {
        let session = DashboardSession::new(config());
        session.start();
        session.wait_until_idle().await;
        assert!(session.shutdown());

        assert_eq!(session.start(), None);
        assert!(!session.is_live());
        assert!(!session.is_refreshing());
        assert_eq!(session.store().generation(), 1);

        let ticks = session.snapshot().ticks;
        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(session.snapshot().ticks, ticks);
        assert!(!session.shutdown());
    }
}
