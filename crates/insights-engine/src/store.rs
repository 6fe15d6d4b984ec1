//! The canonical, explicitly owned record store.
//!
//! [`RecordStore`] is a cheap clonable handle. Every clone points at the same
//! contents, so the session, the refresh task and the live-update timer all
//! funnel through the same lock. Reads return a [`Snapshot`]: an immutable
//! `Arc` of the contents at that instant that later writes never touch.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use insights_core::{CampaignRecord, ChannelShare, ChartPoint};
use rand::Rng;

use crate::generate::{generate_dataset, Dataset, DatasetSpec};

/// Contents of the store at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreContents {
    pub campaigns: Vec<CampaignRecord>,
    pub chart: Vec<ChartPoint>,
    pub channels: Vec<ChannelShare>,
    /// Bumped by every wholesale replacement.
    pub generation: u64,
    /// Live-update ticks applied since the last replacement.
    pub ticks: u64,
}

pub type Snapshot = Arc<StoreContents>;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store already holding `dataset` as generation 1.
    #[must_use]
    pub fn with_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        store.replace_all(dataset);
        store
    }

    /// The current contents. Holding the snapshot does not block writers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a whole new dataset atomically and return its generation.
    ///
    /// Resets the live-update tick counter: the next perturbation starts from
    /// the freshly generated values.
    pub fn replace_all(&self, dataset: Dataset) -> u64 {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation + 1;
        *guard = Arc::new(StoreContents {
            campaigns: dataset.campaigns,
            chart: dataset.chart,
            channels: dataset.channels,
            generation,
            ticks: 0,
        });
        generation
    }

    /// Generate a fresh dataset of `spec`'s size and swap it in.
    pub fn load<R: Rng + ?Sized>(&self, spec: DatasetSpec, today: NaiveDate, rng: &mut R) -> u64 {
        self.replace_all(generate_dataset(spec, today, rng))
    }

    /// Replace only the campaign records, keeping the chart and channel data.
    pub fn replace_campaigns(&self, campaigns: Vec<CampaignRecord>) -> u64 {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation + 1;
        let contents = Arc::make_mut(&mut *guard);
        contents.campaigns = campaigns;
        contents.generation = generation;
        contents.ticks = 0;
        generation
    }

    /// Apply `f` to every campaign record as one atomic write.
    ///
    /// Outstanding snapshots keep the pre-mutation values. Returns the number
    /// of records visited.
    pub fn mutate_in_place<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&mut CampaignRecord),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let contents = Arc::make_mut(&mut *guard);
        contents.campaigns.iter_mut().for_each(&mut f);
        contents.ticks += 1;
        contents.campaigns.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().campaigns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }
}
