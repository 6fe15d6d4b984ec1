//! Explicit dataset refresh: `Idle -> Refreshing -> Idle`.
//!
//! While refreshing, the store keeps serving its previous contents. When the
//! simulated latency elapses a new dataset is generated and swapped in with a
//! single `replace_all`, which also resets the live-update baseline. A
//! request made while a refresh is in flight is a no-op.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;

use crate::generate::DatasetSpec;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// This request moved the controller into `Refreshing`.
    Started,
    /// A refresh was already in flight; nothing new was scheduled.
    AlreadyRefreshing,
}

#[derive(Debug)]
pub struct RefreshController {
    store: RecordStore,
    spec: DatasetSpec,
    latency: Duration,
    state: watch::Sender<RefreshState>,
}

impl RefreshController {
    #[must_use]
    pub fn new(store: RecordStore, spec: DatasetSpec, latency: Duration) -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);
        Self {
            store,
            spec,
            latency,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    /// Begin a refresh on a background task. Must be called from within a
    /// tokio runtime.
    pub fn request(&self) -> RefreshOutcome {
        if !self.try_begin() {
            tracing::debug!("refresh: already in flight; request ignored");
            return RefreshOutcome::AlreadyRefreshing;
        }

        let job = RefreshJob {
            store: self.store.clone(),
            spec: self.spec,
            latency: self.latency,
            _guard: IdleOnDrop(self.state.clone()),
        };
        tokio::spawn(job.run());
        RefreshOutcome::Started
    }

    /// Run a refresh to completion on the calling task.
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.try_begin() {
            return RefreshOutcome::AlreadyRefreshing;
        }
        RefreshJob {
            store: self.store.clone(),
            spec: self.spec,
            latency: self.latency,
            _guard: IdleOnDrop(self.state.clone()),
        }
        .run()
        .await;
        RefreshOutcome::Started
    }

    /// Resolve once the controller is `Idle`.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == RefreshState::Idle).await;
    }

    /// Atomic `Idle -> Refreshing` transition.
    fn try_begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == RefreshState::Idle {
                *state = RefreshState::Refreshing;
                true
            } else {
                false
            }
        })
    }
}

struct RefreshJob {
    store: RecordStore,
    spec: DatasetSpec,
    latency: Duration,
    _guard: IdleOnDrop,
}

impl RefreshJob {
    async fn run(self) {
        tracing::info!(
            latency_ms = self.latency.as_millis(),
            campaigns = self.spec.campaign_count,
            "refresh: started"
        );
        tokio::time::sleep(self.latency).await;
        let generation = swap_in_fresh_dataset(&self.store, self.spec);
        tracing::info!(generation, "refresh: dataset replaced");
    }
}

fn swap_in_fresh_dataset(store: &RecordStore, spec: DatasetSpec) -> u64 {
    store.load(spec, Utc::now().date_naive(), &mut rand::rng())
}

/// Returns the controller to `Idle` however the job ends, including
/// cancellation of its task.
struct IdleOnDrop(watch::Sender<RefreshState>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(RefreshState::Idle);
    }
}
