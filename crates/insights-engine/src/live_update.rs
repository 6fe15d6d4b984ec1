//! Simulated live feed: a recurring timer that nudges every campaign's
//! revenue, users and conversions by a bounded random delta.
//!
//! The timer has an explicit lifecycle. [`LiveUpdateScheduler::start`] spawns
//! it on the current tokio runtime and [`LiveUpdateScheduler::stop`] releases
//! it; `stop` is idempotent and also runs on drop. Once `stop` returns no
//! further tick lands in the store.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use insights_core::CampaignRecord;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::store::RecordStore;

/// Shortest cadence the timer accepts. Anything below it is raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Per-field spread of one tick. A field moves by
/// `floor((random() - 0.5) * magnitude)`, so by at most `ceil(magnitude / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perturbation {
    pub revenue: u64,
    pub users: u64,
    pub conversions: u64,
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            revenue: 1_000,
            users: 100,
            conversions: 10,
        }
    }
}

impl Perturbation {
    /// Delta for one field given a uniform `roll` in `[0, 1)`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    pub fn delta(magnitude: u64, roll: f64) -> i64 {
        ((roll - 0.5) * magnitude as f64).floor() as i64
    }

    /// Largest absolute change a single tick can make to a field.
    #[must_use]
    pub fn max_step(magnitude: u64) -> u64 {
        magnitude.div_ceil(2)
    }

    /// Perturb the numeric performance fields of `record`, saturating at 0.
    ///
    /// Identity and descriptive fields are left untouched.
    pub fn apply<R: Rng + ?Sized>(&self, record: &mut CampaignRecord, rng: &mut R) {
        record.revenue = record
            .revenue
            .saturating_add_signed(Self::delta(self.revenue, rng.random()));
        record.users = record
            .users
            .saturating_add_signed(Self::delta(self.users, rng.random()));
        record.conversions = record
            .conversions
            .saturating_add_signed(Self::delta(self.conversions, rng.random()));
    }
}

/// Apply one tick to every record in `store`. Returns the records touched.
pub fn apply_tick<R: Rng + ?Sized>(
    store: &RecordStore,
    perturbation: &Perturbation,
    rng: &mut R,
) -> usize {
    store.mutate_in_place(|record| perturbation.apply(record, rng))
}

struct RunningTimer {
    shutdown: watch::Sender<bool>,
    // Held for the whole of each tick; `stop` flips it to close the timer.
    active: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

pub struct LiveUpdateScheduler {
    store: RecordStore,
    interval: Duration,
    perturbation: Perturbation,
    timer: Mutex<Option<RunningTimer>>,
}

impl LiveUpdateScheduler {
    /// An `interval` shorter than [`MIN_INTERVAL`] is raised to it.
    #[must_use]
    pub fn new(store: RecordStore, interval: Duration, perturbation: Perturbation) -> Self {
        let interval = if interval < MIN_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis(),
                min_ms = MIN_INTERVAL.as_millis(),
                "live update: interval below minimum, clamping"
            );
            MIN_INTERVAL
        } else {
            interval
        };
        Self {
            store,
            interval,
            perturbation,
            timer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|timer| !timer.task.is_finished())
    }

    /// Spawn the recurring timer. The first tick fires one interval from now.
    ///
    /// Returns `false` if the timer was already running. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut slot = self.lock_timer();
        if slot.is_some() {
            return false;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let active = Arc::new(Mutex::new(true));
        let gate = Arc::clone(&active);
        let store = self.store.clone();
        let perturbation = self.perturbation;
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let Some(touched) = tick_if_active(&gate, &store, &perturbation) else {
                            break;
                        };
                        tracing::debug!(records = touched, "live update: applied tick");
                    }
                }
            }
            tracing::debug!("live update: timer stopped");
        });

        tracing::info!(
            interval_secs = period.as_secs_f64(),
            "live update: timer started"
        );
        *slot = Some(RunningTimer {
            shutdown,
            active,
            task,
        });
        true
    }

    /// Release the timer. Returns `true` only for the call that actually
    /// stopped a running timer; later calls are no-ops.
    pub fn stop(&self) -> bool {
        let Some(timer) = self.lock_timer().take() else {
            return false;
        };
        // The task may already have exited if the runtime is shutting down.
        let _ = timer.shutdown.send(true);
        // Waits out a tick that is mid-flight on another worker.
        *timer.active.lock().unwrap_or_else(PoisonError::into_inner) = false;
        timer.task.abort();
        tracing::info!("live update: timer released");
        true
    }

    /// Apply one tick immediately, outside the timer cadence.
    pub fn tick_now(&self) -> usize {
        tick_with_thread_rng(&self.store, &self.perturbation)
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<RunningTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LiveUpdateScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick_with_thread_rng(store: &RecordStore, perturbation: &Perturbation) -> usize {
    apply_tick(store, perturbation, &mut rand::rng())
}

fn tick_if_active(
    gate: &Mutex<bool>,
    store: &RecordStore,
    perturbation: &Perturbation,
) -> Option<usize> {
    let active = gate.lock().unwrap_or_else(PoisonError::into_inner);
    if !*active {
        return None;
    }
    Some(tick_with_thread_rng(store, perturbation))
}

#[cfg(test)]
#[path = "live_update_test.rs"]
mod tests;
