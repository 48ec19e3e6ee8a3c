//! Shared, lock-free status counters (spec.md §5): the engine updates these
//! as it runs, and any number of independent observer tasks may read them
//! concurrently without touching engine-owned state directly.
//!
//! No direct dt-sim counterpart — the teacher's `SimObserver` was a set of
//! mutable callbacks invoked on the engine's own task, which is exactly the
//! shared-mutable-state shape spec.md §5 rules out ("shared state between
//! engine and observers is restricted to atomic counters"). `EngineObserver`
//! replaces it with plain atomics an external reader can poll without
//! synchronising with the run loop at all.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use capsim_core::{RunId, RunStatus, SimTime};

fn phase_to_u8(status: RunStatus) -> u8 {
    match status {
        RunStatus::Initialized => 0,
        RunStatus::Running => 1,
        RunStatus::Stopping => 2,
        RunStatus::Completed => 3,
        RunStatus::Failed => 4,
    }
}

fn u8_to_phase(v: u8) -> RunStatus {
    match v {
        0 => RunStatus::Initialized,
        1 => RunStatus::Running,
        2 => RunStatus::Stopping,
        3 => RunStatus::Completed,
        _ => RunStatus::Failed,
    }
}

/// Atomic counters shared between the engine's run loop and any read-only
/// observer — a host status page, a test assertion, a log line printed from
/// another thread.
pub struct EngineObserver {
    events_processed: AtomicU64,
    queue_len: AtomicUsize,
    current_sim_time: AtomicU64,
    phase: AtomicU8,
}

impl EngineObserver {
    pub fn new() -> Self {
        Self {
            events_processed: AtomicU64::new(0),
            queue_len: AtomicUsize::new(0),
            current_sim_time: AtomicU64::new(0.0_f64.to_bits()),
            phase: AtomicU8::new(phase_to_u8(RunStatus::Initialized)),
        }
    }

    pub(crate) fn record_event(&self) {
        self.events_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_queue_len(&self, n: usize) {
        self.queue_len.store(n, Ordering::Relaxed);
    }

    pub(crate) fn set_sim_time(&self, t: SimTime) {
        self.current_sim_time.store(t.minutes().to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn set_phase(&self, status: RunStatus) {
        self.phase.store(phase_to_u8(status), Ordering::Relaxed);
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed.load(Ordering::Relaxed)
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn current_sim_time(&self) -> SimTime {
        SimTime::new(f64::from_bits(self.current_sim_time.load(Ordering::Relaxed)))
    }

    pub fn phase(&self) -> RunStatus {
        u8_to_phase(self.phase.load(Ordering::Relaxed))
    }
}

impl Default for EngineObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time read of [`EngineObserver`], matching the `Status()` shape
/// from spec.md §6's external-interface table.
#[derive(Copy, Clone, Debug)]
pub struct EngineStatus {
    pub run_id: RunId,
    pub sim_time: SimTime,
    pub events_processed: u64,
    pub queue_len: usize,
    pub phase: RunStatus,
}
