//! `ShutdownController` (C9) — graceful/forced termination (spec.md §4.8).
//!
//! No dt-sim counterpart: the teacher's tick loop ran to `total_ticks` and
//! stopped, with no notion of an external stop request. `StopSignal`
//! (capsim-core) already gives a cancellable wait for `Clock::sleep_until`;
//! this module adds the mode (`Graceful`/`Forced`) an external caller
//! requests and the idempotency `Engine::stop` needs (P5: a second
//! `Stop(graceful)` call must not re-run the drain/flush/mark sequence).

use std::sync::{Arc, Mutex};

use capsim_core::StopSignal;

/// Requested termination mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Stop admitting new discretionary events, drain already-scheduled
    /// system events until the queue empties or a 25s soft deadline passes,
    /// then flush and mark `Completed`. Target ≤ 30s wall.
    Graceful,
    /// Discard in-flight events, flush best-effort, mark `Failed`.
    /// Target ≤ 5s wall.
    Forced,
}

/// Coordinates a stop request between the engine's run loop (the only task
/// that mutates simulation state) and any number of external callers
/// requesting shutdown.
#[derive(Clone)]
pub struct ShutdownController {
    stop: StopSignal,
    requested: Arc<Mutex<Option<ShutdownMode>>>,
}

impl ShutdownController {
    pub fn new(stop: StopSignal) -> Self {
        Self {
            stop,
            requested: Arc::new(Mutex::new(None)),
        }
    }

    /// Request termination in `mode`. Idempotent: a `Forced` request is
    /// never downgraded by a later `Graceful` one, and re-requesting the
    /// same (or a weaker) mode after shutdown has already begun is a no-op
    /// beyond re-tripping the stop signal.
    pub fn request(&self, mode: ShutdownMode) {
        let mut guard = self.requested.lock().unwrap();
        match *guard {
            Some(ShutdownMode::Forced) => {}
            _ => *guard = Some(mode),
        }
        drop(guard);
        self.stop.trigger();
    }

    pub fn requested_mode(&self) -> Option<ShutdownMode> {
        *self.requested.lock().unwrap()
    }

    pub fn is_triggered(&self) -> bool {
        self.stop.is_triggered()
    }
}
