//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a real-valued count of *simulated minutes* since run
//! start (`SimTime`), not an integer tick — durations in the domain (a
//! post cooldown, an energy-recovery period, a daily boundary) are naturally
//! fractional and the event queue must order events at e.g. timestamp 123.0
//! against ones at 123.25 without rounding either into the other.
//!
//! Two clock variants share the `Clock` trait: [`FastClock`] is advanced
//! directly by the engine as events are popped (no wall-clock wait at all),
//! and [`RealtimeClock`] binds sim-time to wall-time via a speed factor:
//!
//!   wall_target = wall_start + sim_t * 60 / speed_factor
//!
//! `speed_factor` is simulated-minutes-per-wall-second; a factor of 60 means
//! one sim-minute per wall-second, 120 runs twice that fast, and so on.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute point in simulated time, measured in simulated minutes since
/// run start. Totally ordered (NaN is never produced by any constructor
/// here, so `Ord` on the underlying `OrderedFloat` is sound).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub OrderedFloat<f64>);

impl SimTime {
    pub const ZERO: SimTime = SimTime(OrderedFloat(0.0));

    #[inline]
    pub fn new(minutes: f64) -> Self {
        SimTime(OrderedFloat(minutes))
    }

    #[inline]
    pub fn minutes(self) -> f64 {
        self.0.into_inner()
    }

    /// Return the point `delta` simulated minutes after `self`.
    #[inline]
    pub fn offset(self, delta_minutes: f64) -> SimTime {
        SimTime::new(self.minutes() + delta_minutes)
    }

    /// Simulated minutes elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.minutes() - earlier.minutes()
    }

    /// Minutes elapsed since the most recent day boundary (for `HH:MM`
    /// rendering of `action_timestamp`, per the persisted-state contract).
    #[inline]
    pub fn minute_of_day(self) -> f64 {
        self.minutes().rem_euclid(1440.0)
    }

    /// Render as `HH:MM`, derived from sim-time modulo 1440 minutes/day.
    pub fn as_hhmm(self) -> String {
        let m = self.minute_of_day() as u64;
        format!("{:02}:{:02}", m / 60, m % 60)
    }

    /// Which day (0-indexed) this point falls on.
    #[inline]
    pub fn day_index(self) -> u64 {
        (self.minutes() / 1440.0).floor().max(0.0) as u64
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        self.offset(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}m", self.minutes())
    }
}

// ── StopSignal ───────────────────────────────────────────────────────────────

/// A cancellable, shareable stop flag. A pending [`Clock::sleep_until`] wait
/// must abort and return immediately once this is tripped.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Trip the signal. Idempotent — tripping twice is a no-op.
    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        *stopped = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.0.lock().unwrap()
    }

    /// Block until either `deadline` passes or the signal is triggered.
    /// Returns `true` if woken by the signal rather than by timeout.
    fn wait_until(&self, deadline: Instant) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, timeout) = cvar.wait_timeout(stopped, deadline - now).unwrap();
            stopped = guard;
            if timeout.timed_out() && !*stopped {
                return false;
            }
        }
        true
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ── Clock ────────────────────────────────────────────────────────────────────

/// Shared interface for the two clock variants.
///
/// Ordering guarantee: `now()` is monotone non-decreasing across calls from
/// the single engine task that owns a clock.
pub trait Clock: Send {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Advance the clock's notion of "now" to (at least) `t`, blocking the
    /// realtime variant until wall-clock catches up, or returning
    /// immediately for the fast variant. Returns early if the stop signal
    /// fires while waiting.
    fn sleep_until(&mut self, t: SimTime);

    fn stop_signal(&self) -> &StopSignal;
}

/// Free-running clock: `now()` simply reflects the last value passed to
/// `sleep_until`, with no wall-clock wait. Used for throughput-oriented runs
/// (`realtime = false`).
pub struct FastClock {
    current: SimTime,
    stop: StopSignal,
}

impl FastClock {
    pub fn new() -> Self {
        Self {
            current: SimTime::ZERO,
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(stop: StopSignal) -> Self {
        Self {
            current: SimTime::ZERO,
            stop,
        }
    }
}

impl Default for FastClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FastClock {
    #[inline]
    fn now(&self) -> SimTime {
        self.current
    }

    #[inline]
    fn sleep_until(&mut self, t: SimTime) {
        if t > self.current {
            self.current = t;
        }
    }

    fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }
}

/// Wall-clock-paced clock: binds sim-time to wall-time via `speed_factor`
/// simulated-minutes per wall-second.
pub struct RealtimeClock {
    wall_start: Instant,
    speed_factor: f64,
    current: SimTime,
    stop: StopSignal,
}

impl RealtimeClock {
    /// `speed_factor` must be ≥ 1; a speed factor of 60 runs one
    /// sim-minute per wall-second.
    pub fn new(speed_factor: f64, stop: StopSignal) -> Self {
        assert!(speed_factor >= 1.0, "speed_factor must be >= 1");
        Self {
            wall_start: Instant::now(),
            speed_factor,
            current: SimTime::ZERO,
            stop,
        }
    }

    /// Wall instant at which `t` should occur, given this clock's start and
    /// speed factor.
    fn wall_target(&self, t: SimTime) -> Instant {
        let secs = t.minutes() * 60.0 / self.speed_factor;
        self.wall_start + Duration::from_secs_f64(secs.max(0.0))
    }
}

impl Clock for RealtimeClock {
    #[inline]
    fn now(&self) -> SimTime {
        self.current
    }

    fn sleep_until(&mut self, t: SimTime) {
        let target = self.wall_target(t);
        self.stop.wait_until(target);
        if t > self.current {
            self.current = t;
        }
    }

    fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration: the recognized run options, plus the
/// additional tunables the ambient stack needs.
///
/// A plain struct, assembled and passed in by the host — no config-loading
/// crate is used, matching the framework's own convention.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Population size for this run.
    pub num_agents: u32,
    /// Nominal simulation length in days (min 1).
    pub duration_days: u32,
    /// Realtime multiplier (sim-minutes per wall-second), ≥ 1. Ignored if
    /// `realtime` is false.
    pub speed_factor: f64,
    /// If false, the clock runs free (`FastClock`); if true, paced
    /// (`RealtimeClock`).
    pub realtime: bool,
    /// Flush threshold per committer buffer.
    pub batch_size: usize,
    /// Time-based flush threshold in milliseconds.
    pub batch_timeout_ms: u64,
    /// Publish-score gate.
    pub decide_threshold: f64,
    /// Minimum sim-minutes between posts per agent.
    pub post_cooldown_min: f64,
    /// Per-level daily purchase cap, indexed by purchase level.
    pub purchase_caps: Vec<u32>,
    /// Δenergy applied per EnergyRecovery tick.
    pub energy_recovery_delta: f64,
    /// Master RNG seed.
    pub rng_seed: u64,

    // ── ambient tunables beyond the core run options ────────────────────
    /// Re-exposure cooldown *E*: minutes after which a repeat
    /// exposure to the same trend is treated as fresh.
    pub exposure_cooldown_min: f64,
    /// k1 coefficient: Δtrend_receptivity = k1 * affinity/5 * coverage_factor.
    pub exposure_k1: f64,
    /// k2 coefficient: Δenergy_level = -k2 on exposure.
    pub exposure_k2: f64,
    /// total_interactions threshold for Low→Middle coverage escalation.
    pub coverage_middle_threshold: u64,
    /// total_interactions threshold for Middle→High coverage escalation.
    pub coverage_high_threshold: u64,
    /// Per-sim-minute cap on newly enqueued TrendInfluence events, applied
    /// by the default reach policy.
    pub fan_out_budget_per_minute: u32,
    /// Upper bound on jitter (sim-minutes) applied to newly scheduled
    /// discretionary events, to avoid synchronous bursts.
    pub jitter_window_min: f64,
    /// Target population-wide decisions per agent per simulated day; used to
    /// derive the per-tick decide rate.
    pub target_actions_per_agent_per_day: f64,
    /// Hard cap on resident events in the queue.
    pub max_queue_len: usize,
    /// Repository retry attempts on a transient error before escalating to
    /// fatal.
    pub repo_retry_max_attempts: u32,
    /// Base backoff in milliseconds for repository retries (doubled per
    /// attempt, `base * 2^k`).
    pub repo_retry_base_backoff_ms: u64,
    /// Δenergy_level applied (negative) when an agent publishes a post.
    pub publish_energy_cost: f64,
    /// Δtime_budget applied (negative) when an agent publishes a post.
    pub publish_time_cost: f64,
    /// Per-level multiplier on the Δfinancial_capability (negative) charged
    /// by a purchase: `cost = purchase_cost_per_level * (level + 1)`.
    pub purchase_cost_per_level: f64,
    /// Δknowledge-mapped interest applied on a SelfDev action.
    pub selfdev_knowledge_delta: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_agents: 1,
            duration_days: 1,
            speed_factor: 60.0,
            realtime: false,
            batch_size: 100,
            batch_timeout_ms: 1000,
            decide_threshold: 0.25,
            post_cooldown_min: 60.0,
            purchase_caps: vec![3, 2, 1],
            energy_recovery_delta: 0.5,
            rng_seed: 0,
            exposure_cooldown_min: 30.0,
            exposure_k1: 0.5,
            exposure_k2: 0.1,
            coverage_middle_threshold: 50,
            coverage_high_threshold: 500,
            fan_out_budget_per_minute: 500,
            jitter_window_min: 5.0,
            target_actions_per_agent_per_day: 43.0,
            max_queue_len: 5000,
            repo_retry_max_attempts: 5,
            repo_retry_base_backoff_ms: 50,
            publish_energy_cost: 0.5,
            publish_time_cost: 0.5,
            purchase_cost_per_level: 0.2,
            selfdev_knowledge_delta: 0.3,
        }
    }
}

impl SimConfig {
    /// The sim-time at which the run's nominal duration ends.
    #[inline]
    pub fn end_sim_time(&self) -> SimTime {
        SimTime::new(self.duration_days as f64 * 1440.0)
    }

    /// Construct the clock variant this config selects, sharing `stop`.
    pub fn make_clock(&self, stop: StopSignal) -> Box<dyn Clock> {
        if self.realtime {
            Box::new(RealtimeClock::new(self.speed_factor, stop))
        } else {
            Box::new(FastClock::with_stop_signal(stop))
        }
    }
}
