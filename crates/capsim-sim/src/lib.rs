//! Event-driven scheduler/engine for the CAPSIM simulation runtime
//! (spec.md §5-§9).
//!
//! # Run loop
//!
//! ```text
//! loop:
//!   if shutdown requested           → drain/flush per ShutdownMode, stop
//!   if queue empty or next event past duration_days → stop, mark Completed
//!   pop earliest (priority, timestamp, seq) event
//!   clock.sleep_until(event.timestamp)   // no-op under FastClock
//!   dispatch(event)                      // mutate PersonStore/TrendStore,
//!                                         // enqueue committer rows
//!   run_discretionary_phase()            // pace new agent-action events
//!   committer.maybe_flush(now)
//! ```
//!
//! Unlike dt-sim's fixed `for tick in 0..total_ticks` loop over a
//! synchronous wake queue, the engine here drives a real-valued
//! [`SimTime`](capsim_core::SimTime) priority queue of closed-vocabulary
//! [`EventKind`](capsim_event::EventKind)s, supports an externally requested
//! graceful/forced stop ([`ShutdownController`]), and exposes live progress
//! through lock-free atomics ([`EngineObserver`]) rather than a callback
//! trait invoked synchronously on the run loop's own stack.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use capsim_core::SimConfig;
//! use capsim_repo::InMemoryRepository;
//! use capsim_sim::EngineBuilder;
//!
//! let config = SimConfig::default();
//! let mut engine = EngineBuilder::new(config, InMemoryRepository::new()).build()?;
//! engine.start()?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod shutdown;


pub use builder::EngineBuilder;
pub use engine::{Engine, EngineHandle};
pub use error::{SimError, SimResult};
pub use observer::{EngineObserver, EngineStatus};
pub use shutdown::{ShutdownController, ShutdownMode};
