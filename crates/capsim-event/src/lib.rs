//! `capsim-event` — the priority event queue and closed event-kind
//! vocabulary (C2).
//!
//! # Crate layout
//!
//! | Module    | Contents                                           |
//! |-----------|------------------------------------------------------|
//! | [`event`] | `Event`, `EventKind`                                |
//! | [`queue`] | `EventQueue` (binary heap over `(priority, timestamp, seq)`) |
//! | [`error`] | `EventError`, `EventResult<T>`                      |
//!
//! # Ordering
//!
//! Events compare by `(priority asc, timestamp asc, seq asc)`. `seq` is
//! assigned at push time by the queue, guaranteeing FIFO among exact ties.

pub mod error;
pub mod event;
pub mod queue;


pub use error::{EventError, EventResult};
pub use event::{Event, EventKind, PRIORITY_AGENT_ACTION, PRIORITY_LOW, PRIORITY_SYSTEM};
pub use queue::EventQueue;
