//! `capsim-core` — foundational types for the CAPSIM simulation runtime.
//!
//! This crate is a dependency of every other `capsim-*` crate. It
//! intentionally has no `capsim-*` dependencies and minimal external ones
//! (`rand`, `ordered-float`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `RunId`, `TrendId`, `EventId`                   |
//! | [`domain`] | `Profession`, `Topic`, `InterestCategory`, `Sentiment`, `Coverage`, `RunStatus` |
//! | [`time`]   | `SimTime`, `Clock`, `FastClock`, `RealtimeClock`, `SimConfig` |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (global)                  |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. Required by `capsim-repo`. |

pub mod domain;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use domain::{Coverage, InterestCategory, Profession, RunStatus, Sentiment, Topic};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, EventId, RunId, TrendId};
pub use rng::{AgentRng, SimRng};
pub use time::{Clock, FastClock, RealtimeClock, SimConfig, SimTime, StopSignal};
