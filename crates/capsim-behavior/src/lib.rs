//! `capsim-behavior` — agent decision model, action types, reach policy,
//! and the trend-exposure effect (C3's decision half).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|-----------------------------------------------------------|
//! | [`action`]   | `Action` enum (`PublishPost`, `Purchase`, `SelfDev`)      |
//! | [`context`]  | `DecisionContext<'a>` — read-only state snapshot          |
//! | [`model`]    | `DecisionModel` trait, `CapsimDecisionModel`              |
//! | [`noop`]     | `NoopDecisionModel` — placeholder that never acts          |
//! | [`reach`]    | `ReachPolicy` trait, `DefaultReachPolicy`, `ChainedReachPolicy` |
//! | [`exposure`] | `apply_exposure` — the `TrendInfluence` attribute effect  |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                      |
//!
//! # Design notes
//!
//! Unlike the teacher's two-phase (parallel intent / sequential apply) tick
//! loop, the engine here is single-threaded end to end (spec.md §5): there is
//! no data-race concern to design `DecisionModel` around, so it only needs to
//! be callable repeatedly with fresh borrows, not `Sync`. The call shape is
//! still the same one-function-per-decision-point the teacher's
//! `BehaviorModel` used: the engine builds a `DecisionContext` borrowing its
//! owned `PersonStore`/`TrendStore`/`SimConfig`, calls `decide` for one idle
//! agent, and applies the returned `Action` (if any) itself.

pub mod action;
pub mod context;
pub mod error;
pub mod exposure;
pub mod model;
pub mod noop;
pub mod reach;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use context::DecisionContext;
pub use error::{BehaviorError, BehaviorResult};
pub use exposure::apply_exposure;
pub use model::{CapsimDecisionModel, DecisionModel};
pub use noop::NoopDecisionModel;
pub use reach::{ChainedReachPolicy, DefaultReachPolicy, ReachPolicy, ReachPolicyExt};
