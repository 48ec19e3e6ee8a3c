//! `capsim-trend` — Trend entities and their virality/coverage dynamics (C4).
//!
//! # Crate layout
//!
//! | Module    | Contents                                                |
//! |-----------|-----------------------------------------------------------|
//! | [`trend`] | `Trend`, `add_interaction`/`current_virality`/`coverage_factor` |
//! | [`store`] | `TrendStore` — the growable collection of trends in a run |
//! | [`error`] | `TrendError`, `TrendResult<T>`                          |
//!
//! A trend is created once (on `PublishPost`) and thereafter mutated only
//! via `add_interaction`, never replaced — virality is *derived* from
//! `base_virality` and `total_interactions`, not stored directly.

pub mod error;
pub mod store;
pub mod trend;

#[cfg(test)]
mod tests;

pub use error::{TrendError, TrendResult};
pub use store::TrendStore;
pub use trend::Trend;
