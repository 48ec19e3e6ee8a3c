//! `capsim-agent` — Structure-of-Arrays population storage (C3).
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|----------------------------------------------------------|
//! | [`person`]  | `PersonMeta`, `BirthDate`, `InterestVector`              |
//! | [`store`]   | `PersonStore` (SoA arrays), `AgentRngs` (per-agent RNG)  |
//! | [`history`] | `AttributeHistoryRow`, `apply_update`                    |
//! | [`builder`] | `PersonStoreBuilder` (fluent construction + sampling)    |
//!
//! The population schema is fixed (five scalar attributes, a six-category
//! interest vector, and a closed set of cooldown/exposure fields) rather
//! than an extensible component map — CAPSIM has no notion of
//! application-defined per-agent state beyond what this crate already
//! models.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types. |

pub mod builder;
pub mod error;
pub mod history;
pub mod person;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::PersonStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use history::{apply_update, Attribute, AttributeHistoryRow};
pub use person::{BirthDate, Gender, InterestVector, PersonMeta};
pub use store::{AgentRngs, Cooldowns, PersonStore};
