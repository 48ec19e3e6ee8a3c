//! Shared closed-set vocabulary: professions, topics, sentiment, coverage.
//!
//! These enumerate the fixed categories named throughout the data model
//! rather than strings, so an unknown profession or topic is a compile
//! error instead of a runtime surprise.

use std::fmt;

/// A Person's profession. Fixed set of twelve, pinned from
/// `agents_profession` (the attribute-range reference table).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Profession {
    ShopClerk,
    Worker,
    Developer,
    Politician,
    Blogger,
    Businessman,
    SpiritualMentor,
    Philosopher,
    Unemployed,
    Teacher,
    Artist,
    Doctor,
}

impl Profession {
    pub const ALL: [Profession; 12] = [
        Profession::ShopClerk,
        Profession::Worker,
        Profession::Developer,
        Profession::Politician,
        Profession::Blogger,
        Profession::Businessman,
        Profession::SpiritualMentor,
        Profession::Philosopher,
        Profession::Unemployed,
        Profession::Teacher,
        Profession::Artist,
        Profession::Doctor,
    ];
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A Trend's topic. Fixed set of seven, pinned from `topic_interest_mapping`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topic {
    Economic,
    Health,
    Spiritual,
    Conspiracy,
    Science,
    Culture,
    Sport,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Economic,
        Topic::Health,
        Topic::Spiritual,
        Topic::Conspiracy,
        Topic::Science,
        Topic::Culture,
        Topic::Sport,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Per-agent interest category. Six fixed, stable categories, modeled as a
/// fixed-arity record of named scalars rather than an open map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterestCategory {
    Economics,
    Wellbeing,
    Spirituality,
    Knowledge,
    Creativity,
    Society,
}

impl InterestCategory {
    pub const ALL: [InterestCategory; 6] = [
        InterestCategory::Economics,
        InterestCategory::Wellbeing,
        InterestCategory::Spirituality,
        InterestCategory::Knowledge,
        InterestCategory::Creativity,
        InterestCategory::Society,
    ];
}

impl fmt::Display for InterestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A Trend's sentiment, pinned from migration `9c3c4e6afa12`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sentiment {
    #[default]
    Positive,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Ordinal breadth indicator that modulates exposure impact.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coverage {
    #[default]
    Low,
    Middle,
    High,
}

impl Coverage {
    /// Multiplier applied to exposure-effect deltas.
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            Coverage::Low => 0.3,
            Coverage::Middle => 0.6,
            Coverage::High => 1.0,
        }
    }

    /// Escalate based on `total_interactions`, per configurable thresholds
    /// (default 50 / 500).
    pub fn escalate(self, total_interactions: u64, middle_at: u64, high_at: u64) -> Coverage {
        match self {
            Coverage::Low if total_interactions >= middle_at => Coverage::Middle,
            Coverage::Middle if total_interactions >= high_at => Coverage::High,
            other => other,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A Run's lifecycle state (spec.md §3). Shared between the engine (which
/// drives the transitions) and the repository (which persists them), so it
/// lives here rather than in either crate alone.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    #[default]
    Initialized,
    Running,
    Stopping,
    Completed,
    Failed,
}

impl RunStatus {
    /// `true` for `Completed`/`Failed` — no further transitions are valid.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
