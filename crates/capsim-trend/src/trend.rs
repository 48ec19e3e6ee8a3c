//! A single Trend and its virality/coverage dynamics.

use capsim_core::{AgentId, Coverage, SimTime, Sentiment, Topic, TrendId};

/// A topical artifact created by a publish action, amplified through
/// interactions. Mutated only via `add_interaction` once created.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trend {
    pub id: TrendId,
    pub topic: Topic,
    pub sentiment: Sentiment,
    pub originator: AgentId,
    pub parent: Option<TrendId>,
    pub start_time: SimTime,
    /// Fixed at creation from the publish score; on [0, 5].
    pub base_virality: f64,
    pub coverage: Coverage,
    pub total_interactions: u64,
}

impl Trend {
    pub fn new(
        id: TrendId,
        topic: Topic,
        sentiment: Sentiment,
        originator: AgentId,
        parent: Option<TrendId>,
        start_time: SimTime,
        base_virality: f64,
    ) -> Self {
        Self {
            id,
            topic,
            sentiment,
            originator,
            parent,
            start_time,
            base_virality: base_virality.clamp(0.0, 5.0),
            coverage: Coverage::Low,
            total_interactions: 0,
        }
    }

    /// Record one interaction (a processed `TrendInfluence`), escalating
    /// coverage if the new total crosses a configured threshold.
    pub fn add_interaction(&mut self, middle_at: u64, high_at: u64) {
        self.total_interactions += 1;
        self.coverage = self.coverage.escalate(self.total_interactions, middle_at, high_at);
    }

    /// `base + 0.05 * ln(total_interactions + 1)`, clamped to 5.
    pub fn current_virality(&self) -> f64 {
        let boosted = self.base_virality + 0.05 * ((self.total_interactions + 1) as f64).ln();
        boosted.clamp(0.0, 5.0)
    }

    pub fn coverage_factor(&self) -> f64 {
        self.coverage.factor()
    }
}
