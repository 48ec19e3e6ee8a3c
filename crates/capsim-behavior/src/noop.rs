//! A no-op decision model — agents never produce actions.

use capsim_core::{AgentId, AgentRng};

use crate::action::Action;
use crate::context::DecisionContext;
use crate::model::DecisionModel;

/// A [`DecisionModel`] that always returns `None`.
///
/// Useful as a placeholder in tests, or for "passive" populations that never
/// act on their own (e.g. while only exercising the exposure/reaction path).
pub struct NoopDecisionModel;

impl DecisionModel for NoopDecisionModel {
    fn decide(&self, _agent: AgentId, _ctx: &DecisionContext<'_>, _rng: &mut AgentRng) -> Option<Action> {
        None
    }
}
