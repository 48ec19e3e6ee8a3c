//! `TrendStore` — the collection of every `Trend` created during a run.
//!
//! Modeled on `capsim-agent::store::PersonStore`'s SoA-storage conventions,
//! since neither dt-core nor dt-agent has an existing "trend-like" entity to
//! generalize from. Unlike `PersonStore`, trends are created incrementally
//! (one per `PublishPost`) rather than up front, so storage is a plain
//! growable `Vec` indexed by `TrendId` rather than a fixed-size SoA.

use capsim_core::TrendId;

use crate::error::{TrendError, TrendResult};
use crate::trend::Trend;

/// All trends created so far in a run, indexed by `TrendId`.
#[derive(Default)]
pub struct TrendStore {
    trends: Vec<Trend>,
}

impl TrendStore {
    pub fn new() -> Self {
        Self { trends: Vec::new() }
    }

    /// Insert a newly created trend, assigning it the next `TrendId`.
    /// The caller must have already set `trend.id` to this same value.
    pub fn insert(&mut self, trend: Trend) -> TrendId {
        let id = TrendId(self.trends.len() as u32);
        debug_assert_eq!(trend.id, id, "caller must pre-assign the id this store will give it");
        self.trends.push(trend);
        id
    }

    /// The next id that `insert` would assign, for pre-constructing a
    /// `Trend` with its final id before pushing it.
    #[inline]
    pub fn next_id(&self) -> TrendId {
        TrendId(self.trends.len() as u32)
    }

    #[inline]
    pub fn get(&self, id: TrendId) -> TrendResult<&Trend> {
        self.trends.get(id.index()).ok_or(TrendError::NotFound(id))
    }

    #[inline]
    pub fn get_mut(&mut self, id: TrendId) -> TrendResult<&mut Trend> {
        self.trends.get_mut(id.index()).ok_or(TrendError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trend> {
        self.trends.iter()
    }
}
