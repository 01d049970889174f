//! Strategy construction for the closed set of card types.

use std::sync::Arc;

use crate::generators::{
    date::DATE_TAG, graph::GRAPH_TAG, options::OPTIONS_TAG, timeline::TIMELINE_TAG, DateStrategy,
    GenerationStrategy, GraphStrategy, OptionsStrategy, TimelineStrategy,
};
use crate::traits::completion::Completion;
use crate::types::card::CardType;

/// The fingerprint of the current generator set: every strategy tag, joined
/// in factory order. Stamped on completion events so consumers can tell
/// which generator revisions produced a batch.
pub fn generation_fingerprint() -> String {
    [OPTIONS_TAG, TIMELINE_TAG, DATE_TAG, GRAPH_TAG].join("-")
}

/// Builds generation strategies around a shared completion seam.
pub struct StrategyFactory {
    completion: Arc<dyn Completion>,
}

impl StrategyFactory {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    /// The strategy for one card type. Total over [`CardType`]; there is no
    /// unknown-type path since the set is closed at the type level.
    pub fn create(&self, card_type: CardType) -> Arc<dyn GenerationStrategy> {
        match card_type {
            CardType::Options => Arc::new(OptionsStrategy::new(self.completion.clone())),
            CardType::Timeline => Arc::new(TimelineStrategy::new(self.completion.clone())),
            CardType::Date => Arc::new(DateStrategy::new(self.completion.clone())),
            CardType::Graph => Arc::new(GraphStrategy::new(self.completion.clone())),
        }
    }

    /// One strategy per card type, in factory order.
    pub fn all(&self) -> Vec<Arc<dyn GenerationStrategy>> {
        CardType::ALL.iter().map(|t| self.create(*t)).collect()
    }
}
