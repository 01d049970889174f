//! Storage trait for persisted cards.
//!
//! A regenerate cycle is delete-then-insert, never an upsert: stale cards
//! from a previous generation must not coexist with new ones in the same
//! scope. There is a window during the cycle where a scope temporarily has
//! zero cards; callers tolerate it.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::card::{Card, CardType};

/// The scope under which one generation run's output is grouped for
/// replacement: topic + user, optionally narrowed to one section + type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteScope {
    pub topic_id: String,
    pub user: String,
    pub section_code: Option<String>,
    pub card_type: Option<CardType>,
}

impl DeleteScope {
    /// All cards of a user for a topic (full regenerate, topic deletion).
    pub fn topic(topic_id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            topic_id: topic_id.into(),
            user: user.into(),
            section_code: None,
            card_type: None,
        }
    }

    /// All cards of a user for one topic + section + type (targeted
    /// regenerate for one strategy/document).
    pub fn section(
        topic_id: impl Into<String>,
        user: impl Into<String>,
        section_code: impl Into<String>,
        card_type: CardType,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            user: user.into(),
            section_code: Some(section_code.into()),
            card_type: Some(card_type),
        }
    }

    /// Whether a card falls inside this scope.
    pub fn matches(&self, card: &Card) -> bool {
        if card.topic_id != self.topic_id || card.user != self.user {
            return false;
        }
        if let Some(section) = &self.section_code {
            if &card.section_code != section {
                return false;
            }
        }
        if let Some(card_type) = self.card_type {
            if card.card_type() != card_type {
                return false;
            }
        }
        true
    }
}

/// Persistence for generated cards.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert one card; returns its generated identifier.
    async fn save(&self, card: &Card) -> Result<String>;

    /// Bulk insert; returns the inserted count.
    ///
    /// All-or-nothing from the caller's perspective: a partial bulk failure
    /// surfaces as an error, not a silently partial write.
    async fn save_batch(&self, cards: &[Card]) -> Result<usize>;

    /// Delete all cards matching the scope; returns the deleted count.
    async fn delete_by_scope(&self, scope: &DeleteScope) -> Result<u64>;

    /// List all cards for a topic, reconstructing each polymorphic card from
    /// its stored record by dispatching on the stored `type` tag.
    async fn list_by_topic(&self, topic_id: &str) -> Result<Vec<Card>>;
}
