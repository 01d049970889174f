//! In-memory card store for tests and local development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::store::{CardStore, DeleteScope};
use crate::types::card::Card;

/// HashMap-backed store. Not durable; lock poisoning is not recovered.
pub struct MemoryStore {
    cards: RwLock<HashMap<String, Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(HashMap::new()),
        }
    }

    /// Total card count across all topics.
    pub fn len(&self) -> usize {
        self.cards.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn save(&self, card: &Card) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut stored = card.clone();
        stored.id = Some(id.clone());
        self.cards.write().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn save_batch(&self, cards: &[Card]) -> Result<usize> {
        let mut guard = self.cards.write().unwrap();
        for card in cards {
            let id = Uuid::new_v4().to_string();
            let mut stored = card.clone();
            stored.id = Some(id.clone());
            guard.insert(id, stored);
        }
        Ok(cards.len())
    }

    async fn delete_by_scope(&self, scope: &DeleteScope) -> Result<u64> {
        let mut guard = self.cards.write().unwrap();
        let before = guard.len();
        guard.retain(|_, card| !scope.matches(card));
        Ok((before - guard.len()) as u64)
    }

    async fn list_by_topic(&self, topic_id: &str) -> Result<Vec<Card>> {
        let guard = self.cards.read().unwrap();
        let mut cards: Vec<Card> = guard
            .values()
            .filter(|c| c.topic_id == topic_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| {
            (&a.section_code, a.card_type().as_str()).cmp(&(&b.section_code, b.card_type().as_str()))
        });
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::{CardContent, CardType, DateCard};

    fn date_card(topic_id: &str, user: &str, section: &str, year: i32) -> Card {
        Card::new(
            user,
            topic_id,
            "topic-code",
            section,
            CardContent::Date(DateCard {
                section_title: "t".into(),
                section_short_title: "t".into(),
                question: "In which year?".into(),
                correct_year: year,
            }),
        )
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_list_returns_it() {
        let store = MemoryStore::new();
        let id = store.save(&date_card("t1", "u", "s1", 1066)).await.unwrap();

        let cards = store.list_by_topic("t1").await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id.as_deref(), Some(id.as_str()));

        assert!(store.list_by_topic("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_scope_is_selective() {
        let store = MemoryStore::new();
        store
            .save_batch(&[
                date_card("t1", "u", "s1", 1066),
                date_card("t1", "u", "s2", 1086),
                date_card("t1", "other", "s1", 1095),
                date_card("t2", "u", "s1", 1100),
            ])
            .await
            .unwrap();

        let deleted = store
            .delete_by_scope(&DeleteScope::section("t1", "u", "s1", CardType::Date))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.len(), 3);

        let deleted = store
            .delete_by_scope(&DeleteScope::topic("t1", "u"))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        // Other user's and other topic's cards survive
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_replace_cycle() {
        let store = MemoryStore::new();
        store
            .save_batch(&[date_card("t1", "u", "s1", 1066), date_card("t1", "u", "s1", 1086)])
            .await
            .unwrap();

        let deleted = store
            .delete_by_scope(&DeleteScope::topic("t1", "u"))
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let inserted = store
            .save_batch(&[date_card("t1", "u", "s1", 1095)])
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let cards = store.list_by_topic("t1").await.unwrap();
        assert_eq!(cards.len(), 1);
    }
}
