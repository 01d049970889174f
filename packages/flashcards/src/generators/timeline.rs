//! Timeline ordering exercise generation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FlashcardError, Result};
use crate::generators::{prompts, GenerationContext, GenerationStrategy, SectionDocument};
use crate::traits::completion::{Completion, OutputFormat};
use crate::types::card::{Card, CardContent, CardType, TimelineCard, TimelineEvent};

pub const TIMELINE_TAG: &str = "t1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimelineResponse {
    #[serde(default)]
    events: Option<Vec<RawTimelineEvent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimelineEvent {
    event: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    date_format: Option<String>,
    #[serde(default)]
    correct_index: Option<usize>,
}

/// Generates at most one timeline card per section: the section's events in
/// scrambled order, with `correct_index` preserving the true order.
pub struct TimelineStrategy {
    completion: Arc<dyn Completion>,
    rng: Mutex<StdRng>,
}

impl TimelineStrategy {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self {
            completion,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_rng_seed(completion: Arc<dyn Completion>, seed: u64) -> Self {
        Self {
            completion,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl GenerationStrategy for TimelineStrategy {
    fn tag(&self) -> &'static str {
        TIMELINE_TAG
    }

    fn card_type(&self) -> CardType {
        CardType::Timeline
    }

    async fn generate(
        &self,
        ctx: &GenerationContext,
        section: &SectionDocument,
    ) -> Result<Vec<Card>> {
        let prompt = prompts::format_timeline_prompt(&ctx.topic_code, &section.content);
        let response = self
            .completion
            .complete(&prompt, OutputFormat::Json, ctx.cid.as_deref())
            .await?;

        if response.value.is_null() {
            debug!(
                topic_code = %ctx.topic_code,
                section_code = %section.section_code,
                "no timeline for section"
            );
            return Ok(Vec::new());
        }

        let raw: RawTimelineResponse = serde_json::from_value(response.value).map_err(|e| {
            FlashcardError::completion(format!(
                "timeline response did not match expected shape: {}",
                e
            ))
        })?;

        let events = match raw.events {
            Some(events) if !events.is_empty() => events,
            _ => return Ok(Vec::new()),
        };

        let mut card = TimelineCard {
            section_title: section.title.clone(),
            section_short_title: section.short_title.clone(),
            events: events
                .into_iter()
                .map(|e| TimelineEvent {
                    event: e.event,
                    date: e.date,
                    date_format: e.date_format,
                    correct_index: e.correct_index,
                })
                .collect(),
        };

        {
            let mut rng = self.rng.lock().unwrap();
            card.shuffle_events(&mut *rng);
        }

        Ok(vec![Card::new(
            &ctx.user,
            &ctx.topic_id,
            &ctx.topic_code,
            &section.section_code,
            CardContent::Timeline(card),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCompletion;
    use serde_json::json;

    fn ctx() -> GenerationContext {
        GenerationContext {
            user: "u@test.com".into(),
            topic_id: "topic-1".into(),
            topic_code: "the-crusades".into(),
            cid: None,
        }
    }

    fn section() -> SectionDocument {
        SectionDocument::new("s2", "The First Crusade", "First Crusade", "In 1095...")
    }

    #[tokio::test]
    async fn test_generates_single_timeline_card() {
        let mock = Arc::new(MockCompletion::new().with_response(
            "timeline exercise",
            json!({
                "events": [
                    {"event": "Council of Clermont", "date": "1095", "dateFormat": "year", "correctIndex": 0},
                    {"event": "Siege of Antioch", "date": "1098", "dateFormat": "year", "correctIndex": 1},
                    {"event": "Fall of Jerusalem", "date": "1099", "dateFormat": "year", "correctIndex": 2},
                    {"event": "An undated aside", "date": null, "dateFormat": null, "correctIndex": null}
                ]
            }),
        ));

        let strategy = TimelineStrategy::with_rng_seed(mock, 42);
        let cards = strategy.generate(&ctx(), &section()).await.unwrap();

        assert_eq!(cards.len(), 1);
        match &cards[0].content {
            CardContent::Timeline(c) => {
                assert_eq!(c.events.len(), 4);
                // The true order survives the shuffle
                let mut ordered: Vec<_> = c
                    .events
                    .iter()
                    .filter_map(|e| e.correct_index.map(|i| (i, e.event.as_str())))
                    .collect();
                ordered.sort();
                assert_eq!(
                    ordered,
                    vec![
                        (0, "Council of Clermont"),
                        (1, "Siege of Antioch"),
                        (2, "Fall of Jerusalem")
                    ]
                );
                // The undated event survives ungraded
                assert!(c.events.iter().any(|e| e.correct_index.is_none()));
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_events_yield_no_cards() {
        let mock = Arc::new(
            MockCompletion::new().with_response("timeline exercise", json!({"events": null})),
        );
        let strategy = TimelineStrategy::with_rng_seed(mock, 1);

        let cards = strategy.generate(&ctx(), &section()).await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_null_response_yields_no_cards() {
        let mock = Arc::new(MockCompletion::new());
        let strategy = TimelineStrategy::with_rng_seed(mock, 1);

        let cards = strategy.generate(&ctx(), &section()).await.unwrap();
        assert!(cards.is_empty());
    }
}
