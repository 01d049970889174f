//! Date ("in which year") question generation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FlashcardError, Result};
use crate::generators::{prompts, GenerationContext, GenerationStrategy, SectionDocument};
use crate::traits::completion::{Completion, OutputFormat};
use crate::types::card::{Card, CardContent, CardType, DateCard};

pub const DATE_TAG: &str = "d1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateQuestion {
    question: String,
    correct_year: i32,
}

/// Generates "in which year" cards, ordered ascending by year so a
/// section's cards read chronologically.
pub struct DateStrategy {
    completion: Arc<dyn Completion>,
}

impl DateStrategy {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl GenerationStrategy for DateStrategy {
    fn tag(&self) -> &'static str {
        DATE_TAG
    }

    fn card_type(&self) -> CardType {
        CardType::Date
    }

    async fn generate(
        &self,
        ctx: &GenerationContext,
        section: &SectionDocument,
    ) -> Result<Vec<Card>> {
        let prompt = prompts::format_date_prompt(&ctx.topic_code, &section.content);
        let response = self
            .completion
            .complete(&prompt, OutputFormat::Json, ctx.cid.as_deref())
            .await?;

        if response.value.is_null() {
            debug!(
                topic_code = %ctx.topic_code,
                section_code = %section.section_code,
                "no date questions for section"
            );
            return Ok(Vec::new());
        }

        let mut raw: Vec<RawDateQuestion> = serde_json::from_value(response.value).map_err(|e| {
            FlashcardError::completion(format!(
                "date response did not match expected shape: {}",
                e
            ))
        })?;

        raw.sort_by_key(|q| q.correct_year);

        Ok(raw
            .into_iter()
            .map(|question| {
                Card::new(
                    &ctx.user,
                    &ctx.topic_id,
                    &ctx.topic_code,
                    &section.section_code,
                    CardContent::Date(DateCard {
                        section_title: section.title.clone(),
                        section_short_title: section.short_title.clone(),
                        question: question.question,
                        correct_year: question.correct_year,
                    }),
                )
            })
            .collect())
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
            topic_code: "ancient-rome".into(),
            cid: None,
        }
    }

    fn section() -> SectionDocument {
        SectionDocument::new("s3", "The Republic", "Republic", "In 509 BCE...")
    }

    #[tokio::test]
    async fn test_cards_are_sorted_by_year() {
        let mock = Arc::new(MockCompletion::new().with_response(
            "date quiz",
            json!([
                {"question": "When did Caesar cross the Rubicon?", "correctYear": -49},
                {"question": "When was the Republic founded?", "correctYear": -509},
                {"question": "When was Augustus made princeps?", "correctYear": -27}
            ]),
        ));

        let strategy = DateStrategy::new(mock);
        let cards = strategy.generate(&ctx(), &section()).await.unwrap();

        let years: Vec<i32> = cards
            .iter()
            .map(|c| match &c.content {
                CardContent::Date(d) => d.correct_year,
                other => panic!("unexpected content: {:?}", other),
            })
            .collect();
        assert_eq!(years, vec![-509, -49, -27]);
    }

    #[tokio::test]
    async fn test_null_response_yields_no_cards() {
        let mock = Arc::new(MockCompletion::new());
        let strategy = DateStrategy::new(mock);

        let cards = strategy.generate(&ctx(), &section()).await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_is_completion_error() {
        let mock = Arc::new(MockCompletion::new().with_response("date quiz", json!("nope")));
        let strategy = DateStrategy::new(mock);

        let err = strategy.generate(&ctx(), &section()).await.unwrap_err();
        assert!(matches!(err, FlashcardError::Completion(_)));
    }
}
