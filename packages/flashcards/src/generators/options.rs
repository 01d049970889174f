//! Multiple-options question generation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FlashcardError, Result};
use crate::generators::{prompts, GenerationContext, GenerationStrategy, SectionDocument};
use crate::traits::completion::{Completion, OutputFormat};
use crate::types::card::{Card, CardContent, CardType, MultipleOptionsCard};

/// Strategy revision tag. Bump when the prompt or parsing changes in a way
/// that affects output.
pub const OPTIONS_TAG: &str = "o1.0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOptionsQuestion {
    question: String,
    options: Vec<String>,
    right_answer_index: usize,
}

/// Generates multiple-choice cards and shuffles each card's options so the
/// correct answer is not positionally biased.
pub struct OptionsStrategy {
    completion: Arc<dyn Completion>,
    rng: Mutex<StdRng>,
}

impl OptionsStrategy {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self {
            completion,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic shuffling for tests.
    pub fn with_rng_seed(completion: Arc<dyn Completion>, seed: u64) -> Self {
        Self {
            completion,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl GenerationStrategy for OptionsStrategy {
    fn tag(&self) -> &'static str {
        OPTIONS_TAG
    }

    fn card_type(&self) -> CardType {
        CardType::Options
    }

    async fn generate(
        &self,
        ctx: &GenerationContext,
        section: &SectionDocument,
    ) -> Result<Vec<Card>> {
        let prompt = prompts::format_options_prompt(&ctx.topic_code, &section.content);
        let response = self
            .completion
            .complete(&prompt, OutputFormat::Json, ctx.cid.as_deref())
            .await?;

        if response.value.is_null() {
            debug!(
                topic_code = %ctx.topic_code,
                section_code = %section.section_code,
                "no options questions for section"
            );
            return Ok(Vec::new());
        }

        let raw: Vec<RawOptionsQuestion> = serde_json::from_value(response.value)
            .map_err(|e| {
                FlashcardError::completion(format!(
                    "options response did not match expected shape: {}",
                    e
                ))
            })?;

        let mut rng = self.rng.lock().unwrap();
        let mut cards = Vec::with_capacity(raw.len());
        for question in raw {
            if question.options.len() < 2 {
                return Err(FlashcardError::completion(format!(
                    "options question \"{}\" has fewer than 2 options",
                    question.question
                )));
            }
            if question.right_answer_index >= question.options.len() {
                return Err(FlashcardError::completion(format!(
                    "options question \"{}\" has right answer index out of range",
                    question.question
                )));
            }

            let mut content = MultipleOptionsCard {
                section_title: Some(section.title.clone()),
                section_short_title: section.short_title.clone(),
                question: question.question,
                options: question.options,
                right_answer_index: question.right_answer_index,
            };
            content.shuffle_options(&mut *rng);

            cards.push(Card::new(
                &ctx.user,
                &ctx.topic_id,
                &ctx.topic_code,
                &section.section_code,
                CardContent::Options(content),
            ));
        }

        Ok(cards)
    }
}
