//! Fan-out orchestration of a generation run.
//!
//! A run fans out one generation unit per (section, strategy) pair and joins
//! them all-or-nothing: any unit failing fails the whole run, and the store
//! is not touched. Only after every unit succeeds does the delete-then-insert
//! replace cycle run, followed by exactly one completion event.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::error::{FlashcardError, Result};
use crate::events::FlashcardsCreatedEvent;
use crate::generators::{
    generation_fingerprint, GenerationContext, GenerationStrategy, SectionDocument,
    StrategyFactory,
};
use crate::traits::completion::Completion;
use crate::traits::kb::KnowledgeBase;
use crate::traits::publisher::EventPublisher;
use crate::traits::store::{CardStore, DeleteScope};
use crate::types::card::{Card, CardType};

/// The result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Fingerprint of the strategy set that ran.
    pub generation: String,
    /// Cards removed by the replace cycle.
    pub deleted: u64,
    /// Cards inserted by the replace cycle.
    pub inserted: usize,
    /// The aggregated cards, in no particular cross-section order.
    pub cards: Vec<Card>,
}

/// Drives generation runs over the trait seams.
pub struct GenerationOrchestrator {
    kb: Arc<dyn KnowledgeBase>,
    store: Arc<dyn CardStore>,
    publisher: Arc<dyn EventPublisher>,
    factory: StrategyFactory,
}

impl GenerationOrchestrator {
    pub fn new(
        kb: Arc<dyn KnowledgeBase>,
        store: Arc<dyn CardStore>,
        publisher: Arc<dyn EventPublisher>,
        completion: Arc<dyn Completion>,
    ) -> Self {
        Self {
            kb,
            store,
            publisher,
            factory: StrategyFactory::new(completion),
        }
    }

    /// Full regenerate: every section of the topic, every strategy.
    ///
    /// A run that produces zero cards leaves the store untouched and emits
    /// no event; existing cards are not deleted for an empty result.
    pub async fn run(
        &self,
        topic_code: &str,
        topic_id: &str,
        user: &str,
        cid: Option<&str>,
    ) -> Result<GenerationOutcome> {
        let ctx = GenerationContext {
            user: user.to_string(),
            topic_id: topic_id.to_string(),
            topic_code: topic_code.to_string(),
            cid: cid.map(str::to_string),
        };

        let sections = self.load_sections(topic_code).await?;
        let strategies = self.factory.all();

        info!(
            topic_code,
            topic_id,
            sections = sections.len(),
            strategies = strategies.len(),
            "starting generation run"
        );

        let cards = self.generate_units(&ctx, &sections, &strategies).await?;

        self.replace_and_publish(&ctx, cards, DeleteScope::topic(topic_id, user), None, None)
            .await
    }

    /// Targeted regenerate: one section, optionally narrowed to one card
    /// type. Replaces only the matching scope.
    pub async fn run_section(
        &self,
        topic_code: &str,
        topic_id: &str,
        user: &str,
        section_code: &str,
        card_type: Option<CardType>,
        cid: Option<&str>,
    ) -> Result<GenerationOutcome> {
        let ctx = GenerationContext {
            user: user.to_string(),
            topic_id: topic_id.to_string(),
            topic_code: topic_code.to_string(),
            cid: cid.map(str::to_string),
        };

        let sections = self.load_sections(topic_code).await?;
        let section = sections
            .into_iter()
            .find(|s| s.section_code == section_code)
            .ok_or_else(|| FlashcardError::SectionNotFound {
                topic_code: topic_code.to_string(),
                section_code: section_code.to_string(),
            })?;

        let strategies = match card_type {
            Some(t) => vec![self.factory.create(t)],
            None => self.factory.all(),
        };

        info!(
            topic_code,
            topic_id,
            section_code,
            card_type = card_type.map(|t| t.as_str()).unwrap_or("all"),
            "starting targeted generation run"
        );

        let cards = self
            .generate_units(&ctx, std::slice::from_ref(&section), &strategies)
            .await?;

        let scope = DeleteScope {
            topic_id: topic_id.to_string(),
            user: user.to_string(),
            section_code: Some(section_code.to_string()),
            card_type,
        };

        self.replace_and_publish(&ctx, cards, scope, Some(section_code.to_string()), card_type)
            .await
    }

    /// Remove every card of the user for a topic. No completion event; the
    /// topic is going away, not being regenerated.
    pub async fn delete_topic(&self, topic_id: &str, user: &str) -> Result<u64> {
        let deleted = self
            .store
            .delete_by_scope(&DeleteScope::topic(topic_id, user))
            .await?;
        info!(topic_id, deleted, "deleted topic cards");
        Ok(deleted)
    }

    async fn load_sections(&self, topic_code: &str) -> Result<Vec<SectionDocument>> {
        let refs = self.kb.list_sections(topic_code).await?;

        let reads = refs.iter().map(|section| {
            let kb = &self.kb;
            async move {
                let content = kb.read_section(topic_code, &section.code).await?;
                Ok::<_, FlashcardError>(SectionDocument::new(
                    &section.code,
                    &section.title,
                    &section.short_title,
                    content,
                ))
            }
        });

        try_join_all(reads).await
    }

    /// Fan out one unit per (section, strategy) and join all-or-nothing.
    async fn generate_units(
        &self,
        ctx: &GenerationContext,
        sections: &[SectionDocument],
        strategies: &[Arc<dyn GenerationStrategy>],
    ) -> Result<Vec<Card>> {
        let mut units = Vec::with_capacity(sections.len() * strategies.len());
        for section in sections {
            for strategy in strategies {
                units.push(async move {
                    let cards = strategy.generate(ctx, section).await?;
                    debug!(
                        section_code = %section.section_code,
                        strategy = strategy.tag(),
                        cards = cards.len(),
                        "generation unit finished"
                    );
                    Ok::<_, FlashcardError>(cards)
                });
            }
        }

        let batches = try_join_all(units).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn replace_and_publish(
        &self,
        ctx: &GenerationContext,
        cards: Vec<Card>,
        scope: DeleteScope,
        section_code: Option<String>,
        card_type: Option<CardType>,
    ) -> Result<GenerationOutcome> {
        let generation = generation_fingerprint();

        if cards.is_empty() {
            info!(
                topic_code = %ctx.topic_code,
                topic_id = %ctx.topic_id,
                "run produced no cards, leaving store untouched"
            );
            return Ok(GenerationOutcome {
                generation,
                deleted: 0,
                inserted: 0,
                cards,
            });
        }

        let deleted = self.store.delete_by_scope(&scope).await?;
        let inserted = self.store.save_batch(&cards).await?;

        let event = FlashcardsCreatedEvent {
            generation: generation.clone(),
            topic_code: ctx.topic_code.clone(),
            topic_id: ctx.topic_id.clone(),
            section_code,
            card_type,
            count: inserted,
        };
        self.publisher.publish(&event).await?;

        info!(
            topic_code = %ctx.topic_code,
            topic_id = %ctx.topic_id,
            deleted,
            inserted,
            generation = %generation,
            "generation run complete"
        );

        Ok(GenerationOutcome {
            generation,
            deleted,
            inserted,
            cards,
        })
    }
}
