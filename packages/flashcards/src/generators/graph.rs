//! Historical graph card generation.
//!
//! Two completion passes. The first extracts a summary, a chained event
//! graph, and free-standing facts. The second writes questions for the
//! graph's events, addressed by event code. A section without a narrative
//! (null graph in the first pass) produces no card and skips the second
//! pass entirely.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FlashcardError, Result};
use crate::generators::{prompts, GenerationContext, GenerationStrategy, SectionDocument};
use crate::traits::completion::{Completion, OutputFormat};
use crate::types::card::{Card, CardContent, CardType, HistoricalGraphCard};
use crate::types::graph::{EventGraph, Fact, GraphQuestion, RawEventNode};

pub const GRAPH_TAG: &str = "gr1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGraphResponse {
    summary: String,
    #[serde(default)]
    event_graph: Option<RawEventNode>,
    #[serde(default)]
    facts: Vec<Fact>,
}

/// Generates at most one narrative card per section.
pub struct GraphStrategy {
    completion: Arc<dyn Completion>,
}

impl GraphStrategy {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl GenerationStrategy for GraphStrategy {
    fn tag(&self) -> &'static str {
        GRAPH_TAG
    }

    fn card_type(&self) -> CardType {
        CardType::Graph
    }

    async fn generate(
        &self,
        ctx: &GenerationContext,
        section: &SectionDocument,
    ) -> Result<Vec<Card>> {
        let prompt = prompts::format_graph_prompt(&ctx.topic_code, &section.content);
        let response = self
            .completion
            .complete(&prompt, OutputFormat::Json, ctx.cid.as_deref())
            .await?;

        if response.value.is_null() {
            debug!(
                topic_code = %ctx.topic_code,
                section_code = %section.section_code,
                "no graph for section"
            );
            return Ok(Vec::new());
        }

        let raw: RawGraphResponse = serde_json::from_value(response.value).map_err(|e| {
            FlashcardError::completion(format!(
                "graph response did not match expected shape: {}",
                e
            ))
        })?;

        let chain = match raw.event_graph {
            Some(chain) => chain,
            // No narrative in this section; do not run the question pass.
            None => return Ok(Vec::new()),
        };

        let mut graph = EventGraph::from_chain(Some(chain))?;

        let events: Vec<(String, String)> = graph
            .iter()
            .map(|node| (node.event_code.clone(), node.description.clone()))
            .collect();
        let questions = self.generate_questions(ctx, section, &events).await?;
        let attached = graph.attach_questions(&questions)?;

        debug!(
            topic_code = %ctx.topic_code,
            section_code = %section.section_code,
            events = events.len(),
            questions_attached = attached,
            "built event graph"
        );

        Ok(vec![Card::new(
            &ctx.user,
            &ctx.topic_id,
            &ctx.topic_code,
            &section.section_code,
            CardContent::Graph(HistoricalGraphCard {
                section_title: section.title.clone(),
                section_short_title: section.short_title.clone(),
                summary: raw.summary,
                graph,
                facts: raw.facts,
                generator_name: GRAPH_TAG.to_string(),
            }),
        )])
    }
}

impl GraphStrategy {
    async fn generate_questions(
        &self,
        ctx: &GenerationContext,
        section: &SectionDocument,
        events: &[(String, String)],
    ) -> Result<Vec<GraphQuestion>> {
        let prompt =
            prompts::format_graph_questions_prompt(&ctx.topic_code, &section.content, events);
        let response = self
            .completion
            .complete(&prompt, OutputFormat::Json, ctx.cid.as_deref())
            .await?;

        if response.value.is_null() {
            return Ok(Vec::new());
        }

        serde_json::from_value(response.value).map_err(|e| {
            FlashcardError::completion(format!(
                "graph questions response did not match expected shape: {}",
                e
            ))
        })
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
            topic_code: "the-norman-conquest".into(),
            cid: None,
        }
    }

    fn section() -> SectionDocument {
        SectionDocument::new("s4", "Conquest and Settlement", "Conquest", "In 1066...")
    }

    fn graph_response() -> serde_json::Value {
        json!({
            "summary": "William conquered England and consolidated Norman rule.",
            "eventGraph": {
                "eventCode": "hastings",
                "description": "William defeats Harold at Hastings",
                "date": "1066",
                "dateFormat": "year",
                "link": "causal",
                "nextEvent": {
                    "eventCode": "domesday",
                    "description": "The Domesday survey records the conquered land",
                    "date": "1086",
                    "dateFormat": "year"
                }
            },
            "facts": [
                {"fact": "The Bayeux Tapestry depicts the invasion.", "eventCode": "hastings"}
            ]
        })
    }

    #[tokio::test]
    async fn test_two_pass_generation_attaches_questions() {
        let mock = Arc::new(
            MockCompletion::new()
                .with_response("narrative summary", graph_response())
                .with_response(
                    "chain of historical events",
                    json!([
                        {
                            "eventCode": "hastings",
                            "question": "What did the victory at Hastings lead to?",
                            "answers": ["Norman rule", "Danish rule", "A truce", "Exile"],
                            "correctAnswerIndex": 0
                        }
                    ]),
                ),
        );

        let strategy = GraphStrategy::new(mock.clone());
        let cards = strategy.generate(&ctx(), &section()).await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(mock.call_count(), 2);

        match &cards[0].content {
            CardContent::Graph(c) => {
                assert_eq!(c.generator_name, GRAPH_TAG);
                assert_eq!(c.graph.first_event.as_deref(), Some("hastings"));
                assert_eq!(c.graph.nodes.len(), 2);
                assert!(c.graph.nodes["hastings"].question.is_some());
                assert!(c.graph.nodes["domesday"].question.is_none());
                assert_eq!(c.facts.len(), 1);
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_graph_skips_question_pass() {
        let mock = Arc::new(MockCompletion::new().with_response(
            "narrative summary",
            json!({"summary": "Nothing to chain.", "eventGraph": null, "facts": []}),
        ));

        let strategy = GraphStrategy::new(mock.clone());
        let cards = strategy.generate(&ctx(), &section()).await.unwrap();

        assert!(cards.is_empty());
        // Only the first pass ran
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_questions_are_completion_error() {
        let mock = Arc::new(
            MockCompletion::new()
                .with_response("narrative summary", graph_response())
                .with_response("chain of historical events", json!({"not": "an array"})),
        );

        let strategy = GraphStrategy::new(mock);
        let err = strategy.generate(&ctx(), &section()).await.unwrap_err();
        assert!(matches!(err, FlashcardError::Completion(_)));
    }
}
