//! Card generation strategies.
//!
//! One strategy per card type, all sharing the same shape: build a prompt
//! from a section document, send it through the completion seam, parse the
//! structured answer into cards. Strategies are stateless across calls
//! except for their RNG, so one instance can serve concurrent sections.

pub mod date;
pub mod factory;
pub mod graph;
pub mod options;
pub mod prompts;
pub mod timeline;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::card::{Card, CardType};

pub use date::DateStrategy;
pub use factory::{generation_fingerprint, StrategyFactory};
pub use graph::GraphStrategy;
pub use options::OptionsStrategy;
pub use timeline::TimelineStrategy;

/// Identity of one generation run: whose cards, for which topic, under
/// which correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub user: String,
    pub topic_id: String,
    pub topic_code: String,
    /// Correlation id of the triggering request, forwarded on every
    /// completion call.
    pub cid: Option<String>,
}

/// One corpus document with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDocument {
    pub section_code: String,
    pub title: String,
    pub short_title: String,
    pub content: String,
}

impl SectionDocument {
    pub fn new(
        section_code: impl Into<String>,
        title: impl Into<String>,
        short_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            section_code: section_code.into(),
            title: title.into(),
            short_title: short_title.into(),
            content: content.into(),
        }
    }
}

/// A card generation strategy for one card type.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    /// Version tag of this strategy revision. Tags across all strategies
    /// concatenate into the generation fingerprint stamped on completion
    /// events.
    fn tag(&self) -> &'static str;

    /// The card type this strategy produces.
    fn card_type(&self) -> CardType;

    /// Generate cards for one section document. An empty result is valid:
    /// a document may simply not support this card type.
    async fn generate(&self, ctx: &GenerationContext, section: &SectionDocument)
        -> Result<Vec<Card>>;
}
