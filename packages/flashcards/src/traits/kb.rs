//! Knowledge base trait - read access to the corpus documents.
//!
//! The knowledge base holds one raw-text document per (topic, section),
//! plus display metadata per section. It is stateless from this library's
//! perspective: no locks, no session affinity.

use async_trait::async_trait;

use crate::error::Result;

/// Listing entry for one section: its code plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub code: String,
    pub title: String,
    pub short_title: String,
}

/// Read access to the corpus documents of a topic.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// List the sections that have a document for the given topic.
    async fn list_sections(&self, topic_code: &str) -> Result<Vec<SectionRef>>;

    /// Read the raw text of one section document.
    ///
    /// Fails with [`crate::FlashcardError::SectionNotFound`] when the
    /// document is absent.
    async fn read_section(&self, topic_code: &str, section_code: &str) -> Result<String>;
}
