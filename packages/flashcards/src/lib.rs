//! Flashcard generation pipeline.
//!
//! Turns corpus documents into quiz cards through an external completion
//! service. Four generation strategies fan out over a topic's sections, join
//! all-or-nothing, replace the stored cards for the run's scope, and emit
//! one completion event.
//!
//! The seams are traits: [`Completion`] for the model, [`KnowledgeBase`] for
//! the corpus, [`CardStore`] for persistence, [`EventPublisher`] for the
//! outbound event. The server binary binds them to HTTP, the filesystem,
//! Postgres, and NATS; tests bind them to the doubles in [`testing`].
//!
//! # Example
//!
//! ```rust,ignore
//! let orchestrator = GenerationOrchestrator::new(kb, store, publisher, completion);
//! let outcome = orchestrator.run("the-crusades", "topic-9", "u@test.com", None).await?;
//! println!("replaced {} cards with {}", outcome.deleted, outcome.inserted);
//! ```

pub mod error;
pub mod events;
pub mod generators;
pub mod kb;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "client")]
mod client;

pub use error::{FlashcardError, Result};
pub use events::{
    event_types, handle_message, FlashcardsCreatedEvent, InboundMessage, TriggerPayload,
};
pub use generators::{
    generation_fingerprint, GenerationContext, GenerationStrategy, SectionDocument,
    StrategyFactory,
};
pub use kb::{FsKnowledgeBase, MemoryKnowledgeBase};
pub use pipeline::{GenerationOrchestrator, GenerationOutcome};
pub use stores::MemoryStore;
#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
pub use traits::{
    CardStore, Completion, CompletionResponse, DeleteScope, EventPublisher, KnowledgeBase,
    OutputFormat, SectionRef,
};
pub use types::{
    Card, CardContent, CardType, DateCard, EventGraph, EventLink, EventNode, EventQuestion, Fact,
    GraphQuestion, HistoricalGraphCard, MultipleOptionsCard, TimelineCard, TimelineEvent,
};
