//! Core trait abstractions.

pub mod completion;
pub mod kb;
pub mod publisher;
pub mod store;

pub use completion::{Completion, CompletionResponse, OutputFormat};
pub use kb::{KnowledgeBase, SectionRef};
pub use publisher::EventPublisher;
pub use store::{CardStore, DeleteScope};
