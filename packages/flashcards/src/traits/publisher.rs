//! Event publisher trait - the seam to the pub/sub transport.

use async_trait::async_trait;

use crate::error::Result;
use crate::events::FlashcardsCreatedEvent;

/// Publishes the "flashcards created" completion event.
///
/// Implementations wrap a concrete transport (NATS in the server, a mock in
/// tests). Publishing happens only after a successful store-replace cycle;
/// a failed generation run never emits the event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a completion event.
    async fn publish(&self, event: &FlashcardsCreatedEvent) -> Result<()>;
}
