//! NATS wiring: outbound completion events and the inbound trigger loop.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use tracing::{error, info, warn};

use flashcards::{
    event_types, handle_message, EventPublisher, FlashcardError, FlashcardsCreatedEvent,
    GenerationOrchestrator, InboundMessage,
};

/// Publishes completion events to a NATS subject, wrapped in the shared
/// `{type, data}` envelope.
pub struct NatsPublisher {
    client: async_nats::Client,
    subject: String,
}

impl NatsPublisher {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn publish(&self, event: &FlashcardsCreatedEvent) -> flashcards::Result<()> {
        let envelope = json!({
            "type": event_types::FLASHCARDS_CREATED,
            "data": event,
        });
        let payload = serde_json::to_vec(&envelope)
            .map_err(|e| FlashcardError::Publish(e.to_string()))?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| FlashcardError::Publish(e.to_string()))?;

        info!(subject = %self.subject, count = event.count, "published flashcardsCreated");
        Ok(())
    }
}

/// Logs completion events instead of publishing them. Used when no broker
/// is configured.
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &FlashcardsCreatedEvent) -> flashcards::Result<()> {
        info!(
            topic_id = %event.topic_id,
            count = event.count,
            generation = %event.generation,
            "flashcardsCreated (no broker configured)"
        );
        Ok(())
    }
}

/// Consume trigger events from a subject until the subscription ends.
///
/// Malformed payloads and handler failures are logged and skipped; one bad
/// event must not take the consumer down.
pub async fn run_subscriber(
    client: async_nats::Client,
    subject: String,
    orchestrator: std::sync::Arc<GenerationOrchestrator>,
) -> anyhow::Result<()> {
    let mut subscriber = client.subscribe(subject.clone()).await?;
    info!(subject = %subject, "subscribed to trigger events");

    while let Some(message) = subscriber.next().await {
        let inbound: InboundMessage = match serde_json::from_slice(&message.payload) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!(subject = %subject, error = %e, "skipping malformed event payload");
                continue;
            }
        };

        let event_type = inbound.msg_type.clone();
        if let Err(e) = handle_message(&orchestrator, inbound).await {
            error!(event_type = %event_type, error = %e, "event handling failed");
        }
    }

    warn!(subject = %subject, "trigger subscription ended");
    Ok(())
}
