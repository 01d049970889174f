//! Dispatch of inbound trigger events onto the orchestrator.

use std::str::FromStr;

use tracing::{debug, info_span, Instrument};

use crate::error::{FlashcardError, Result};
use crate::events::{event_types, InboundMessage, TriggerPayload};
use crate::pipeline::GenerationOrchestrator;
use crate::types::card::CardType;

/// Handle one inbound event. Returns whether the event type was consumed;
/// unknown types are left for other subscribers.
pub async fn handle_message(
    orchestrator: &GenerationOrchestrator,
    msg: InboundMessage,
) -> Result<bool> {
    let span = info_span!(
        "event",
        event_type = %msg.msg_type,
        cid = msg.cid.as_deref().unwrap_or("-")
    );

    async move {
        match msg.msg_type.as_str() {
            event_types::TOPIC_SCRAPED => {
                let (topic_code, topic_id, user) = require_topic(&msg.data)?;
                orchestrator
                    .run(&topic_code, &topic_id, &user, msg.cid.as_deref())
                    .await?;
                Ok(true)
            }
            event_types::FLASHCARDS_GENERATION_REQUESTED => {
                let (topic_code, topic_id, user) = require_topic(&msg.data)?;
                let section_code = require(&msg.data.section_code, "no section code in event")?;
                let card_type = msg
                    .data
                    .flashcards_type
                    .as_deref()
                    .map(CardType::from_str)
                    .transpose()?;
                orchestrator
                    .run_section(
                        &topic_code,
                        &topic_id,
                        &user,
                        &section_code,
                        card_type,
                        msg.cid.as_deref(),
                    )
                    .await?;
                Ok(true)
            }
            event_types::TOPIC_DELETED => {
                let topic_id = require(&msg.data.topic_id, "no topic id in event")?;
                let user = require(&msg.data.user, "no user in event")?;
                orchestrator.delete_topic(&topic_id, &user).await?;
                Ok(true)
            }
            other => {
                debug!(event_type = other, "ignoring unhandled event type");
                Ok(false)
            }
        }
    }
    .instrument(span)
    .await
}

fn require_topic(data: &TriggerPayload) -> Result<(String, String, String)> {
    Ok((
        require(&data.topic_code, "no topic code in event")?,
        require(&data.topic_id, "no topic id in event")?,
        require(&data.user, "no user in event")?,
    ))
}

fn require(field: &Option<String>, message: &str) -> Result<String> {
    field
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FlashcardError::validation(message))
}
