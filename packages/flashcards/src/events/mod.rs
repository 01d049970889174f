//! Event protocol: inbound triggers and the outbound completion event.
//!
//! Inbound messages arrive as JSON envelopes with a `type` tag and an
//! optional correlation id (`cid`). Three trigger types are handled; any
//! other type is reported as not consumed so the transport can leave it to
//! other subscribers.

mod handler;

pub use handler::handle_message;

use serde::{Deserialize, Serialize};

use crate::types::card::CardType;

/// Inbound trigger types and the outbound completion type.
pub mod event_types {
    pub const TOPIC_SCRAPED: &str = "topicScraped";
    pub const FLASHCARDS_GENERATION_REQUESTED: &str = "flashcardsGenerationRequested";
    pub const TOPIC_DELETED: &str = "topicDeleted";
    pub const FLASHCARDS_CREATED: &str = "flashcardsCreated";
}

/// An inbound event envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub msg_type: String,

    /// Correlation id, carried through logs and onto completion calls.
    #[serde(default)]
    pub cid: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub data: TriggerPayload,
}

/// The payload of an inbound trigger. All fields optional at the wire
/// level; the handler validates per trigger type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    pub topic_code: Option<String>,
    pub topic_id: Option<String>,
    pub section_code: Option<String>,
    pub flashcards_type: Option<String>,
    pub user: Option<String>,
}

/// Emitted after a successful store-replace cycle. `generation` is the
/// fingerprint of the strategy set that produced the batch; `section_code`
/// and `type` are present only for targeted (single-section) runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsCreatedEvent {
    pub generation: String,
    pub topic_code: String,
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section_code: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub card_type: Option<CardType>,
    pub count: usize,
}
