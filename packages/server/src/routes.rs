//! HTTP surface.
//!
//! The caller's identity comes from the `x-user-email` header; there is no
//! session layer in front of this service. Generation runs are triggered by
//! events, not HTTP; `/generate` is the one synchronous path and works on
//! inline corpus text without persisting anything.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use flashcards::{
    Card, CardStore, Completion, FlashcardError, GenerationContext, GenerationStrategy,
    SectionDocument,
};
use flashcards::generators::OptionsStrategy;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CardStore>,
    pub completion: Arc<dyn Completion>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flashcards", post(create_flashcard))
        .route("/topics/:topic_id/flashcards", get(list_flashcards))
        .route("/generate", post(generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Library errors mapped onto HTTP statuses.
struct ApiError(FlashcardError);

impl From<FlashcardError> for ApiError {
    fn from(e: FlashcardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FlashcardError::SectionNotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

fn user_email(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-user-email")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError(FlashcardError::validation("no user email provided")))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn create_flashcard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user_email(&headers)?;
    let type_tag = body
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError(FlashcardError::validation("no card type provided")))?;

    let card = Card::from_request(type_tag, &body, &user)?;
    let id = state.store.save(&card).await?;

    Ok((StatusCode::CREATED, Json(json!({"insertedId": id}))))
}

async fn list_flashcards(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(topic_id): Path<String>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let user = user_email(&headers)?;

    let cards = state
        .store
        .list_by_topic(&topic_id)
        .await?
        .into_iter()
        .filter(|c| c.user == user)
        .collect();

    Ok(Json(cards))
}

/// Generate multiple-options cards from inline corpus text. Nothing is
/// persisted; the cards come back in the response.
async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let user = user_email(&headers)?;

    let corpus = body
        .get("corpus")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError(FlashcardError::validation("no corpus provided")))?;
    let title = body
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("Ad hoc");
    let topic_code = body
        .get("topicCode")
        .and_then(|v| v.as_str())
        .unwrap_or("adhoc");

    let cid = headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let ctx = GenerationContext {
        user,
        topic_id: String::new(),
        topic_code: topic_code.to_string(),
        cid,
    };
    let section = SectionDocument::new("inline", title, title, corpus);

    let strategy = OptionsStrategy::new(state.completion.clone());
    let cards = strategy.generate(&ctx, &section).await?;

    Ok(Json(cards))
}
