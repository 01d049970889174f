//! Pure HTTP client for the text-completion service.
//!
//! A clean, minimal client with no domain-specific logic. The service
//! exposes a single `POST /prompts` endpoint that takes a prompt and a
//! desired output shape (`json` or `text`) and returns `{format, value}`.
//!
//! Calls are single-shot: no retry, no caching, no streaming. A failed
//! call is the caller's problem to surface.
//!
//! # Example
//!
//! ```rust,ignore
//! use completion_client::{CompletionClient, OutputFormat};
//!
//! let client = CompletionClient::from_env()?
//!     .with_correlation_id("cid-123");
//!
//! let response = client.prompt("Summarize this text ...", OutputFormat::Json).await?;
//! println!("{}", response.value);
//! ```

pub mod error;
pub mod types;

pub use error::{CompletionError, Result};
pub use types::{OutputFormat, PromptRequest, PromptResponse};

use reqwest::Client;
use tracing::{debug, warn};

/// Client for the completion service.
#[derive(Clone)]
pub struct CompletionClient {
    http_client: Client,
    endpoint: String,
    auth_token: String,
    correlation_id: Option<String>,
}

impl CompletionClient {
    /// Create a new client for the given endpoint and bearer token.
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
            correlation_id: None,
        }
    }

    /// Create from the `COMPLETION_ENDPOINT` and `COMPLETION_AUTH_TOKEN`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("COMPLETION_ENDPOINT")
            .map_err(|_| CompletionError::Config("COMPLETION_ENDPOINT not set".into()))?;
        let auth_token = std::env::var("COMPLETION_AUTH_TOKEN")
            .map_err(|_| CompletionError::Config("COMPLETION_AUTH_TOKEN not set".into()))?;
        Ok(Self::new(endpoint, auth_token))
    }

    /// Set the correlation id propagated as `x-correlation-id` on every call.
    pub fn with_correlation_id(mut self, cid: impl Into<String>) -> Self {
        self.correlation_id = Some(cid.into());
        self
    }

    /// Get the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a prompt and get the completion back.
    ///
    /// When `format` is [`OutputFormat::Json`] the returned `value` is the
    /// parsed JSON structure produced by the model.
    pub async fn prompt(&self, prompt: &str, format: OutputFormat) -> Result<PromptResponse> {
        let start = std::time::Instant::now();

        let request = PromptRequest {
            prompt: prompt.to_string(),
            output_format: format,
        };

        let mut builder = self
            .http_client
            .post(format!("{}/prompts", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .header("Content-Type", "application/json");

        if let Some(cid) = &self.correlation_id {
            builder = builder.header("x-correlation-id", cid);
        }

        let response = builder.json(&request).send().await.map_err(|e| {
            warn!(error = %e, "Completion request failed");
            CompletionError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Completion service error");
            return Err(CompletionError::Api(format!(
                "completion service returned {}: {}",
                status, error_text
            )));
        }

        let parsed: PromptResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        debug!(
            format = parsed.format.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion call done"
        );

        Ok(parsed)
    }
}
