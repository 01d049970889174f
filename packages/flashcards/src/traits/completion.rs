//! Completion trait - the seam to the external text-completion service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Output shape requested from the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The model output is parsed JSON.
    Json,
    /// The model output is raw text.
    Text,
}

/// A completion result: the format that was produced plus the model output.
///
/// `value` is the parsed JSON structure when `format` is `Json`, or a JSON
/// string holding the raw text when `format` is `Text`.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub format: OutputFormat,
    pub value: serde_json::Value,
}

/// Seam to the completion service.
///
/// Implementations wrap a concrete transport (the HTTP client, or a mock in
/// tests). Calls are single-shot: a failure aborts the enclosing strategy's
/// attempt to produce cards for the document, and nothing retries.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Send a prompt and get the completion back in the desired format.
    /// `cid` is the correlation id of the triggering request, forwarded to
    /// the service so its logs line up with ours.
    async fn complete(
        &self,
        prompt: &str,
        format: OutputFormat,
        cid: Option<&str>,
    ) -> Result<CompletionResponse>;
}
