//! Adapter from the HTTP completion client onto the [`Completion`] seam.

use async_trait::async_trait;
use completion_client::{CompletionClient, OutputFormat as ClientFormat};

use crate::error::{FlashcardError, Result};
use crate::traits::completion::{Completion, CompletionResponse, OutputFormat};

#[async_trait]
impl Completion for CompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        format: OutputFormat,
        cid: Option<&str>,
    ) -> Result<CompletionResponse> {
        let client_format = match format {
            OutputFormat::Json => ClientFormat::Json,
            OutputFormat::Text => ClientFormat::Text,
        };

        let response = match cid {
            Some(cid) => {
                self.clone()
                    .with_correlation_id(cid)
                    .prompt(prompt, client_format)
                    .await
            }
            None => self.prompt(prompt, client_format).await,
        }
        .map_err(|e| FlashcardError::completion(e.to_string()))?;

        Ok(CompletionResponse {
            format,
            value: response.value,
        })
    }
}
