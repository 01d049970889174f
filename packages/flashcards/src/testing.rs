//! Test doubles for the library's trait seams.
//!
//! Not gated behind `cfg(test)` so integration tests and downstream crates
//! can drive the pipeline without a live completion service or broker.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{FlashcardError, Result};
use crate::events::FlashcardsCreatedEvent;
use crate::traits::completion::{Completion, CompletionResponse, OutputFormat};
use crate::traits::publisher::EventPublisher;

/// One recorded completion call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub format: OutputFormat,
    pub cid: Option<String>,
}

enum Outcome {
    Value(serde_json::Value),
    Error(String),
}

/// Scripted completion seam. Rules match on a substring of the prompt; the
/// first matching rule wins. Prompts with no matching rule answer JSON null,
/// which every strategy treats as "nothing to generate".
pub struct MockCompletion {
    rules: Vec<(String, Outcome)>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer prompts containing `marker` with the given JSON value.
    pub fn with_response(mut self, marker: impl Into<String>, value: serde_json::Value) -> Self {
        self.rules.push((marker.into(), Outcome::Value(value)));
        self
    }

    /// Fail prompts containing `marker` with a completion error.
    pub fn with_error(mut self, marker: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push((marker.into(), Outcome::Error(message.into())));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// How many recorded prompts contain the given substring.
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.prompt.contains(needle))
            .count()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(
        &self,
        prompt: &str,
        format: OutputFormat,
        cid: Option<&str>,
    ) -> Result<CompletionResponse> {
        self.calls.lock().unwrap().push(MockCall {
            prompt: prompt.to_string(),
            format,
            cid: cid.map(str::to_string),
        });

        for (marker, outcome) in &self.rules {
            if prompt.contains(marker.as_str()) {
                return match outcome {
                    Outcome::Value(value) => Ok(CompletionResponse {
                        format,
                        value: value.clone(),
                    }),
                    Outcome::Error(message) => Err(FlashcardError::completion(message.clone())),
                };
            }
        }

        Ok(CompletionResponse {
            format,
            value: serde_json::Value::Null,
        })
    }
}

/// Records published events instead of touching a broker.
pub struct MockPublisher {
    events: Mutex<Vec<FlashcardsCreatedEvent>>,
    fail: bool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Make every publish fail.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn events(&self) -> Vec<FlashcardsCreatedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish(&self, event: &FlashcardsCreatedEvent) -> Result<()> {
        if self.fail {
            return Err(FlashcardError::Publish("mock publish failure".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
