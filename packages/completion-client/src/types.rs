//! Request and response types for the completion service wire protocol.

use serde::{Deserialize, Serialize};

/// Output shape requested from the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The service returns a parsed JSON structure.
    Json,
    /// The service returns raw text.
    Text,
}

impl OutputFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

/// Body of a `POST /prompts` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// The full prompt text.
    pub prompt: String,

    /// Desired output shape.
    pub output_format: OutputFormat,
}

/// Response from the completion service.
///
/// When `format` is [`OutputFormat::Json`], `value` is the parsed JSON
/// structure the model produced. When `format` is [`OutputFormat::Text`],
/// `value` is a JSON string holding the raw text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    /// Output shape the service produced (echoes the requested one).
    pub format: OutputFormat,

    /// The model output.
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_wire_names() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Json).unwrap(),
            "\"json\""
        );
        assert_eq!(
            serde_json::to_string(&OutputFormat::Text).unwrap(),
            "\"text\""
        );
    }

    #[test]
    fn test_prompt_response_parses_json_value() {
        let raw = r#"{"format":"json","value":{"questions":[]}}"#;
        let resp: PromptResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.format, OutputFormat::Json);
        assert!(resp.value.get("questions").is_some());
    }
}
