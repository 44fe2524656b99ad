use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Fixed generation model.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// --- LLM Client Trait ---

/// Trait for the external text-generation service.
/// The pipeline stages only see this seam, so tests can substitute a scripted model.
#[async_trait]
pub trait ExternalLLM: Send + Sync {
    async fn call(&self, input: LLMCallInput) -> Result<LLMCallOutput>;
}

/// Represents the request data sent to the external LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMCallInput {
    pub prompt: String,
    /// Label of the output the caller expects (used for logging only).
    pub schema_name: String,
    pub temperature: f32,
}

/// Represents the response received from the external LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct LLMCallOutput {
    /// Generated text, verbatim. May be empty.
    pub raw_response: String,
}

// --- Gemini Implementation (HTTP Endpoint) ---

pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http_client: Client, api_key: String) -> Self {
        Self::with_base_url(http_client, api_key, GEMINI_BASE_URL.to_string())
    }

    pub fn with_base_url(http_client: Client, api_key: String, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, GEMINI_MODEL)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &GEMINI_MODEL)
            .finish()
    }
}

/// Builds the `generateContent` request body for a single-turn prompt.
pub(crate) fn build_request_body(input: &LLMCallInput) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": input.prompt }]
            }
        ],
        "generationConfig": {
            "temperature": input.temperature
        }
    })
}

/// Concatenates the text parts of the first candidate.
///
/// A response without any candidate (e.g. a blocked prompt) is an error;
/// a candidate whose parts carry no text yields an empty string.
pub(crate) fn extract_candidate_text(body: &Value) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .and_then(|r| r.as_str())
                .unwrap_or("no candidates returned");
            anyhow!("Gemini response contained no candidates ({})", reason)
        })?;

    let text = candidate
        .pointer("/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

#[async_trait]
impl ExternalLLM for GeminiClient {
    async fn call(&self, input: LLMCallInput) -> Result<LLMCallOutput> {
        tracing::debug!(
            model = GEMINI_MODEL,
            schema = %input.schema_name,
            prompt_length = input.prompt.len(),
            "Sending Gemini generateContent call"
        );

        let response = self
            .http_client
            .post(self.endpoint_url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&build_request_body(&input))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            bail!("Gemini API call failed with status: {}. Body: {}", status, text);
        }

        let body: Value = response.json().await?;
        let raw_response = extract_candidate_text(&body)?;

        tracing::debug!(
            schema = %input.schema_name,
            response_length = raw_response.len(),
            "Received Gemini response"
        );

        Ok(LLMCallOutput { raw_response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_carries_prompt_and_temperature() {
        let input = LLMCallInput {
            prompt: "Explain entropy".to_string(),
            schema_name: "ParsedInfo".to_string(),
            temperature: 0.5,
        };
        let body = build_request_body(&input);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Explain entropy");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello, "}, {"text": "world"}]
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_candidate_text(&body).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_without_parts_is_empty() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert_eq!(extract_candidate_text(&body).unwrap(), "");
    }

    #[test]
    fn test_extract_blocked_prompt_is_error() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_candidate_text(&body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_url_uses_fixed_model() {
        let client = GeminiClient::with_base_url(
            Client::new(),
            "k".to_string(),
            "http://localhost:9999/v1beta/".to_string(),
        );
        assert_eq!(
            client.endpoint_url(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
