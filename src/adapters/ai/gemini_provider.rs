//! Gemini Provider - Implementation of ModelProvider for Google's Gemini API.
//!
//! Calls the `generateContent` endpoint with the persona as system
//! instruction and the prior turns as alternating user/model contents.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-3-flash-preview")
//!     .with_base_url("https://generativelanguage.googleapis.com");
//!
//! let provider = GeminiProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::assistant::DEFAULT_MODEL;
use crate::domain::conversation::MessageRole;
use crate::ports::{ModelError, ModelProvider, ModelReply, ModelRequest};

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-3-flash-preview").
    pub model: String,
    /// Base URL for the API (default: https://generativelanguage.googleapis.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &ModelRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .turns()
            .iter()
            .map(|turn| GeminiContent {
                role: role_to_str(turn.role).to_string(),
                parts: vec![GeminiPart {
                    text: turn.content.clone(),
                }],
            })
            .collect();

        // The current message closes the contents as the latest user turn.
        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: request.message.clone(),
            }],
        });

        GeminiRequest {
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: request.system_instruction.clone(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }

    /// Sends a request and maps transport failures.
    async fn send_request(&self, request: &ModelRequest) -> Result<Response, ModelError> {
        let gemini_request = Self::to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ModelError::network(format!("Connection failed: {}", e))
                } else {
                    ModelError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(response: Response) -> Result<Response, ModelError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(ModelError::AuthenticationFailed),
            429 => Err(ModelError::RateLimited),
            400 => Err(ModelError::invalid_request(error_body)),
            500..=599 => Err(ModelError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ModelError::provider(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Joins the text parts of the first candidate.
    fn extract_text(response: GeminiResponse) -> Result<String, ModelError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::provider("response contained no candidates"))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn complete(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::provider(format!("Failed to parse response: {}", e)))?;

        let content = Self::extract_text(gemini_response)?;

        tracing::debug!(
            model = %self.config.model,
            chars = content.len(),
            "Gemini completion received"
        );

        Ok(ModelReply::new(content, self.config.model.clone()))
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

fn role_to_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Model => "model",
    }
}

// === Wire Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiSystemInstruction,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{ModelContext, StoredMessage};
    use crate::domain::foundation::{ConversationId, MessageId, Timestamp, UserId};

    fn history() -> ModelContext {
        let conversation_id = ConversationId::new();
        let rows = vec![
            StoredMessage {
                id: MessageId::new(),
                conversation_id,
                role: MessageRole::User,
                content: "Olá".to_string(),
                author: Some(UserId::new("user-1").unwrap()),
                created_at: Timestamp::now(),
            },
            StoredMessage {
                id: MessageId::new(),
                conversation_id,
                role: MessageRole::Model,
                content: "Oi! Como posso ajudar?".to_string(),
                author: None,
                created_at: Timestamp::now(),
            },
            StoredMessage {
                id: MessageId::new(),
                conversation_id,
                role: MessageRole::User,
                content: "Quanto custa?".to_string(),
                author: Some(UserId::new("user-1").unwrap()),
                created_at: Timestamp::now(),
            },
        ];
        ModelContext::from_history(&rows)
    }

    #[test]
    fn config_builds_correct_generate_url() {
        let config = GeminiConfig::new("test-key").with_model("gemini-3-flash-preview");
        let provider = GeminiProvider::new(config);
        assert_eq!(
            provider.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn config_handles_trailing_slash() {
        let config = GeminiConfig::new("test-key").with_base_url("http://localhost:8080/");
        let provider = GeminiProvider::new(config);
        assert!(provider
            .generate_url()
            .starts_with("http://localhost:8080/v1beta/"));
    }

    #[test]
    fn request_conversion_appends_current_turn_last() {
        let request =
            ModelRequest::new("persona", 0.7, "Quanto custa?").with_history(history());

        let wire = GeminiProvider::to_gemini_request(&request);

        assert_eq!(wire.contents.len(), 3);
        assert_eq!(wire.contents[0].role, "user");
        assert_eq!(wire.contents[1].role, "model");
        assert_eq!(wire.contents[2].role, "user");
        assert_eq!(wire.contents[2].parts[0].text, "Quanto custa?");
        assert_eq!(wire.generation_config.temperature, 0.7);
        assert_eq!(wire.system_instruction.parts[0].text, "persona");
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = ModelRequest::new("persona", 0.7, "Olá");
        let wire = GeminiProvider::to_gemini_request(&request);

        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"temperature\":0.7"));
    }

    #[test]
    fn extract_text_joins_candidate_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Temos três "}, {"text": "cursos."}]
                    },
                    "finishReason": "STOP"
                }]
            }"#,
        )
        .unwrap();

        let text = GeminiProvider::extract_text(response).unwrap();
        assert_eq!(text, "Temos três cursos.");
    }

    #[test]
    fn extract_text_without_candidates_is_provider_error() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();

        let result = GeminiProvider::extract_text(response);
        assert!(matches!(result, Err(ModelError::Provider(_))));
    }

    #[test]
    fn extract_text_without_content_is_empty() {
        // A blocked or empty candidate carries no content body.
        let response: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();

        let text = GeminiProvider::extract_text(response).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn gemini_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiProvider>();
    }
}
