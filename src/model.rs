//! Remote model transport: the `PromptModel` trait and the Gemini client.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] and all error-message interpretation in
//! [`crate::classify`], so the transport can be swapped (or mocked in tests)
//! without touching either.
//!
//! [`ModelError`] deliberately carries only the raw failure message the
//! remote side produced. Turning that message into a taxonomy error is the
//! caller's job via [`crate::classify::classify_remote_error`]; keeping the
//! two steps apart means the classification rules stay unit-testable against
//! plain strings.

use crate::error::Doc2PromptError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// One generation request, fully assembled.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Model identifier, e.g. "gemini-2.5-flash".
    pub model: String,
    /// The fixed multi-step directive (see [`crate::prompts`]).
    pub system_instruction: String,
    /// The delimiter-prefixed document text.
    pub user_content: String,
    /// Ask the service to enable its own retrieval/search augmentation.
    pub enable_search: bool,
}

/// A raw remote failure, before classification.
///
/// `message: None` models an error shape that carried no usable text
/// (classified as [`Doc2PromptError::UnknownError`]).
#[derive(Debug, Clone)]
pub struct ModelError {
    pub message: Option<String>,
}

impl ModelError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unknown() -> Self {
        Self { message: None }
    }
}

/// A text-in, text-out generative model.
///
/// The library ships [`GeminiClient`]; tests inject mocks through
/// [`crate::config::GenerationConfig::provider`]. Implementations must be
/// `Send + Sync` — the session holds the provider behind an `Arc`.
#[async_trait]
pub trait PromptModel: Send + Sync {
    /// Issue one generation call. No retries: a failure is returned as-is
    /// and surfaces immediately to the caller.
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError>;
}

// ── Gemini REST wire types ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Tool {
    // Serialised as {"google_search": {}} — the service's own search tool.
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

// ── Gemini client ────────────────────────────────────────────────────────

/// The Gemini `generateContent` REST endpoint.
///
/// One POST per [`PromptModel::generate`] call. The credential is held only
/// in memory, passed as the `key` query parameter, and never logged.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    credential: String,
}

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

impl GeminiClient {
    /// Build a client for one session's credential.
    pub fn new(
        credential: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, Doc2PromptError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Doc2PromptError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            credential: credential.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl PromptModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(request.system_instruction.clone()),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.user_content.clone()),
                }],
            }],
            tools: request.enable_search.then(|| {
                vec![Tool {
                    google_search: serde_json::Map::new(),
                }]
            }),
        };

        let url = self.endpoint(&request.model);
        debug!(model = %request.model, search = request.enable_search, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.credential.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::message(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Keep the numeric status in the message so the substring rules
            // for 500/503 classify server faults correctly.
            let body_text = response.text().await.unwrap_or_default();
            let api_message = serde_json::from_str::<ApiErrorBody>(&body_text)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(body_text);
            warn!(status = %status, "generateContent failed");
            return Err(ModelError::message(format!(
                "HTTP {}: {}",
                status.as_u16(),
                api_message
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::message(format!("malformed response body: {e}")))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            // "blocked" in the message routes this to ContentBlocked.
            return Err(ModelError::message(format!(
                "request was blocked by the safety policy ({reason})"
            )));
        }

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        debug!(chars = text.len(), "generateContent succeeded");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiClient::new("k", "https://example.test/v1beta/", 30).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_serialises_search_tool() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some("sys".into()),
                }],
            },
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some("doc".into()),
                }],
            }],
            tools: Some(vec![Tool {
                google_search: serde_json::Map::new(),
            }]),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
    }

    #[test]
    fn request_body_omits_tools_when_search_disabled() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![],
            },
            contents: vec![],
            tools: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn response_parses_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn response_parses_block_reason() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
