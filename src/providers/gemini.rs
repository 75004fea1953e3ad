//! Gemini provider speaking the `generateContent` REST API.
//!
//! Auth priority: config key → GEMINI_API_KEY → GOOGLE_API_KEY.
//!
//! Thinking model support: Gemini 2.5 models return parts tagged
//! `thought: true`. This provider filters those out and only returns
//! the final non-thought text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Settings;
use crate::error::{CopilotError, Result};

use super::TextGenerator;

/// Gemini v1beta REST API base.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider that sends a single-turn prompt per request.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    /// Build a provider with an explicit API key and model.
    pub fn new_with_key(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Self::build_client(None),
        }
    }

    /// Build from settings, resolving the API key in priority order:
    /// configured key, then `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = resolve_api_key(
            settings.gemini_api_key.as_deref(),
            std::env::var("GEMINI_API_KEY").ok().as_deref(),
            std::env::var("GOOGLE_API_KEY").ok().as_deref(),
        )
        .ok_or_else(|| {
            CopilotError::Config(
                "no Gemini API key configured (set GEMINI_API_KEY)".to_string(),
            )
        })?;

        Ok(Self {
            api_key,
            model: settings.gemini_model.clone(),
            client: Self::build_client(settings.llm_timeout),
        })
    }

    /// Timeout `None` leaves the transport default in place — no
    /// artificial deadline on generation calls.
    fn build_client(timeout: Option<Duration>) -> Client {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        builder.build().expect("failed to build HTTP client")
    }

    /// Build the `generateContent` request body for a single user turn.
    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        })
    }

    /// Extract final answer text from a Gemini API response.
    ///
    /// Parts tagged `"thought": true` are intermediate reasoning steps
    /// and are filtered out. If only thought parts exist (unusual), fall
    /// back to them so the caller always gets *something*.
    fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;

        let final_parts: Vec<&str> = parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect();

        if !final_parts.is_empty() {
            return Some(final_parts.join(""));
        }

        let thought_parts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();

        if !thought_parts.is_empty() {
            Some(thought_parts.join(""))
        } else {
            None
        }
    }

    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

/// Resolve the API key in priority order, skipping empty values.
fn resolve_api_key(
    configured: Option<&str>,
    gemini_env: Option<&str>,
    google_env: Option<&str>,
) -> Option<String> {
    [configured, gemini_env, google_env]
        .into_iter()
        .flatten()
        .find(|k| !k.is_empty())
        .map(String::from)
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = Self::build_request_body(prompt);

        debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CopilotError::Provider(format!("Gemini request failed: {e}")))?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(|e| {
                CopilotError::Provider(format!("failed to parse Gemini response: {e}"))
            })?;

            return Self::extract_text(&json).ok_or_else(|| {
                CopilotError::Provider("Gemini response contained no text".to_string())
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();

        // Pull the message field out of the Gemini error body when present.
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or(error_text);

        Err(CopilotError::Provider(format!(
            "Gemini API error (HTTP {status}): {message}"
        )))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_resolution_prefers_configured() {
        let key = resolve_api_key(Some("configured"), Some("env"), Some("google"));
        assert_eq!(key.as_deref(), Some("configured"));
    }

    #[test]
    fn test_api_key_resolution_skips_empty() {
        let key = resolve_api_key(Some(""), Some("env"), None);
        assert_eq!(key.as_deref(), Some("env"));
    }

    #[test]
    fn test_api_key_resolution_google_fallback() {
        let key = resolve_api_key(None, None, Some("google"));
        assert_eq!(key.as_deref(), Some("google"));
    }

    #[test]
    fn test_api_key_resolution_none_without_candidates() {
        assert!(resolve_api_key(None, None, None).is_none());
    }

    #[test]
    fn test_request_body_single_user_turn() {
        let body = GeminiProvider::build_request_body("write a csv reader");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "write a csv reader");
    }

    #[test]
    fn test_extract_text_normal_response() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello world" }]
                }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&response).as_deref(),
            Some("Hello world")
        );
    }

    #[test]
    fn test_extract_text_skips_thought_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "Final answer here" }
                    ]
                }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&response).as_deref(),
            Some("Final answer here")
        );
    }

    #[test]
    fn test_extract_text_falls_back_to_thoughts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "only thought part", "thought": true }]
                }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&response).as_deref(),
            Some("only thought part")
        );
    }

    #[test]
    fn test_extract_text_joins_multiple_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Part one. " },
                        { "text": "Part two." }
                    ]
                }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&response).as_deref(),
            Some("Part one. Part two.")
        );
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response = json!({ "candidates": [] });
        assert!(GeminiProvider::extract_text(&response).is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = GeminiProvider::new_with_key("top-secret", "gemini-2.5-flash");
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
