//! Error types for the DataOps Copilot service.

use thiserror::Error;

/// Errors surfaced by the library layers.
///
/// The cache layer deliberately never produces these — backend failures
/// there degrade to "absent" / "not accepted" instead (see
/// [`crate::cache::CacheStore`]). Only providers and configuration fail
/// loudly, and only the HTTP handlers translate those failures into
/// transport-level responses.
#[derive(Debug, Error)]
pub enum CopilotError {
    /// The external LLM provider failed (network, auth, quota, malformed
    /// output). Never retried.
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid or missing configuration detected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The cache backend could not be constructed (bad URL). Runtime
    /// connectivity problems are swallowed by the store itself.
    #[error("cache error: {0}")]
    Cache(String),
}

pub type Result<T> = std::result::Result<T, CopilotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_message() {
        let err = CopilotError::Provider("Gemini request failed: timeout".into());
        assert_eq!(
            err.to_string(),
            "provider error: Gemini request failed: timeout"
        );
    }

    #[test]
    fn test_config_variant_display() {
        let err = CopilotError::Config("no Gemini API key configured".into());
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
