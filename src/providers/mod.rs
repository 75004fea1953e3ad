//! Text-generation providers.
//!
//! [`TextGenerator`] is the capability seam between the gateway and any
//! external LLM service: submit one composed prompt string, receive one
//! text response. Only Gemini exists today; additional providers are
//! further implementations selected by the `LLM_PROVIDER` setting, not
//! by any runtime routing logic.

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::{CopilotError, Result};

pub use gemini::GeminiProvider;

/// A text-generation endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a composed prompt and return the generated text.
    ///
    /// One synchronous call per request: no retries, no local recovery.
    /// Failures propagate to the handler layer as
    /// [`CopilotError::Provider`].
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Construct the provider named by the configuration.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn TextGenerator>> {
    match settings.provider.as_str() {
        "gemini" => {
            let provider = GeminiProvider::from_settings(settings)?;
            Ok(Arc::new(provider))
        }
        other => Err(CopilotError::Config(format!(
            "unknown LLM provider '{other}' (supported: gemini)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = Settings {
            provider: "quantumnet".to_string(),
            ..Settings::default()
        };
        // `.err()` rather than `.unwrap_err()`: the Ok side holds a
        // trait object without a Debug impl.
        let err = from_settings(&settings).err().unwrap();
        assert!(matches!(err, CopilotError::Config(_)));
        assert!(err.to_string().contains("quantumnet"));
    }

    #[test]
    fn test_gemini_selected_with_key() {
        let settings = Settings {
            gemini_api_key: Some("test-key".to_string()),
            ..Settings::default()
        };
        let provider = from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
