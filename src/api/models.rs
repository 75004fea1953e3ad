//! Request and response models for the code API.

use serde::{Deserialize, Serialize};

fn default_use_cache() -> bool {
    true
}

/// Body of `POST /api/v1/code/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateCodeRequest {
    /// Natural language description of the ETL task.
    pub prompt: String,
    /// Additional context or existing code.
    pub context: Option<String>,
    /// Whether to consult and populate the response cache.
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

/// Body of `POST /api/v1/code/improve`.
#[derive(Debug, Deserialize)]
pub struct ImproveCodeRequest {
    /// Existing code to improve.
    pub code: String,
    /// Specific areas to focus on (performance, error_handling, etc.).
    pub focus_areas: Option<Vec<String>>,
}

/// Body of `POST /api/v1/code/autocomplete`.
#[derive(Debug, Deserialize)]
pub struct AutocompleteRequest {
    /// Code written so far.
    pub code_prefix: String,
    /// Surrounding code context.
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCodeResponse {
    pub code: String,
    pub cached: bool,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImproveCodeResponse {
    pub original_code: String,
    pub suggestions: String,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub completions: Vec<String>,
    pub code_prefix: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_use_cache_defaults_true() {
        let req: GenerateCodeRequest =
            serde_json::from_str(r#"{"prompt": "read a csv"}"#).unwrap();
        assert!(req.use_cache);
        assert!(req.context.is_none());
    }

    #[test]
    fn test_generate_request_missing_prompt_rejected() {
        let result = serde_json::from_str::<GenerateCodeRequest>("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_improve_request_focus_areas_optional() {
        let req: ImproveCodeRequest = serde_json::from_str(r#"{"code": "x = 1"}"#).unwrap();
        assert!(req.focus_areas.is_none());
    }

    #[test]
    fn test_autocomplete_request_requires_prefix() {
        assert!(serde_json::from_str::<AutocompleteRequest>(r#"{"context": "c"}"#).is_err());
    }
}
