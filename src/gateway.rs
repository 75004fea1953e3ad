//! LLM gateway: the single choke point between the API and the provider.
//!
//! Owns cache-key derivation and the cache-around-generate logic, so
//! handlers never recompute keys or second-guess hit status. Only
//! `generate_code` is cached; improvement review and autocompletion
//! always reach the provider.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::providers::TextGenerator;

/// System prompt for natural-language-to-code generation.
const SYSTEM_PROMPT: &str = "You are a code generation assistant for data engineers. \
Generate Python ETL code based on the task description. Be concise and include only \
essential imports and error handling. Return raw Python code without markdown formatting.";

/// Review prompt for code-improvement analysis.
const IMPROVEMENT_PROMPT: &str = "You are a DataOps Copilot reviewing data pipeline code.

Analyze the provided code and suggest improvements for:
1. Performance optimization
2. Error handling
3. Code structure and readability
4. Best practices
5. Security considerations
6. Scalability

Provide specific, actionable suggestions with code examples.";

/// Cache-key namespace for code generation.
const GENERATE_NAMESPACE: &str = "generate";

/// Maximum number of autocomplete suggestions returned.
const MAX_COMPLETIONS: usize = 3;

/// Result of a generation call, carrying whether it was served from cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub cached: bool,
}

/// Result of an improvement-review call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Improvement {
    pub original_code: String,
    pub suggestions: String,
    pub focus_areas: Vec<String>,
}

/// Gateway wiring the text generator and the response cache together.
pub struct LlmGateway {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<dyn CacheStore>,
    cache_ttl: Duration,
}

impl LlmGateway {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        cache: Arc<dyn CacheStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            generator,
            cache,
            cache_ttl,
        }
    }

    /// Build a deterministic cache key: `{namespace}:{sha256-hex}` over
    /// the primary and secondary texts.
    ///
    /// Uses length-prefixed encoding so the derivation is order-sensitive
    /// and free of separator collisions (`("a|b", "")` vs `("a", "b")`).
    /// The namespace keeps keys from different operations apart even for
    /// identical input text.
    pub fn cache_key(namespace: &str, primary: &str, secondary: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update((primary.len() as u64).to_le_bytes());
        hasher.update(primary.as_bytes());
        hasher.update((secondary.len() as u64).to_le_bytes());
        hasher.update(secondary.as_bytes());
        format!("{namespace}:{:x}", hasher.finalize())
    }

    /// Generate code for a natural-language task description.
    ///
    /// With `use_cache` the store is consulted first and populated after
    /// a miss; without it the cache is fully skipped — no read, no write.
    pub async fn generate_code(
        &self,
        prompt: &str,
        context: Option<&str>,
        use_cache: bool,
    ) -> Result<GeneratedCode> {
        let key = if use_cache {
            let key = Self::cache_key(GENERATE_NAMESPACE, prompt, context.unwrap_or(""));
            if let Some(code) = self.cache.get(&key).await {
                debug!(key = %&key[..16.min(key.len())], "cache hit, skipping provider");
                return Ok(GeneratedCode { code, cached: true });
            }
            Some(key)
        } else {
            None
        };

        let full_prompt = compose_generate_prompt(prompt, context);
        let code = self.generator.generate(&full_prompt).await?;

        if let Some(key) = key {
            if !self.cache.set(&key, &code, self.cache_ttl).await {
                debug!("cache write not accepted, continuing without caching");
            }
        }

        info!(chars = code.len(), "code generated");
        Ok(GeneratedCode {
            code,
            cached: false,
        })
    }

    /// Analyze existing code and return improvement suggestions.
    ///
    /// Never cached. `focus_areas` is echoed back exactly, defaulting to
    /// an empty list when omitted.
    pub async fn improve_code(
        &self,
        code: &str,
        focus_areas: Option<Vec<String>>,
    ) -> Result<Improvement> {
        let focus_areas = focus_areas.unwrap_or_default();
        let full_prompt = compose_improve_prompt(code, &focus_areas);
        let suggestions = self.generator.generate(&full_prompt).await?;

        Ok(Improvement {
            original_code: code.to_string(),
            suggestions,
            focus_areas,
        })
    }

    /// Suggest up to three completions for a code prefix.
    ///
    /// Never cached. Provider output is split into lines, trimmed,
    /// blanks dropped, and truncated to the first three.
    pub async fn autocomplete(
        &self,
        code_prefix: &str,
        context: Option<&str>,
    ) -> Result<Vec<String>> {
        let full_prompt = compose_autocomplete_prompt(code_prefix, context);
        let text = self.generator.generate(&full_prompt).await?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(MAX_COMPLETIONS)
            .map(String::from)
            .collect())
    }

    /// Provider name, for startup logging.
    pub fn provider_name(&self) -> &str {
        self.generator.name()
    }
}

fn compose_generate_prompt(prompt: &str, context: Option<&str>) -> String {
    let mut full = format!("{SYSTEM_PROMPT}\n\n");
    if let Some(ctx) = context {
        full.push_str(&format!("Context:\n{ctx}\n\n"));
    }
    full.push_str(&format!("Task: {prompt}"));
    full
}

fn compose_improve_prompt(code: &str, focus_areas: &[String]) -> String {
    let focus = if focus_areas.is_empty() {
        String::new()
    } else {
        format!("\nFocus on: {}", focus_areas.join(", "))
    };
    format!("{IMPROVEMENT_PROMPT}\n\nReview this code:\n\n```python\n{code}\n```{focus}")
}

fn compose_autocomplete_prompt(code_prefix: &str, context: Option<&str>) -> String {
    format!(
        "You are a code completion assistant. Provide 3 likely completions for the \
given code prefix. Return only the completion text, one per line.\n\n\
Code context:\n{}\n\nComplete this:\n{}",
        context.unwrap_or("N/A"),
        code_prefix
    )
}
