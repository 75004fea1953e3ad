//! Service configuration loaded from the environment.
//!
//! Read once at process start (after `dotenvy` has loaded any `.env`
//! file) and immutable thereafter. Everything has a sensible default
//! except the provider API key, which is validated when the provider is
//! constructed.

use std::time::Duration;

/// Default cache TTL: 1 hour.
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Immutable application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Human-readable service name, reported on `/`.
    pub project_name: String,
    /// URL prefix for versioned API routes.
    pub api_v1_prefix: String,
    /// Which text-generation provider to construct (`gemini` today).
    pub provider: String,
    /// Gemini API key from config/env. `None` falls through to the
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment lookup done by
    /// the provider itself.
    pub gemini_api_key: Option<String>,
    /// Gemini model identifier.
    pub gemini_model: String,
    /// Redis connection URL for the response cache.
    pub redis_url: String,
    /// TTL applied to cached generation results.
    pub cache_ttl: Duration,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Optional deadline on provider HTTP calls. `None` means no
    /// artificial deadline beyond the transport default.
    pub llm_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "DataOps Copilot".to_string(),
            api_v1_prefix: "/api/v1".to_string(),
            provider: "gemini".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            redis_url: "redis://localhost:6379/0".to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            bind_addr: "0.0.0.0:8000".to_string(),
            llm_timeout: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redis_url = env_opt("REDIS_URL").unwrap_or_else(|| {
            compose_redis_url(
                env_opt("REDIS_HOST").as_deref(),
                env_opt("REDIS_PORT").as_deref(),
                env_opt("REDIS_DB").as_deref(),
                env_opt("REDIS_PASSWORD").as_deref(),
            )
        });

        Self {
            project_name: defaults.project_name,
            api_v1_prefix: defaults.api_v1_prefix,
            provider: env_opt("LLM_PROVIDER").unwrap_or(defaults.provider),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_opt("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            redis_url,
            cache_ttl: Duration::from_secs(parse_secs(
                env_opt("CACHE_TTL").as_deref(),
                DEFAULT_CACHE_TTL_SECS,
            )),
            cors_origins: parse_origins(env_opt("CORS_ORIGINS").as_deref())
                .unwrap_or(defaults.cors_origins),
            bind_addr: env_opt("BIND_ADDR").unwrap_or(defaults.bind_addr),
            llm_timeout: env_opt("LLM_TIMEOUT_SECS")
                .as_deref()
                .and_then(parse_opt_secs),
        }
    }
}

/// Read an env var, treating empty values as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Build a Redis URL from the individual host/port/db/password parts.
fn compose_redis_url(
    host: Option<&str>,
    port: Option<&str>,
    db: Option<&str>,
    password: Option<&str>,
) -> String {
    let host = host.unwrap_or("localhost");
    let port = port.unwrap_or("6379");
    let db = db.unwrap_or("0");
    match password {
        Some(pw) if !pw.is_empty() => format!("redis://:{pw}@{host}:{port}/{db}"),
        _ => format!("redis://{host}:{port}/{db}"),
    }
}

/// Parse a seconds value, falling back to `default` on absence or garbage.
fn parse_secs(value: Option<&str>, default: u64) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parse an optional seconds value. `None` or unparseable means no timeout.
fn parse_opt_secs(value: &str) -> Option<Duration> {
    value.parse().ok().map(Duration::from_secs)
}

/// Split a comma-separated origin list, dropping blank entries.
fn parse_origins(value: Option<&str>) -> Option<Vec<String>> {
    let raw = value?;
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.api_v1_prefix, "/api/v1");
        assert_eq!(s.cache_ttl, Duration::from_secs(3600));
        assert_eq!(s.provider, "gemini");
        assert!(s.llm_timeout.is_none());
        assert_eq!(s.cors_origins.len(), 2);
        assert_eq!(s.bind_addr, "0.0.0.0:8000");
    }

    #[test]
    fn test_compose_redis_url_defaults() {
        assert_eq!(
            compose_redis_url(None, None, None, None),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_compose_redis_url_with_password() {
        assert_eq!(
            compose_redis_url(
                Some("cache.internal"),
                Some("6380"),
                Some("2"),
                Some("s3cr3t")
            ),
            "redis://:s3cr3t@cache.internal:6380/2"
        );
    }

    #[test]
    fn test_compose_redis_url_empty_password_ignored() {
        assert_eq!(
            compose_redis_url(Some("h"), None, None, Some("")),
            "redis://h:6379/0"
        );
    }

    #[test]
    fn test_parse_secs_garbage_falls_back() {
        assert_eq!(parse_secs(Some("not-a-number"), 3600), 3600);
        assert_eq!(parse_secs(Some("60"), 3600), 60);
        assert_eq!(parse_secs(None, 3600), 3600);
    }

    #[test]
    fn test_parse_opt_secs() {
        assert_eq!(parse_opt_secs("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_opt_secs("garbage"), None);
    }

    #[test]
    fn test_parse_origins() {
        let parsed = parse_origins(Some("http://a.test, http://b.test ,"));
        assert_eq!(
            parsed,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(parse_origins(Some("  ,")), None);
        assert_eq!(parse_origins(None), None);
    }
}
