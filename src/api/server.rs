//! Axum server wiring for the DataOps Copilot API.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::CacheStore;
use crate::config::Settings;
use crate::gateway::LlmGateway;

/// Shared state for all API handlers.
///
/// Both the gateway and the cache handle are constructed once at
/// bootstrap and injected here; handlers never build their own.
#[derive(Clone)]
pub struct AppState {
    /// Service name reported on `/`.
    pub project_name: String,
    /// The single choke point for all LLM operations.
    pub gateway: Arc<LlmGateway>,
    /// Cache handle, used directly only by `/health` for reachability.
    pub cache: Arc<dyn CacheStore>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState, settings: &Settings) -> Router {
    let shared_state = Arc::new(state);
    let prefix = &settings.api_v1_prefix;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_origins(&settings.cors_origins)))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(super::routes::health::root))
        .route("/health", get(super::routes::health::health))
        .route(
            &format!("{prefix}/code/generate"),
            post(super::routes::code::generate_code),
        )
        .route(
            &format!("{prefix}/code/improve"),
            post(super::routes::code::improve_code),
        )
        .route(
            &format!("{prefix}/code/autocomplete"),
            post(super::routes::code::autocomplete),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Parse configured origins, dropping any that are not valid header values.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_drops_invalid() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "bad\nvalue".to_string(),
        ];
        assert_eq!(parse_origins(&origins).len(), 1);
    }
}
