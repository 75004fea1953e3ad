//! Process bootstrap: config, logging, cache, provider, HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dataops_copilot::api::server::{build_router, AppState};
use dataops_copilot::cache::{CacheStore, RedisCacheStore};
use dataops_copilot::config::Settings;
use dataops_copilot::gateway::LlmGateway;
use dataops_copilot::providers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    info!("starting {} API", settings.project_name);

    // The cache handle lives for the whole process; connectivity problems
    // after this point degrade reads/writes instead of failing requests.
    let cache: Arc<dyn CacheStore> =
        Arc::new(RedisCacheStore::new(&settings.redis_url).context("cache store setup")?);
    if cache.ping().await {
        info!("Redis connected");
    } else {
        warn!("Redis unreachable at startup, caching disabled until it recovers");
    }

    let generator = providers::from_settings(&settings).context("provider setup")?;
    let gateway = Arc::new(LlmGateway::new(
        generator,
        cache.clone(),
        settings.cache_ttl,
    ));
    info!(
        "using provider '{}' with {}s cache TTL",
        gateway.provider_name(),
        settings.cache_ttl.as_secs()
    );

    let state = AppState {
        project_name: settings.project_name.clone(),
        gateway,
        cache,
    };
    let app = build_router(state, &settings);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!("listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

/// Resolve when SIGINT (or SIGTERM on unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
