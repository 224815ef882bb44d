//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, resolver wiring, and the Axum
//! server lifecycle.

use crate::application::services::LinkResolver;
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use axum::http::HeaderName;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Link resolver
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Redis is unreachable and `CACHE_REQUIRED` is set
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let cache = connect_cache(&config).await?;

    let store = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let resolver = LinkResolver::new(store, cache).with_cache_ttl(config.cache_ttl_seconds);

    let geo_metadata_header = HeaderName::try_from(config.geo_metadata_header.as_str())
        .context("GEO_METADATA_HEADER is not a valid header name")?;

    let state = AppState::new(Arc::new(resolver), geo_metadata_header);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Selects the cache backend.
///
/// Without Redis configuration the service runs uncached. When Redis is
/// configured but unreachable, startup fails only if `CACHE_REQUIRED` is set.
async fn connect_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Ok(Arc::new(NullCache::new()));
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!(
                ttl_seconds = config.cache_ttl_seconds,
                "Cache enabled (Redis)"
            );
            Ok(Arc::new(redis))
        }
        Err(e) if config.cache_required => {
            Err(anyhow::anyhow!(e).context("Redis is required but unreachable"))
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Ok(Arc::new(NullCache::new()))
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
