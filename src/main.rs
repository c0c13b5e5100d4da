use anyhow::Context;
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use event_registration::{
    app,
    cache::CacheService,
    config::{Config, LogFormat},
    database::Database,
    redis_client::RedisClient,
    repositories::Repositories,
    services::address_lookup::ViaCepClient,
    AppState,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.app.rust_log));
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("Starting event registration API ({})", config.app.environment);

    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    db.run_migrations().await.context("failed to run migrations")?;

    let cache = connect_cache(&config).await;
    if let Some(cache) = &cache {
        // catalog rows may have been re-seeded since the last run
        cache.invalidate_catalog().await;
    }

    let postal = ViaCepClient::new(&config.postal, &config.circuit_breaker)
        .context("failed to build postal lookup client")?;

    let state = Arc::new(AppState::new(
        Repositories::postgres(&db),
        Arc::new(postal),
        cache,
        &config.jwt,
        &config.auth,
    ));

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid HOST/PORT")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

// Redis is optional: without it every read goes to Postgres
async fn connect_cache(config: &Config) -> Option<CacheService> {
    if !config.features.enable_cache {
        info!("Cache disabled by ENABLE_CACHE");
        return None;
    }
    let url = config.redis.url.as_deref()?;

    match RedisClient::connect(url).await {
        Ok(redis) => Some(CacheService::new(redis, config.redis.ttl_seconds)),
        Err(e) => {
            warn!("Redis unavailable, continuing without cache: {:?}", e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
