//! # hobbylog binary
//!
//! Assembles the application from the feature-selected adapters: gateway
//! stores, media storage, session authority, and the axum router.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::metrics::Metrics;
use api_adapters::{build_router, AppState};
use configs::AppConfig;
use domains::MediaStorage;
#[cfg(feature = "media-local")]
use tower_http::services::ServeDir;
use tower_http::services::ServeFile;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "auth-jwt")]
use auth_adapters::{JwtSessionGateway, JwtTokenCodec};

#[cfg(feature = "db-postgres")]
use storage_adapters::PostgresGateway;

#[cfg(not(feature = "db-postgres"))]
use storage_adapters::MemoryGateway;

#[cfg(feature = "media-local")]
use storage_adapters::LocalMediaStorage;

#[cfg(feature = "media-s3")]
use storage_adapters::S3MediaStorage;

#[cfg(not(any(feature = "media-local", feature = "media-s3")))]
use storage_adapters::MemoryMediaStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    // 1. Gateway stores
    #[cfg(feature = "db-postgres")]
    let gateway = {
        let gateway = PostgresGateway::connect(
            &config.database.url,
            config.database.max_connections,
        )
        .await
        .context("connecting to postgres")?;
        sqlx::migrate!("./migrations")
            .run(gateway.pool())
            .await
            .context("running migrations")?;
        Arc::new(gateway)
    };
    #[cfg(not(feature = "db-postgres"))]
    let gateway = {
        tracing::warn!("no database feature selected; state lives in memory only");
        Arc::new(MemoryGateway::new())
    };

    // 2. Object storage
    #[cfg(feature = "media-s3")]
    let media: Arc<dyn MediaStorage> = {
        let bucket = config
            .media
            .s3_bucket
            .clone()
            .context("media.s3_bucket must be configured for the S3 backend")?;
        let base_url = config
            .media
            .s3_public_base_url
            .clone()
            .context("media.s3_public_base_url must be configured for the S3 backend")?;
        Arc::new(S3MediaStorage::from_env(bucket, base_url).await)
    };
    #[cfg(all(feature = "media-local", not(feature = "media-s3")))]
    let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(
        config.media.root.clone().into(),
        config.media.url_prefix.clone(),
    ));
    #[cfg(not(any(feature = "media-local", feature = "media-s3")))]
    let media: Arc<dyn MediaStorage> =
        Arc::new(MemoryMediaStorage::new(&config.media.url_prefix));

    // 3. Session authority
    #[cfg(feature = "auth-jwt")]
    let auth = Arc::new(JwtSessionGateway::new(
        gateway.clone(),
        gateway.clone(),
        JwtTokenCodec::new(&config.auth.jwt_secret, config.auth.session_ttl_hours),
    ));

    // 4. Shared state and router
    let state = AppState {
        posts: gateway.clone(),
        profiles: gateway.clone(),
        images: gateway.clone(),
        comments: gateway.clone(),
        likes: gateway.clone(),
        media,
        auth,
        cookie_name: config.auth.cookie_name.clone(),
        metrics: Arc::new(Metrics::new()),
    };

    let app = build_router(state)
        .route_service("/static/style.css", ServeFile::new("assets/style.css"));
    #[cfg(feature = "media-local")]
    let app = app.nest_service("/static/uploads", ServeDir::new(&config.media.root));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "hobbylog listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
