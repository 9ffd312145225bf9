//! Bookshelf Server - publisher, author and book catalog

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api, config::AppConfig, repository::Repository, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookshelf_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = if config.database.is_memory() {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        Repository::in_memory()
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Repository::new(pool)
    };

    let services = Services::new(repository, config.auth.clone(), config.catalog.clone());
    services.users.ensure_admin().await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
