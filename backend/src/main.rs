//! AgroSense decision engine - server binary

use agrosense_backend::{
    create_app,
    external::{ForecastProvider, OpenWeatherClient},
    AppState, Config, EngineContext,
};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agrosense_server=debug,agrosense_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    let settings = config.engine_settings();
    settings.validate().map_err(anyhow::Error::msg)?;

    tracing::info!("Starting AgroSense Decision Engine");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Weather provider is optional; without it decisions skip the rain check
    let provider: Option<Arc<dyn ForecastProvider>> = if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured, rain adjustment disabled");
        None
    } else {
        let client = OpenWeatherClient::new(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
            Duration::from_secs(config.weather.request_timeout_secs),
        )?;
        Some(Arc::new(client))
    };

    let engine = EngineContext::postgres(db_pool.clone(), provider, settings);
    let state = AppState {
        db: Some(db_pool),
        engine: Arc::new(engine),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
