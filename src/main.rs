use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod conditions;
mod config;
mod error;
mod routes;
mod shape;
mod upstream;

use cache::CacheStore;
use config::Config;
use routes::{create_router, AppState};
use upstream::openmeteo::OpenMeteoClient;
use upstream::weatherapi::WeatherApiClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_proxy_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the shared response cache
    let cache = Arc::new(CacheStore::new(config.cache_capacity));

    // Initialize upstream clients
    let open_meteo = Arc::new(OpenMeteoClient::new(config.clone()));
    let weather_api = Arc::new(WeatherApiClient::new(config.clone()));

    let config = Arc::new(config);

    // Create application state
    let state = AppState {
        config,
        cache,
        open_meteo,
        weather_api,
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server starting on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
