pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::review::ReviewService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    pub fn new(reviews: ReviewService) -> Self {
        Self {
            reviews: Arc::new(reviews),
        }
    }
}

/// Build the API router without transport layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Card routes
        .route("/api/cards", post(routes::cards::create))
        .route("/api/cards/{card_id}", get(routes::cards::get))
        // Study routes
        .route("/api/study/queue", get(routes::study::queue))
        .route("/api/study/start/{deck_id}", get(routes::study::start))
        .route("/api/study/review", post(routes::study::review))
        .route("/api/study/preview/{card_id}", get(routes::study::preview))
        .route(
            "/api/study/consecutive-days/{deck_id}",
            get(routes::study::consecutive_days),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading configuration...");
    let config = Config::from_env()?;

    let reviews = ReviewService::from_config(&config)?;
    tracing::info!(
        "Using {} scheduler with learning steps {:?}",
        reviews.algorithm_name(),
        config.scheduler.learning_steps
    );

    let app = build_router(AppState::new(reviews))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
