//! Libris API Server
//!
//! A small library catalog: books, members and the loans between them.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod render;

#[cfg(test)]
mod test_utils;


use adapters::{InMemoryLibraryRepository, SqlLibraryRepository};
use app::LibraryService;
use config::Config;
use domain::ports::LibraryRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibraryService<dyn LibraryRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router over the given state
pub fn build_router(state: AppState) -> Router {
    // Routes that need Basic credentials
    let protected = Router::new()
        .route("/books", post(handlers::create_book))
        .route("/books/:id/borrow", post(handlers::borrow_book))
        .route("/books/:id/return", post(handlers::return_book))
        .route("/loans", get(handlers::list_loans))
        .route("/members", post(handlers::register_member))
        .route("/members/:id", get(handlers::get_member))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .route("/login", post(handlers::login))
        // Public catalog
        .route("/books", get(handlers::list_books))
        .route("/books/:id", get(handlers::get_book))
        .merge(protected)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pick the store: SQL when a database URL is configured, memory otherwise
async fn open_repository(config: &Config) -> anyhow::Result<Arc<dyn LibraryRepository>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let repo = SqlLibraryRepository::connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");
            Ok(Arc::new(repo))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(InMemoryLibraryRepository::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,libris_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris API...");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;
    if !config.manager_login_enabled() {
        tracing::warn!("No manager password configured, manager login is disabled");
    }

    let repo = open_repository(&config).await?;
    let library = Arc::new(LibraryService::new(repo));

    if config.seed_demo_data && library.seed_demo_catalog().await? {
        tracing::info!("Catalog was empty, registered demo books and members");
    }

    let port = config.port;
    let app = build_router(AppState { library, config });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
