//! Food Mood Storefront - the client-side gateway for the food-ordering
//! storefront.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON views to the UI
//! - Food Mood backend API for dishes, restaurants, availability, auth,
//!   recommendations, and past orders
//! - Local JSON storage for cart, recommendations, and the session token
//!
//! All business logic (pricing, persistence, recommendations,
//! authentication) lives in the backend; this binary is a presentational
//! and state-synchronization layer over its API.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use food_mood_storefront::api::ApiClient;
use food_mood_storefront::config::StorefrontConfig;
use food_mood_storefront::routes;
use food_mood_storefront::state::AppState;
use food_mood_storefront::storage::LocalStore;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "food_mood_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open local client storage
    let store =
        LocalStore::open(&config.data_dir).expect("Failed to open local storage directory");
    tracing::info!(dir = %store.dir().display(), "Local storage ready");

    // Build application state
    let api = ApiClient::new(&config.backend);
    let state = AppState::new(config.clone(), api, store);

    // Rehydrate saved session (token expiry is checked here), then fetch
    // the catalog. A backend that is down leaves the catalog empty; the
    // refresh endpoint can fill it later.
    state.restore_session().await;
    state.refresh_catalog().await;
    {
        let session = state.session().read().await;
        tracing::info!(
            dishes = session.catalog.dishes().len(),
            restaurants = session.catalog.restaurants().len(),
            availability = session.catalog.availability().len(),
            "Catalog loaded"
        );
    }

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies backend connectivity before returning OK.
/// Returns 503 Service Unavailable if the backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().get_restaurants().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
