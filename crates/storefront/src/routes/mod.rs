//! HTTP route handlers for the storefront gateway.
//!
//! All responses are JSON views; rendering is the job of the external UI.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home view: featured dishes and restaurants
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /search                 - Dish/restaurant search + suggestions
//! GET  /dishes                 - Filtered/sorted dish listing
//! GET  /dishes/{id}            - Dish detail with restaurants serving it
//! GET  /restaurants            - Restaurant listing
//! GET  /restaurants/{id}       - Restaurant menu with cart status
//! POST /catalog/refresh        - Re-fetch the reference collections
//!
//! # Cart
//! GET  /cart                   - Cart page view (requires auth)
//! POST /cart/add               - Add item (requires auth, returns count view)
//! POST /cart/update            - Adjust quantity (returns items view)
//! POST /cart/remove            - Remove item (returns items view)
//! GET  /cart/count             - Cart count badge
//! POST /cart/checkout          - Place one order per line (requires auth)
//!
//! # Auth
//! POST /auth/login             - Login action
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! GET  /auth/session           - Login status view
//!
//! # Recommendations (requires auth)
//! GET  /recommendations        - Fetch + return recommendations
//! POST /recommendations/{id}/like    - Like feedback
//! POST /recommendations/{id}/dislike - Dislike feedback
//!
//! # Account (requires auth)
//! GET  /orders                 - Past orders grouped by day
//! GET  /account                - Profile view
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod home;
pub mod orders;
pub mod recommendations;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(catalog::search))
        .route("/dishes", get(catalog::dishes))
        .route("/dishes/{id}", get(catalog::dish))
        .route("/restaurants", get(catalog::restaurants))
        .route("/restaurants/{id}", get(catalog::restaurant))
        .route("/catalog/refresh", post(catalog::refresh))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/checkout", post(cart::checkout))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create the recommendation routes router.
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recommendations::index))
        .route("/{id}/like", post(recommendations::like))
        .route("/{id}/dislike", post(recommendations::dislike))
}

/// Create all routes for the storefront gateway.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home view
        .route("/", get(home::home))
        // Catalog routes
        .merge(catalog_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Recommendation routes
        .nest("/recommendations", recommendation_routes())
        // Account routes
        .route("/orders", get(orders::index))
        .route("/account", get(account::profile))
}
