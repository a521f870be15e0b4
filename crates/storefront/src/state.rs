//! Application state shared across handlers.
//!
//! Holds the backend client, the local store, and the single user session:
//! the fetched catalog, the cart, persisted recommendations, and the bearer
//! token. Mutations happen synchronously under one RwLock; the lock is
//! never held across a backend call.

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::api::types::Dish;
use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::models::SessionToken;
use crate::storage::{LocalStore, StoredSession};

/// The mutable per-user session state.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Fetched reference collections.
    pub catalog: Catalog,
    /// The locally held cart.
    pub cart: Cart,
    /// Last known recommendations (also persisted locally).
    pub recommendations: Vec<Dish>,
    /// Bearer token, present while logged in.
    pub token: Option<SessionToken>,
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    store: LocalStore,
    session: RwLock<SessionState>,
}

impl AppState {
    /// Create a new application state with an empty session.
    pub fn new(config: StorefrontConfig, api: ApiClient, store: LocalStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                store,
                session: RwLock::new(SessionState::default()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the local client store.
    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    /// Get a reference to the session lock.
    #[must_use]
    pub fn session(&self) -> &RwLock<SessionState> {
        &self.inner.session
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Rehydrate the session from local storage.
    ///
    /// An expired saved token triggers the full local logout, exactly as if
    /// the user had logged out; a live one restores the logged-in state.
    /// The saved cart and recommendations are loaded afterwards so a logout
    /// clears them first.
    pub async fn restore_session(&self) {
        if let Some(saved) = self.inner.store.load_session() {
            let token = SessionToken::new(saved.token);
            if token.is_expired(Utc::now()) {
                info!("Saved session token has expired, logging out");
                self.log_out().await;
            } else {
                self.inner.session.write().await.token = Some(token);
            }
        }

        let mut session = self.inner.session.write().await;
        if let Some(cart) = self.inner.store.load_cart() {
            session.cart = cart;
        }
        if let Some(recommendations) = self.inner.store.load_recommendations() {
            session.recommendations = recommendations;
        }
    }

    /// Fetch the three catalog collections from the backend.
    ///
    /// Each collection is fetched independently; a failure is logged and
    /// leaves that collection as it was. Never fails the caller.
    pub async fn refresh_catalog(&self) {
        let dishes = self.inner.api.get_dishes().await;
        let restaurants = self.inner.api.get_restaurants().await;
        let availability = self.inner.api.get_dish_availability().await;

        let mut session = self.inner.session.write().await;
        match dishes {
            Ok(dishes) => session.catalog.set_dishes(dishes),
            Err(e) => warn!(error = %e, "Failed to fetch dishes"),
        }
        match restaurants {
            Ok(restaurants) => session.catalog.set_restaurants(restaurants),
            Err(e) => warn!(error = %e, "Failed to fetch restaurants"),
        }
        match availability {
            Ok(availability) => session.catalog.set_availability(availability),
            Err(e) => warn!(error = %e, "Failed to fetch dish availability"),
        }
    }

    /// Store a freshly issued token, marking the session logged in.
    ///
    /// The cart adopts the user id carried by the token.
    pub async fn log_in(&self, token: SessionToken) {
        if let Err(e) = self.inner.store.save_session(&StoredSession {
            token: token.raw().to_string(),
        }) {
            warn!(error = %e, "Failed to persist session token");
        }

        let mut session = self.inner.session.write().await;
        if let Some(user_id) = token.user_id() {
            session.cart.user_id = user_id.to_string();
        }
        session.token = Some(token);
        drop(session);

        self.persist_cart().await;
    }

    /// Clear the session: cart, recommendations, and token, in memory and
    /// on disk.
    pub async fn log_out(&self) {
        {
            let mut session = self.inner.session.write().await;
            session.cart.clear();
            session.recommendations.clear();
            session.token = None;
        }

        for result in [
            self.inner.store.clear_recommendations(),
            self.inner.store.clear_cart(),
            self.inner.store.clear_session(),
        ] {
            if let Err(e) = result {
                warn!(error = %e, "Failed to clear saved state");
            }
        }
    }

    /// The bearer token for an authenticated call.
    ///
    /// Returns `None` when not logged in. An expired token is discarded
    /// here with the same local logout the original performs, so the caller
    /// sees it as "not logged in".
    pub async fn authorized_token(&self) -> Option<SecretString> {
        let expired = {
            let session = self.inner.session.read().await;
            match &session.token {
                Some(token) => {
                    if token.is_expired(Utc::now()) {
                        true
                    } else {
                        return Some(token.secret().clone());
                    }
                }
                None => return None,
            }
        };

        if expired {
            info!("Session token expired, logging out");
            self.log_out().await;
        }
        None
    }

    /// Whether a live token is currently held.
    pub async fn is_logged_in(&self) -> bool {
        self.authorized_token().await.is_some()
    }

    // =========================================================================
    // Persistence Helpers
    // =========================================================================

    /// Write the current cart to local storage (failures are logged).
    pub async fn persist_cart(&self) {
        let cart = self.inner.session.read().await.cart.clone();
        if let Err(e) = self.inner.store.save_cart(&cart) {
            warn!(error = %e, "Failed to persist cart");
        }
    }

    /// Write the current recommendations to local storage (failures are
    /// logged).
    pub async fn persist_recommendations(&self) {
        let recommendations = self.inner.session.read().await.recommendations.clone();
        if let Err(e) = self.inner.store.save_recommendations(&recommendations) {
            warn!(error = %e, "Failed to persist recommendations");
        }
    }
}
