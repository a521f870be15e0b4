//! Food Mood backend API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for the three catalog collections
//!   (configurable TTL, 5 minutes by default)
//! - Authenticated calls attach the session's bearer token; the client
//!   itself holds no credentials
//!
//! # Example
//!
//! ```rust,ignore
//! use food_mood_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config.backend);
//!
//! // Catalog reads (cached)
//! let dishes = api.get_dishes().await?;
//!
//! // Authenticated calls
//! let token = api.login("user@example.com", "hunter2!").await?;
//! let recs = api.get_recommendations(&token).await?;
//! ```

pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use food_mood_core::DishId;

use crate::config::BackendConfig;
use types::{
    BackendErrorBody, Dish, DishAvailability, DishFeedbackInput, LoginInput, LoginResponse,
    OrderInput, PastOrder, PastOrdersResponse, RecommendationsResponse, RegisterInput, Restaurant,
    UserProfile,
};

/// Errors that can occur when talking to the Food Mood backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend rejected the bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting state, e.g. registering an email that already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },
}

/// Cached catalog responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Dishes(Vec<Dish>),
    Restaurants(Vec<Restaurant>),
    Availability(Vec<DishAvailability>),
}

const CACHE_KEY_DISHES: &str = "dishes";
const CACHE_KEY_RESTAURANTS: &str = "restaurants";
const CACHE_KEY_AVAILABILITY: &str = "availability";

/// Client for the Food Mood backend API.
///
/// Cheaply cloneable; catalog reads are cached, everything touching user
/// state goes straight to the backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<&'static str, CacheValue>,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens when the TLS backend is unavailable.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Join an endpoint path onto the configured base URL.
    fn endpoint(&self, path: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    /// Turn a non-success response into an [`ApiError`].
    async fn error_for_response(response: reqwest::Response) -> ApiError {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return ApiError::RateLimited(retry_after);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(BackendErrorBody::into_message)
            .unwrap_or_else(|| {
                let snippet: String = body.chars().take(200).collect();
                if snippet.is_empty() {
                    status.to_string()
                } else {
                    snippet
                }
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            _ => ApiError::Backend {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Execute an unauthenticated GET and parse the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.http.get(self.endpoint(path)).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_for_response(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Execute an authenticated GET and parse the JSON response.
    async fn get_json_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .http
            .get(self.endpoint(path))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_response(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Execute an authenticated POST with a JSON body.
    ///
    /// The backend's write endpoints return bodies the client does not
    /// consume, so only the status is inspected.
    async fn post_json_authed<B: Serialize>(
        &self,
        path: &str,
        token: &SecretString,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .inner
            .http
            .post(self.endpoint(path))
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_response(response).await);
        }

        Ok(())
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get the full dish list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_dishes(&self) -> Result<Vec<Dish>, ApiError> {
        if let Some(CacheValue::Dishes(dishes)) = self.inner.cache.get(CACHE_KEY_DISHES).await {
            debug!("Cache hit for dishes");
            return Ok(dishes);
        }

        let dishes: Vec<Dish> = self.get_json("dishes").await?;

        self.inner
            .cache
            .insert(CACHE_KEY_DISHES, CacheValue::Dishes(dishes.clone()))
            .await;

        Ok(dishes)
    }

    /// Get the full restaurant list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        if let Some(CacheValue::Restaurants(restaurants)) =
            self.inner.cache.get(CACHE_KEY_RESTAURANTS).await
        {
            debug!("Cache hit for restaurants");
            return Ok(restaurants);
        }

        let restaurants: Vec<Restaurant> = self.get_json("restaurants").await?;

        self.inner
            .cache
            .insert(
                CACHE_KEY_RESTAURANTS,
                CacheValue::Restaurants(restaurants.clone()),
            )
            .await;

        Ok(restaurants)
    }

    /// Get the full dish-availability list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_dish_availability(&self) -> Result<Vec<DishAvailability>, ApiError> {
        if let Some(CacheValue::Availability(availability)) =
            self.inner.cache.get(CACHE_KEY_AVAILABILITY).await
        {
            debug!("Cache hit for dish availability");
            return Ok(availability);
        }

        let availability: Vec<DishAvailability> = self.get_json("dish-availability").await?;

        self.inner
            .cache
            .insert(
                CACHE_KEY_AVAILABILITY,
                CacheValue::Availability(availability.clone()),
            )
            .await;

        Ok(availability)
    }

    /// Invalidate all cached catalog data, forcing the next reads to hit
    /// the backend.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in and obtain a bearer token.
    ///
    /// The raw token is returned for the caller to wrap into a session
    /// token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials, or another
    /// variant if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .inner
            .http
            .post(self.endpoint("users/login"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_response(response).await);
        }

        let login: LoginResponse = response.json().await?;
        Ok(login.token)
    }

    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` when the email is already registered,
    /// or another variant if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .inner
            .http
            .post(self.endpoint("users/register"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_response(response).await);
        }

        Ok(())
    }

    // =========================================================================
    // User Methods (bearer token required)
    // =========================================================================

    /// Get the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_profile(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        self.get_json_authed("users/profile", token).await
    }

    /// Get personalized dish recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_recommendations(&self, token: &SecretString) -> Result<Vec<Dish>, ApiError> {
        let response: RecommendationsResponse =
            self.get_json_authed("users/recommendations", token).await?;
        Ok(response.recommendations)
    }

    /// Get the user's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_past_orders(&self, token: &SecretString) -> Result<Vec<PastOrder>, ApiError> {
        let response: PastOrdersResponse =
            self.get_json_authed("users/pastorders", token).await?;
        Ok(response.pastorders)
    }

    /// Place one order line, recording it in the user's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(dish_id = %order.dish_id, quantity = order.quantity))]
    pub async fn place_order(
        &self,
        token: &SecretString,
        order: &OrderInput,
    ) -> Result<(), ApiError> {
        self.post_json_authed("users/pastorders", token, order).await
    }

    /// Record like feedback for a recommended dish.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(dish_id = %dish_id))]
    pub async fn like_dish(&self, token: &SecretString, dish_id: &DishId) -> Result<(), ApiError> {
        let body = DishFeedbackInput {
            dish_id: dish_id.clone(),
        };
        self.post_json_authed("users/likeddishes", token, &body).await
    }

    /// Record dislike feedback for a recommended dish.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(dish_id = %dish_id))]
    pub async fn dislike_dish(
        &self,
        token: &SecretString,
        dish_id: &DishId,
    ) -> Result<(), ApiError> {
        let body = DishFeedbackInput {
            dish_id: dish_id.clone(),
        };
        self.post_json_authed("users/dislikeddishes", token, &body)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn test_client(base: &str) -> ApiClient {
        ApiClient::new(&BackendConfig {
            base_url: Url::parse(base).unwrap(),
            catalog_cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        })
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let api = test_client("http://localhost:8000/api");
        assert_eq!(api.endpoint("dishes"), "http://localhost:8000/api/dishes");
        assert_eq!(
            api.endpoint("users/login"),
            "http://localhost:8000/api/users/login"
        );
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let api = test_client("http://localhost:8000/api/");
        assert_eq!(
            api.endpoint("dish-availability"),
            "http://localhost:8000/api/dish-availability"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("dish-123".to_string());
        assert_eq!(err.to_string(), "Not found: dish-123");

        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");

        let err = ApiError::Backend {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (500): boom");
    }
}
