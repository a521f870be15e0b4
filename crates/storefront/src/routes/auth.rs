//! Authentication route handlers.
//!
//! The backend owns credentials and token issuance; these handlers only
//! relay login/registration and manage the locally held session token.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use food_mood_core::Email;

use crate::error::{AppError, Notice, Result};
use crate::models::SessionToken;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Login status view.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle login.
///
/// On success the issued token is stored locally, the session becomes
/// logged in, and recommendations are fetched (a failure there is logged,
/// not surfaced - the user is still logged in).
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let email =
        Email::parse(&request.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let raw_token = state.api().login(email.as_str(), &request.password).await?;
    state.log_in(SessionToken::new(raw_token)).await;

    if let Some(token) = state.authorized_token().await {
        match state.api().get_recommendations(&token).await {
            Ok(recommendations) => {
                state.session().write().await.recommendations = recommendations;
                state.persist_recommendations().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch recommendations after login");
            }
        }
    }

    Ok(Json(Notice::new("Login successful")).into_response())
}

/// Handle registration.
///
/// The account is created by the backend; the user still has to log in
/// afterwards. A conflicting email surfaces as a 409 notice.
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response> {
    let email =
        Email::parse(&request.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    state
        .api()
        .register(request.name.trim(), email.as_str(), &request.password)
        .await?;

    Ok(Json(Notice::new("User created successfully. Please login.")).into_response())
}

/// Handle logout: clears the cart, recommendations, and token, locally and
/// on disk.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    state.log_out().await;
    Json(Notice::new("Logged out"))
}

/// Display the login status.
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> impl IntoResponse {
    // Runs the expiry check, discarding a stale token
    let logged_in = state.is_logged_in().await;

    let session = state.session().read().await;
    let (expires_at, user_id) = session
        .token
        .as_ref()
        .map_or((None, None), |token| {
            (
                token.expires_at(),
                token.user_id().map(ToString::to_string),
            )
        });

    Json(SessionView {
        logged_in,
        expires_at,
        user_id,
    })
}
