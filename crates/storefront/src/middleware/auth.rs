//! Authentication extractor.
//!
//! The gateway holds one user session: a bearer token issued by the backend
//! and kept in local client storage. `RequireAuth` hands handlers the token
//! for upstream calls and rejects when none is held - an expired token is
//! discarded (with the full local logout) before rejecting.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;

use crate::error::Notice;
use crate::state::AppState;

/// Extractor that requires a live session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(token): RequireAuth,
///     State(state): State<AppState>,
/// ) -> impl IntoResponse {
///     let orders = state.api().get_past_orders(&token).await?;
///     // ...
/// }
/// ```
pub struct RequireAuth(pub SecretString);

/// Rejection returned when no live token is held.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(Notice::new("You are not logged in!")),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .authorized_token()
            .await
            .map(Self)
            .ok_or(AuthRejection)
    }
}
