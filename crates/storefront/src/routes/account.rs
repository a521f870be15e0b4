//! Account route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use food_mood_core::UserId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile view.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub liked_tags: Vec<String>,
    pub disliked_tags: Vec<String>,
}

/// Display the authenticated user's profile.
#[instrument(skip(state, token))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(token): RequireAuth,
) -> Result<Json<ProfileView>> {
    let profile = state.api().get_profile(&token).await?;

    Ok(Json(ProfileView {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        liked_tags: profile.liked_tags,
        disliked_tags: profile.disliked_tags,
    }))
}
