//! Recommendation route handlers.
//!
//! Recommendations are computed by the backend. The gateway fetches them on
//! demand, keeps the last successful result (persisted locally so they
//! survive restarts), and relays like/dislike feedback.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use food_mood_core::DishId;

use crate::error::{Notice, Result};
use crate::middleware::RequireAuth;
use crate::routes::catalog::DishCardView;
use crate::state::AppState;

/// Recommendations view.
#[derive(Debug, Serialize)]
pub struct RecommendationsView {
    pub recommendations: Vec<DishCardView>,
}

/// Fetch and display recommendations.
///
/// A fetch failure is logged and the last known list is served instead, so
/// a flaky backend never blanks the view.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(token): RequireAuth,
) -> impl IntoResponse {
    match state.api().get_recommendations(&token).await {
        Ok(recommendations) => {
            state.session().write().await.recommendations = recommendations;
            state.persist_recommendations().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch recommendations");
        }
    }

    let session = state.session().read().await;
    let catalog = &session.catalog;

    Json(RecommendationsView {
        recommendations: session
            .recommendations
            .iter()
            .map(|dish| DishCardView::from_dish(dish, catalog))
            .collect(),
    })
}

/// Record like feedback for a dish.
#[instrument(skip(state, token), fields(dish_id = %id))]
pub async fn like(
    State(state): State<AppState>,
    RequireAuth(token): RequireAuth,
    Path(id): Path<DishId>,
) -> Result<Json<Notice>> {
    state.api().like_dish(&token, &id).await?;
    Ok(Json(Notice::new("Liked dish successfully.")))
}

/// Record dislike feedback for a dish.
#[instrument(skip(state, token), fields(dish_id = %id))]
pub async fn dislike(
    State(state): State<AppState>,
    RequireAuth(token): RequireAuth,
    Path(id): Path<DishId>,
) -> Result<Json<Notice>> {
    state.api().dislike_dish(&token, &id).await?;
    Ok(Json(Notice::new("Disliked dish successfully.")))
}
