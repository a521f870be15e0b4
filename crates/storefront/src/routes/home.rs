//! Home view route handler.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::routes::catalog::{DishCardView, RestaurantCardView};
use crate::state::AppState;

/// How many featured items the home view shows.
const FEATURED_COUNT: usize = 5;

/// Home view query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Optional search filter applied before slicing the featured lists.
    pub q: Option<String>,
}

/// Home view: the first few dishes and restaurants, optionally narrowed by
/// a search query.
#[derive(Debug, serde::Serialize)]
pub struct HomeView {
    pub featured_dishes: Vec<DishCardView>,
    pub featured_restaurants: Vec<RestaurantCardView>,
    pub suggestions: Vec<String>,
}

/// Display the home view.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let session = state.session().read().await;
    let catalog = &session.catalog;
    let q = query.q.unwrap_or_default();

    let featured_dishes = catalog
        .search_dishes(&q)
        .into_iter()
        .take(FEATURED_COUNT)
        .map(|dish| DishCardView::from_dish(dish, catalog))
        .collect();

    let featured_restaurants = catalog
        .search_restaurants(&q)
        .into_iter()
        .take(FEATURED_COUNT)
        .map(RestaurantCardView::from_restaurant)
        .collect();

    Json(HomeView {
        featured_dishes,
        featured_restaurants,
        suggestions: catalog.suggestions(&q),
    })
}
