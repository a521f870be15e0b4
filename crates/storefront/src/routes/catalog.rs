//! Catalog route handlers: dish and restaurant listings, details, search,
//! and the catalog refresh action.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use food_mood_core::{DishId, RestaurantId};

use crate::api::types::{Dish, FlavorGenome, Restaurant};
use crate::catalog::{Catalog, DishFilter, PriceSort, filter_and_sort, sort_priced};
use crate::error::Result;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Dish card data for list views.
#[derive(Debug, Clone, Serialize)]
pub struct DishCardView {
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub calories: u32,
    pub tags: Vec<String>,
    pub vegetarian: bool,
    pub rating: f64,
    /// Minimum price across the dish's offers; `null` when nowhere to buy.
    pub cheapest_price: Option<f64>,
}

impl DishCardView {
    /// Build a card from a dish, resolving its cheapest offer.
    #[must_use]
    pub fn from_dish(dish: &Dish, catalog: &Catalog) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            description: dish.description.clone(),
            image_url: dish.image_url.clone(),
            calories: dish.calories,
            tags: dish.tags.clone(),
            vegetarian: dish.vegetarian,
            rating: dish.rating,
            cheapest_price: catalog.cheapest_price(&dish.id),
        }
    }
}

/// Restaurant card data for list views.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantCardView {
    pub id: RestaurantId,
    pub name: String,
    pub image_url: String,
    pub rating: f64,
    pub cuisine_type: String,
}

impl RestaurantCardView {
    /// Build a card from a restaurant.
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            image_url: restaurant.image_url.clone(),
            rating: restaurant.rating,
            cuisine_type: restaurant.cuisine_type.clone(),
        }
    }
}

/// A restaurant offering a specific dish, with the offer price.
#[derive(Debug, Serialize)]
pub struct RestaurantOfferView {
    #[serde(flatten)]
    pub restaurant: RestaurantCardView,
    pub price: f64,
}

/// Dish detail view.
#[derive(Debug, Serialize)]
pub struct DishDetailView {
    #[serde(flatten)]
    pub card: DishCardView,
    pub genome_data: FlavorGenome,
    pub restaurants: Vec<RestaurantOfferView>,
}

/// A menu entry: a dish at this restaurant's price, with its cart status.
#[derive(Debug, Serialize)]
pub struct MenuItemView {
    #[serde(flatten)]
    pub dish: DishCardView,
    pub price: f64,
    pub in_cart: bool,
    pub quantity_in_cart: u32,
}

/// Restaurant menu view.
#[derive(Debug, Serialize)]
pub struct RestaurantMenuView {
    #[serde(flatten)]
    pub restaurant: RestaurantCardView,
    pub dishes: Vec<MenuItemView>,
}

/// Search results view.
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub dishes: Vec<DishCardView>,
    pub restaurants: Vec<RestaurantCardView>,
    pub suggestions: Vec<String>,
}

/// Summary returned by the catalog refresh action.
#[derive(Debug, Serialize)]
pub struct CatalogSummaryView {
    pub dishes: usize,
    pub restaurants: usize,
    pub availability: usize,
}

// =============================================================================
// Query Types
// =============================================================================

/// Filter parameters shared by dish list views.
#[derive(Debug, Default, Deserialize)]
pub struct DishListQuery {
    #[serde(default)]
    pub vegetarian_only: bool,
    #[serde(default)]
    pub min_calories: u32,
    #[serde(default)]
    pub sort: PriceSort,
}

impl DishListQuery {
    fn filter(&self) -> DishFilter {
        DishFilter {
            vegetarian_only: self.vegetarian_only,
            min_calories: self.min_calories,
            sort: self.sort,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the filtered, sorted dish listing.
#[instrument(skip(state))]
pub async fn dishes(
    State(state): State<AppState>,
    Query(query): Query<DishListQuery>,
) -> impl IntoResponse {
    let session = state.session().read().await;
    let catalog = &session.catalog;

    let view: Vec<DishCardView> = filter_and_sort(catalog, catalog.dishes(), &query.filter())
        .into_iter()
        .map(|dish| DishCardView::from_dish(dish, catalog))
        .collect();

    Json(view)
}

/// Display a dish with the restaurants serving it.
#[instrument(skip(state), fields(dish_id = %id))]
pub async fn dish(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
) -> Result<Json<DishDetailView>> {
    let session = state.session().read().await;
    let catalog = &session.catalog;

    let dish = catalog
        .dish(&id)
        .ok_or_else(|| crate::error::AppError::NotFound("Dish not found".to_string()))?;

    let restaurants = catalog
        .restaurants_serving(&id)
        .into_iter()
        .map(|(restaurant, price)| RestaurantOfferView {
            restaurant: RestaurantCardView::from_restaurant(restaurant),
            price,
        })
        .collect();

    Ok(Json(DishDetailView {
        card: DishCardView::from_dish(dish, catalog),
        genome_data: dish.genome_data.clone(),
        restaurants,
    }))
}

/// Display the restaurant listing.
#[instrument(skip(state))]
pub async fn restaurants(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session().read().await;

    let view: Vec<RestaurantCardView> = session
        .catalog
        .restaurants()
        .iter()
        .map(RestaurantCardView::from_restaurant)
        .collect();

    Json(view)
}

/// Display a restaurant's menu with per-dish cart status.
#[instrument(skip(state), fields(restaurant_id = %id))]
pub async fn restaurant(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    Query(query): Query<DishListQuery>,
) -> Result<Json<RestaurantMenuView>> {
    let session = state.session().read().await;
    let catalog = &session.catalog;

    let restaurant = catalog
        .restaurant(&id)
        .ok_or_else(|| crate::error::AppError::NotFound("Restaurant not found".to_string()))?;

    let filter = query.filter();
    let mut menu: Vec<(&Dish, f64)> = catalog
        .menu_for(&id)
        .into_iter()
        .filter(|(dish, _)| {
            (!filter.vegetarian_only || dish.vegetarian) && dish.calories >= filter.min_calories
        })
        .collect();
    sort_priced(&mut menu, filter.sort);

    let dishes = menu
        .into_iter()
        .map(|(dish, price)| MenuItemView {
            dish: DishCardView::from_dish(dish, catalog),
            price,
            in_cart: session.cart.is_in_cart(catalog, &dish.id, &id),
            quantity_in_cart: session.cart.quantity_of(catalog, &dish.id, &id),
        })
        .collect();

    Ok(Json(RestaurantMenuView {
        restaurant: RestaurantCardView::from_restaurant(restaurant),
        dishes,
    }))
}

/// Search dishes and restaurants.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let session = state.session().read().await;
    let catalog = &session.catalog;

    Json(SearchView {
        dishes: catalog
            .search_dishes(&query.q)
            .into_iter()
            .map(|dish| DishCardView::from_dish(dish, catalog))
            .collect(),
        restaurants: catalog
            .search_restaurants(&query.q)
            .into_iter()
            .map(RestaurantCardView::from_restaurant)
            .collect(),
        suggestions: catalog.suggestions(&query.q),
    })
}

/// Re-fetch the three reference collections from the backend.
///
/// Entries in the cart whose availability disappears with the refresh are
/// simply ignored by later evaluations.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    state.api().invalidate_catalog().await;
    state.refresh_catalog().await;

    let session = state.session().read().await;
    Json(CatalogSummaryView {
        dishes: session.catalog.dishes().len(),
        restaurants: session.catalog.restaurants().len(),
        availability: session.catalog.availability().len(),
    })
}
