//! Cart route handlers.
//!
//! Cart state lives in the session and is persisted to local client
//! storage after every mutation; the backend only hears about it at
//! checkout, one order per line.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use food_mood_core::{DishId, RestaurantId};

use crate::api::types::{Dish, OrderInput};
use crate::cart::{Cart, CartTotals};
use crate::catalog::Catalog;
use crate::error::Notice;
use crate::middleware::RequireAuth;
use crate::routes::catalog::RestaurantCardView;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub dish_availability_id: String,
    pub dish_id: DishId,
    pub dish_name: String,
    pub image_url: String,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// A recommended dish shown under the cart, priced at its cheapest
/// restaurant.
#[derive(Debug, Serialize)]
pub struct RecommendedOfferView {
    pub dish_id: DishId,
    pub dish_name: String,
    pub image_url: String,
    pub restaurant: Option<RestaurantCardView>,
    pub cheapest_price: f64,
}

/// Cart page view.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: CartTotals,
    pub item_count: u32,
    pub recommendations: Vec<RecommendedOfferView>,
}

/// Cart count badge view.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Cart items fragment view (returned by update/remove).
#[derive(Debug, Serialize)]
pub struct CartItemsView {
    pub items: Vec<CartItemView>,
    pub totals: CartTotals,
}

/// Checkout result view.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub message: String,
    pub orders_placed: u32,
}

// =============================================================================
// Request Types
// =============================================================================

/// Body for cart add/remove.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub dish_id: DishId,
    pub restaurant_id: RestaurantId,
}

/// Body for cart quantity updates.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub dish_id: DishId,
    pub restaurant_id: RestaurantId,
    /// Signed change applied to the current quantity.
    pub delta: i32,
}

// =============================================================================
// View Building
// =============================================================================

/// Resolve cart entries against the catalog.
///
/// Entries whose availability, dish, or restaurant no longer exists are
/// skipped - stale references degrade to "ignore", never an error.
fn build_items(cart: &Cart, catalog: &Catalog) -> Vec<CartItemView> {
    cart.items
        .iter()
        .filter_map(|item| {
            let record = catalog.availability_by_id(&item.dish_availability_id)?;
            let dish = catalog.dish(&record.dish_id)?;
            let restaurant = catalog.restaurant(&record.restaurant_id)?;
            Some(CartItemView {
                dish_availability_id: record.id.as_str().to_string(),
                dish_id: dish.id.clone(),
                dish_name: dish.name.clone(),
                image_url: dish.image_url.clone(),
                restaurant_id: restaurant.id.clone(),
                restaurant_name: restaurant.name.clone(),
                unit_price: record.price,
                quantity: item.quantity,
                line_total: record.price * f64::from(item.quantity),
            })
        })
        .collect()
}

/// Build the "recommended for you" rail: each recommendation at its
/// cheapest restaurant. Dishes with no availability are skipped.
fn build_recommendations(recommendations: &[Dish], catalog: &Catalog) -> Vec<RecommendedOfferView> {
    recommendations
        .iter()
        .filter_map(|dish| {
            let cheapest = catalog.cheapest_availability(&dish.id)?;
            Some(RecommendedOfferView {
                dish_id: dish.id.clone(),
                dish_name: dish.name.clone(),
                image_url: dish.image_url.clone(),
                restaurant: catalog
                    .restaurant(&cheapest.restaurant_id)
                    .map(RestaurantCardView::from_restaurant),
                cheapest_price: cheapest.price,
            })
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, RequireAuth(_token): RequireAuth) -> Response {
    let session = state.session().read().await;
    let catalog = &session.catalog;

    Json(CartView {
        items: build_items(&session.cart, catalog),
        totals: CartTotals::of(&session.cart, catalog),
        item_count: session.cart.total_quantity(),
        recommendations: build_recommendations(&session.recommendations, catalog),
    })
    .into_response()
}

/// Add one unit of a dish from a restaurant.
///
/// Returns the updated count badge; an unknown dish/restaurant pair is a
/// no-op and reports the unchanged count.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_token): RequireAuth,
    Json(request): Json<CartLineRequest>,
) -> Response {
    let count = {
        let mut guard = state.session().write().await;
        let session = &mut *guard;
        session
            .cart
            .add(&session.catalog, &request.dish_id, &request.restaurant_id);
        session.cart.total_quantity()
    };

    state.persist_cart().await;
    Json(CartCountView { count }).into_response()
}

/// Adjust the quantity of a cart entry.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Response {
    let view = {
        let mut guard = state.session().write().await;
        let session = &mut *guard;
        session.cart.update_quantity(
            &session.catalog,
            &request.dish_id,
            &request.restaurant_id,
            request.delta,
        );
        CartItemsView {
            items: build_items(&session.cart, &session.catalog),
            totals: CartTotals::of(&session.cart, &session.catalog),
        }
    };

    state.persist_cart().await;
    Json(view).into_response()
}

/// Remove a cart entry.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<CartLineRequest>,
) -> Response {
    let view = {
        let mut guard = state.session().write().await;
        let session = &mut *guard;
        session
            .cart
            .remove(&session.catalog, &request.dish_id, &request.restaurant_id);
        CartItemsView {
            items: build_items(&session.cart, &session.catalog),
            totals: CartTotals::of(&session.cart, &session.catalog),
        }
    };

    state.persist_cart().await;
    Json(view).into_response()
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.session().read().await.cart.total_quantity();
    Json(CartCountView { count })
}

/// Place one order per cart line, then clear the cart.
///
/// Lines are sent sequentially with no atomicity across the batch: the
/// first failure aborts the loop and leaves the cart intact locally, so
/// already-placed lines stay placed. Stale lines are skipped.
#[instrument(skip(state, token))]
pub async fn checkout(State(state): State<AppState>, RequireAuth(token): RequireAuth) -> Response {
    let (items, catalog) = {
        let session = state.session().read().await;
        (session.cart.items.clone(), session.catalog.clone())
    };

    if items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(Notice::new("Your cart is empty.")),
        )
            .into_response();
    }

    let mut orders_placed: u32 = 0;
    for item in &items {
        let Some(record) = catalog.availability_by_id(&item.dish_availability_id) else {
            tracing::warn!(
                availability_id = %item.dish_availability_id,
                "Skipping cart entry with no matching availability"
            );
            continue;
        };

        let order = OrderInput {
            dish_id: record.dish_id.clone(),
            restaurant_id: record.restaurant_id.clone(),
            quantity: item.quantity,
            total_price: record.price * f64::from(item.quantity),
        };

        if let Err(e) = state.api().place_order(&token, &order).await {
            tracing::error!(error = %e, orders_placed, "Error during checkout");
            return (
                StatusCode::BAD_GATEWAY,
                Json(Notice::new(
                    "There was an error during checkout. Please try again.",
                )),
            )
                .into_response();
        }

        orders_placed += 1;
    }

    // All lines placed: drop the cart and refresh recommendations
    {
        let mut session = state.session().write().await;
        session.cart.clear();
    }
    state.persist_cart().await;

    match state.api().get_recommendations(&token).await {
        Ok(recommendations) => {
            state.session().write().await.recommendations = recommendations;
            state.persist_recommendations().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to refresh recommendations after checkout");
        }
    }

    Json(CheckoutView {
        message: "Checkout complete!".to_string(),
        orders_placed,
    })
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::catalog::tests::{dish, sample_catalog};
    use food_mood_core::AvailabilityId;

    #[test]
    fn test_build_items_skips_stale_entries() {
        let catalog = sample_catalog();
        let cart = Cart {
            user_id: String::new(),
            items: vec![
                CartItem {
                    dish_availability_id: AvailabilityId::new("a1"),
                    quantity: 2,
                },
                CartItem {
                    dish_availability_id: AvailabilityId::new("gone"),
                    quantity: 1,
                },
            ],
        };

        let items = build_items(&cart, &catalog);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].dish_name, "Pad Thai");
        assert_eq!(items[0].restaurant_name, "Thai Corner");
        assert!((items[0].line_total - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_recommendations_uses_cheapest_offer() {
        let catalog = sample_catalog();
        let recommendations = vec![
            dish("d1", "Pad Thai", false, 520),
            // d3 has no availability and is skipped
            dish("d3", "Margherita", true, 650),
        ];

        let rail = build_recommendations(&recommendations, &catalog);
        assert_eq!(rail.len(), 1);
        assert!((rail[0].cheapest_price - 5.0).abs() < f64::EPSILON);
        assert_eq!(rail[0].restaurant.as_ref().unwrap().name, "Verdura");
    }
}
