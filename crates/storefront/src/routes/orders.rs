//! Past-orders route handler.
//!
//! Orders come back from the backend with dish and restaurant references
//! populated. The view groups them by calendar day (most recent day first,
//! orders within a day oldest first) and resolves each line's current unit
//! price from the catalog - 0 when the pair is no longer offered.

use axum::{Json, extract::State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;

use food_mood_core::{DishId, RestaurantId};

use crate::api::types::PastOrder;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// A single past order line.
#[derive(Debug, Serialize)]
pub struct PastOrderView {
    pub dish_id: DishId,
    pub dish_name: String,
    pub image_url: String,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub cuisine_type: String,
    /// Current price for the pair, 0 when no longer offered.
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
    pub date: DateTime<Utc>,
}

/// All orders placed on one calendar day.
#[derive(Debug, Serialize)]
pub struct OrderDayView {
    /// Day formatted as dd/mm/yyyy.
    pub date: String,
    pub orders: Vec<PastOrderView>,
}

/// Past orders view, grouped by day.
#[derive(Debug, Serialize)]
pub struct OrdersView {
    pub days: Vec<OrderDayView>,
}

// =============================================================================
// Grouping
// =============================================================================

/// Group orders by calendar day: days descending, orders within a day
/// ascending by time.
fn group_by_day(mut orders: Vec<PastOrder>, catalog: &Catalog) -> Vec<OrderDayView> {
    orders.sort_by_key(|order| order.date);

    let mut days: Vec<(NaiveDate, Vec<PastOrderView>)> = Vec::new();
    for order in orders {
        let day = order.date.date_naive();
        let unit_price = catalog
            .find_availability(&order.dish.id, &order.restaurant.id)
            .map_or(0.0, |record| record.price);

        let view = PastOrderView {
            dish_id: order.dish.id,
            dish_name: order.dish.name,
            image_url: order.dish.image_url,
            restaurant_id: order.restaurant.id,
            restaurant_name: order.restaurant.name,
            cuisine_type: order.restaurant.cuisine_type,
            unit_price,
            quantity: order.quantity,
            total_price: order.total_price,
            date: order.date,
        };

        match days.iter_mut().find(|(existing, _)| *existing == day) {
            Some((_, entries)) => entries.push(view),
            None => days.push((day, vec![view])),
        }
    }

    days.sort_by(|a, b| b.0.cmp(&a.0));
    days.into_iter()
        .map(|(day, orders)| OrderDayView {
            date: day.format("%d/%m/%Y").to_string(),
            orders,
        })
        .collect()
}

// =============================================================================
// Handler
// =============================================================================

/// Display the user's past orders.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(token): RequireAuth,
) -> Result<Json<OrdersView>> {
    let orders = state.api().get_past_orders(&token).await?;

    let session = state.session().read().await;
    let days = group_by_day(orders, &session.catalog);

    Ok(Json(OrdersView { days }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::{dish, restaurant, sample_catalog};
    use chrono::TimeZone;

    fn order(dish_id: &str, restaurant_id: &str, quantity: u32, date: DateTime<Utc>) -> PastOrder {
        PastOrder {
            dish: dish(dish_id, "Dish", false, 400),
            restaurant: restaurant(restaurant_id, "Place", "Thai"),
            total_price: 10.0,
            quantity,
            date,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_by_day_most_recent_first() {
        let catalog = sample_catalog();
        let orders = vec![
            order("d1", "r1", 1, at(2025, 3, 10, 12)),
            order("d1", "r1", 2, at(2025, 3, 12, 9)),
            order("d1", "r1", 3, at(2025, 3, 10, 8)),
        ];

        let days = group_by_day(orders, &catalog);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "12/03/2025");
        assert_eq!(days[1].date, "10/03/2025");

        // Within a day, orders run oldest first
        let quantities: Vec<u32> = days[1].orders.iter().map(|o| o.quantity).collect();
        assert_eq!(quantities, vec![3, 1]);
    }

    #[test]
    fn test_unit_price_resolves_from_catalog() {
        let catalog = sample_catalog();
        let days = group_by_day(vec![order("d1", "r1", 1, at(2025, 3, 10, 12))], &catalog);
        assert!((days[0].orders[0].unit_price - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unit_price_zero_when_pair_no_longer_offered() {
        let catalog = sample_catalog();
        // d2 was never offered at r1
        let days = group_by_day(vec![order("d2", "r1", 1, at(2025, 3, 10, 12))], &catalog);
        assert!(days[0].orders[0].unit_price.abs() < f64::EPSILON);
    }
}
