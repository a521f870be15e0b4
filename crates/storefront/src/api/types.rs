//! Wire types for the Food Mood backend API.
//!
//! Field names follow the backend's JSON documents exactly (`_id`,
//! `genome_data`, `dishId`, `totalPrice`, ...), so these types double as the
//! serialization format for locally persisted state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use food_mood_core::{AvailabilityId, DishId, RestaurantId, UserId};

// =============================================================================
// Catalog Types
// =============================================================================

/// 25-axis flavor profile attached to every dish.
///
/// Produced by the backend's recommendation pipeline; the storefront only
/// carries it through so the UI can render flavor charts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlavorGenome {
    pub spiciness: f64,
    pub sweetness: f64,
    pub sourness: f64,
    pub saltiness: f64,
    pub bitterness: f64,
    pub umami: f64,
    pub crunchiness: f64,
    pub creaminess: f64,
    pub chewiness: f64,
    pub juiciness: f64,
    pub hotness: f64,
    pub oiliness: f64,
    pub smokiness: f64,
    pub charredness: f64,
    pub herbaceous: f64,
    pub garlicky: f64,
    pub oniony: f64,
    pub citrusy: f64,
    pub fermented: f64,
    pub meatiness: f64,
    pub seafoodiness: f64,
    pub vegetal: f64,
    pub dairiness: f64,
    pub carb_rich: f64,
    pub nutty: f64,
}

/// A dish in the catalog. Immutable from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(rename = "_id")]
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub calories: u32,
    pub tags: Vec<String>,
    pub genome_data: FlavorGenome,
    pub vegetarian: bool,
    pub rating: f64,
}

/// A restaurant in the catalog. Immutable from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    pub name: String,
    pub image_url: String,
    pub rating: f64,
    pub cuisine_type: String,
}

/// Join record encoding where a dish can be bought and at what price.
///
/// A dish may have zero, one, or many availability records (one per
/// restaurant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishAvailability {
    #[serde(rename = "_id")]
    pub id: AvailabilityId,
    pub dish_id: DishId,
    pub restaurant_id: RestaurantId,
    pub price: f64,
}

// =============================================================================
// User Types
// =============================================================================

/// The authenticated user's profile.
///
/// The backend's user document also carries a password hash and the raw past
/// order list; neither is consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub liked_tags: Vec<String>,
    #[serde(default)]
    pub disliked_tags: Vec<String>,
}

/// A past order as returned by the backend, with dish and restaurant
/// references populated into full documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastOrder {
    #[serde(rename = "dishId")]
    pub dish: Dish,
    #[serde(rename = "restaurantId")]
    pub restaurant: Restaurant,
    pub total_price: f64,
    pub quantity: u32,
    pub date: DateTime<Utc>,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Body for `POST /users/login`.
#[derive(Debug, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response from `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body for `POST /users/register`.
#[derive(Debug, Serialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /users/pastorders` - one order line at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    #[serde(rename = "dishId")]
    pub dish_id: DishId,
    #[serde(rename = "restaurantId")]
    pub restaurant_id: RestaurantId,
    pub quantity: u32,
    pub total_price: f64,
}

/// Response from `GET /users/recommendations`.
#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Dish>,
}

/// Response from `GET /users/pastorders`.
#[derive(Debug, Deserialize)]
pub struct PastOrdersResponse {
    pub pastorders: Vec<PastOrder>,
}

/// Body for `POST /users/likeddishes` and `POST /users/dislikeddishes`.
#[derive(Debug, Serialize)]
pub struct DishFeedbackInput {
    #[serde(rename = "dishId")]
    pub dish_id: DishId,
}

/// Error body the backend attaches to non-success responses.
///
/// Some endpoints use `message`, others `error`; both are optional.
#[derive(Debug, Default, Deserialize)]
pub struct BackendErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl BackendErrorBody {
    /// The human-readable message, whichever field carries it.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
