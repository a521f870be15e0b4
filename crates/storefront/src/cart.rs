//! The shopping cart and its reconciliation operations.
//!
//! The cart is the one mutable collection the storefront owns. Entries are
//! keyed by availability id, not dish id, so the same dish at two different
//! restaurants (at two different prices) occupies two distinct entries.
//! Every operation resolves the dish/restaurant pair against the catalog
//! first; a pair with no availability record is a logged no-op.
//!
//! The cart is persisted to local storage and not synced to the backend
//! until checkout. Entries whose availability id no longer resolves (after
//! a catalog refresh, for example) are ignored when the cart is evaluated.

use serde::{Deserialize, Serialize};
use tracing::warn;

use food_mood_core::{AvailabilityId, DishId, RestaurantId};

use crate::catalog::Catalog;

/// Sales tax applied to the cart subtotal.
pub const TAX_RATE: f64 = 0.10;

/// Flat delivery fee shown in the order summary.
pub const DELIVERY_FEE: f64 = 5.99;

/// A quantity of one dish-availability record held pending checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The availability record this entry points at.
    pub dish_availability_id: AvailabilityId,
    /// Always at least 1; an entry reduced to 0 is removed instead.
    pub quantity: u32,
}

/// The shopping cart. Serialized as-is to local storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Owning user id; empty while logged out.
    pub user_id: String,
    /// Cart entries, keyed by availability id.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add one unit of a dish from a restaurant.
    ///
    /// If the pair has no availability record this is a no-op. If an entry
    /// for the resolved availability id already exists its quantity is
    /// incremented, otherwise a new entry with quantity 1 is appended.
    ///
    /// Returns `true` if the cart changed.
    pub fn add(&mut self, catalog: &Catalog, dish_id: &DishId, restaurant_id: &RestaurantId) -> bool {
        let Some(record) = catalog.find_availability(dish_id, restaurant_id) else {
            warn!(%dish_id, %restaurant_id, "No availability for dish/restaurant pair");
            return false;
        };

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.dish_availability_id == record.id)
        {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                dish_availability_id: record.id.clone(),
                quantity: 1,
            });
        }

        true
    }

    /// Adjust the quantity of an entry by `delta`.
    ///
    /// A result of zero or less removes the entry entirely (no clamping).
    /// No-op when the pair has no availability record or no entry matches.
    ///
    /// Returns `true` if the cart changed.
    pub fn update_quantity(
        &mut self,
        catalog: &Catalog,
        dish_id: &DishId,
        restaurant_id: &RestaurantId,
        delta: i32,
    ) -> bool {
        let Some(record) = catalog.find_availability(dish_id, restaurant_id) else {
            warn!(%dish_id, %restaurant_id, "No availability for dish/restaurant pair");
            return false;
        };

        let Some(index) = self
            .items
            .iter()
            .position(|item| item.dish_availability_id == record.id)
        else {
            warn!(%dish_id, %restaurant_id, "Item not found in cart");
            return false;
        };

        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let quantity = i64::from(item.quantity) + i64::from(delta);
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        true
    }

    /// Remove the entry for a dish/restaurant pair, if present.
    ///
    /// Returns `true` if the cart changed.
    pub fn remove(
        &mut self,
        catalog: &Catalog,
        dish_id: &DishId,
        restaurant_id: &RestaurantId,
    ) -> bool {
        let Some(record) = catalog.find_availability(dish_id, restaurant_id) else {
            warn!(%dish_id, %restaurant_id, "No availability for dish/restaurant pair");
            return false;
        };

        let before = self.items.len();
        self.items
            .retain(|item| item.dish_availability_id != record.id);
        self.items.len() != before
    }

    /// Whether the pair currently has an entry in the cart.
    ///
    /// `false` when the pair has no availability record.
    #[must_use]
    pub fn is_in_cart(
        &self,
        catalog: &Catalog,
        dish_id: &DishId,
        restaurant_id: &RestaurantId,
    ) -> bool {
        catalog
            .find_availability(dish_id, restaurant_id)
            .is_some_and(|record| {
                self.items
                    .iter()
                    .any(|item| item.dish_availability_id == record.id)
            })
    }

    /// The quantity held for a dish/restaurant pair.
    ///
    /// `0` when the pair has no availability record or no entry matches.
    #[must_use]
    pub fn quantity_of(
        &self,
        catalog: &Catalog,
        dish_id: &DishId,
        restaurant_id: &RestaurantId,
    ) -> u32 {
        catalog
            .find_availability(dish_id, restaurant_id)
            .and_then(|record| {
                self.items
                    .iter()
                    .find(|item| item.dish_availability_id == record.id)
            })
            .map_or(0, |item| item.quantity)
    }

    /// Total unit count across all entries (the navbar badge).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price x quantity over entries that still resolve against the
    /// catalog. Stale entries contribute nothing.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> f64 {
        self.items
            .iter()
            .filter_map(|item| {
                catalog
                    .availability_by_id(&item.dish_availability_id)
                    .map(|record| record.price * f64::from(item.quantity))
            })
            .sum()
    }

    /// Drop all entries and the owning user.
    pub fn clear(&mut self) {
        self.user_id.clear();
        self.items.clear();
    }
}

/// Order summary figures derived from the cart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

impl CartTotals {
    /// Compute the order summary for a cart against the current catalog.
    #[must_use]
    pub fn of(cart: &Cart, catalog: &Catalog) -> Self {
        let subtotal = cart.subtotal(catalog);
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            delivery_fee: DELIVERY_FEE,
            total: subtotal + tax + DELIVERY_FEE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;

    fn ids(dish: &str, restaurant: &str) -> (DishId, RestaurantId) {
        (DishId::new(dish), RestaurantId::new(restaurant))
    }

    #[test]
    fn test_add_without_availability_is_noop() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        // d2 is not offered at r1
        let (dish, restaurant) = ids("d2", "r1");
        assert!(!cart.add(&catalog, &dish, &restaurant));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_twice_yields_one_entry_with_quantity_two() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");

        assert!(cart.add(&catalog, &dish, &restaurant));
        assert!(cart.add(&catalog, &dish, &restaurant));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.quantity_of(&catalog, &dish, &restaurant), 2);
    }

    #[test]
    fn test_same_dish_at_two_restaurants_occupies_two_entries() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let dish = DishId::new("d1");

        cart.add(&catalog, &dish, &RestaurantId::new("r1"));
        cart.add(&catalog, &dish, &RestaurantId::new("r2"));

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_decrement_to_zero_removes_entry() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");

        cart.add(&catalog, &dish, &restaurant);
        assert!(cart.update_quantity(&catalog, &dish, &restaurant, -1));

        assert!(cart.is_empty());
        assert!(!cart.is_in_cart(&catalog, &dish, &restaurant));
    }

    #[test]
    fn test_update_quantity_below_zero_removes_not_clamps() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");

        cart.add(&catalog, &dish, &restaurant);
        assert!(cart.update_quantity(&catalog, &dish, &restaurant, -5));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_on_missing_pair_is_noop() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d3", "r1");
        assert!(!cart.update_quantity(&catalog, &dish, &restaurant, 1));
    }

    #[test]
    fn test_update_quantity_when_not_in_cart_is_noop() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");
        assert!(!cart.update_quantity(&catalog, &dish, &restaurant, 1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lookups_return_falsy_for_unknown_pair() {
        let catalog = sample_catalog();
        let cart = Cart::default();
        let (dish, restaurant) = ids("d3", "r2");
        assert!(!cart.is_in_cart(&catalog, &dish, &restaurant));
        assert_eq!(cart.quantity_of(&catalog, &dish, &restaurant), 0);
    }

    #[test]
    fn test_add_update_remove_sequence_leaves_other_entries_alone() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let dish = DishId::new("d1");
        let other_dish = DishId::new("d2");
        let r1 = RestaurantId::new("r1");
        let r2 = RestaurantId::new("r2");

        cart.add(&catalog, &other_dish, &r2);
        cart.add(&catalog, &dish, &r1);
        cart.update_quantity(&catalog, &dish, &r1, 2);
        assert_eq!(cart.quantity_of(&catalog, &dish, &r1), 3);

        cart.remove(&catalog, &dish, &r1);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(&catalog, &other_dish, &r2), 1);
    }

    #[test]
    fn test_remove_without_entry_reports_no_change() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");
        assert!(!cart.remove(&catalog, &dish, &restaurant));
    }

    #[test]
    fn test_subtotal_skips_stale_entries() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d1", "r1");
        cart.add(&catalog, &dish, &restaurant); // 8.0
        cart.update_quantity(&catalog, &dish, &restaurant, 1); // x2

        // An entry whose availability no longer exists contributes nothing
        cart.items.push(CartItem {
            dish_availability_id: food_mood_core::AvailabilityId::new("gone"),
            quantity: 4,
        });

        assert!((cart.subtotal(&catalog) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_apply_tax_and_delivery_fee() {
        let catalog = sample_catalog();
        let mut cart = Cart::default();
        let (dish, restaurant) = ids("d2", "r2");
        cart.add(&catalog, &dish, &restaurant); // 6.5

        let totals = CartTotals::of(&cart, &catalog);
        assert!((totals.subtotal - 6.5).abs() < f64::EPSILON);
        assert!((totals.tax - 0.65).abs() < 1e-9);
        assert!((totals.delivery_fee - DELIVERY_FEE).abs() < f64::EPSILON);
        assert!((totals.total - (6.5 + 0.65 + 5.99)).abs() < 1e-9);
    }

    #[test]
    fn test_cart_serializes_local_storage_format() {
        let catalog = sample_catalog();
        let mut cart = Cart {
            user_id: "user-1".to_string(),
            items: Vec::new(),
        };
        cart.add(&catalog, &DishId::new("d1"), &RestaurantId::new("r1"));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["items"][0]["dish_availability_id"], "a1");
        assert_eq!(json["items"][0]["quantity"], 1);
    }

    #[test]
    fn test_clear_resets_user_and_items() {
        let catalog = sample_catalog();
        let mut cart = Cart {
            user_id: "user-1".to_string(),
            items: Vec::new(),
        };
        cart.add(&catalog, &DishId::new("d1"), &RestaurantId::new("r1"));
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.user_id.is_empty());
    }
}
