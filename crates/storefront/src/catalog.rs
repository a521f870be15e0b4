//! Catalog reference collections and derived views.
//!
//! The catalog holds the three read-only collections fetched from the
//! backend (dishes, restaurants, dish-availability) and answers every
//! question the views ask of them: pair resolution, cheapest-price lookups,
//! join views, search, and filtered/sorted dish lists. Nothing here mutates
//! the source collections; derived views are built fresh on each call.

use food_mood_core::{AvailabilityId, DishId, RestaurantId};

use crate::api::types::{Dish, DishAvailability, Restaurant};

/// The fetched reference collections.
///
/// Collections are replaced wholesale when a catalog fetch succeeds; a
/// failed fetch leaves the previous contents untouched.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    dishes: Vec<Dish>,
    restaurants: Vec<Restaurant>,
    availability: Vec<DishAvailability>,
}

impl Catalog {
    /// Create a catalog from already-fetched collections.
    #[must_use]
    pub const fn new(
        dishes: Vec<Dish>,
        restaurants: Vec<Restaurant>,
        availability: Vec<DishAvailability>,
    ) -> Self {
        Self {
            dishes,
            restaurants,
            availability,
        }
    }

    /// All dishes.
    #[must_use]
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    /// All restaurants.
    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// All availability records.
    #[must_use]
    pub fn availability(&self) -> &[DishAvailability] {
        &self.availability
    }

    /// Replace the dish collection.
    pub fn set_dishes(&mut self, dishes: Vec<Dish>) {
        self.dishes = dishes;
    }

    /// Replace the restaurant collection.
    pub fn set_restaurants(&mut self, restaurants: Vec<Restaurant>) {
        self.restaurants = restaurants;
    }

    /// Replace the availability collection.
    pub fn set_availability(&mut self, availability: Vec<DishAvailability>) {
        self.availability = availability;
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find a dish by id.
    #[must_use]
    pub fn dish(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|dish| &dish.id == id)
    }

    /// Find a restaurant by id.
    #[must_use]
    pub fn restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| &restaurant.id == id)
    }

    /// Find an availability record by its own id.
    #[must_use]
    pub fn availability_by_id(&self, id: &AvailabilityId) -> Option<&DishAvailability> {
        self.availability.iter().find(|record| &record.id == id)
    }

    /// Resolve the availability record for a dish/restaurant pair.
    ///
    /// Returns `None` when the dish is not offered at that restaurant; every
    /// cart operation funnels through this lookup.
    #[must_use]
    pub fn find_availability(
        &self,
        dish_id: &DishId,
        restaurant_id: &RestaurantId,
    ) -> Option<&DishAvailability> {
        self.availability
            .iter()
            .find(|record| &record.dish_id == dish_id && &record.restaurant_id == restaurant_id)
    }

    /// All availability records for a dish.
    pub fn availability_for_dish<'a>(
        &'a self,
        dish_id: &DishId,
    ) -> impl Iterator<Item = &'a DishAvailability> + use<'a> {
        let dish_id = dish_id.clone();
        self.availability
            .iter()
            .filter(move |record| record.dish_id == dish_id)
    }

    /// The minimum price across all availability records for a dish.
    ///
    /// `None` when the dish has no availability; callers must guard the
    /// missing-price case explicitly.
    #[must_use]
    pub fn cheapest_price(&self, dish_id: &DishId) -> Option<f64> {
        self.availability_for_dish(dish_id)
            .map(|record| record.price)
            .min_by(f64::total_cmp)
    }

    /// The availability record with the lowest price for a dish.
    ///
    /// Used to add a recommended dish at its cheapest restaurant.
    #[must_use]
    pub fn cheapest_availability(&self, dish_id: &DishId) -> Option<&DishAvailability> {
        self.availability_for_dish(dish_id)
            .min_by(|a, b| f64::total_cmp(&a.price, &b.price))
    }

    // =========================================================================
    // Join Views
    // =========================================================================

    /// Restaurants serving a dish, with the per-offer price.
    ///
    /// Offers whose restaurant is missing from the catalog are skipped.
    #[must_use]
    pub fn restaurants_serving(&self, dish_id: &DishId) -> Vec<(&Restaurant, f64)> {
        self.availability_for_dish(dish_id)
            .filter_map(|record| {
                self.restaurant(&record.restaurant_id)
                    .map(|restaurant| (restaurant, record.price))
            })
            .collect()
    }

    /// A restaurant's menu: each dish offered there with its price.
    ///
    /// Offers whose dish is missing from the catalog are skipped.
    #[must_use]
    pub fn menu_for(&self, restaurant_id: &RestaurantId) -> Vec<(&Dish, f64)> {
        self.availability
            .iter()
            .filter(|record| &record.restaurant_id == restaurant_id)
            .filter_map(|record| self.dish(&record.dish_id).map(|dish| (dish, record.price)))
            .collect()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Dishes whose name contains the query (case-insensitive).
    #[must_use]
    pub fn search_dishes(&self, query: &str) -> Vec<&Dish> {
        let query = query.to_lowercase();
        self.dishes
            .iter()
            .filter(|dish| dish.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Restaurants whose name or cuisine contains the query
    /// (case-insensitive).
    #[must_use]
    pub fn search_restaurants(&self, query: &str) -> Vec<&Restaurant> {
        let query = query.to_lowercase();
        self.restaurants
            .iter()
            .filter(|restaurant| {
                restaurant.name.to_lowercase().contains(&query)
                    || restaurant.cuisine_type.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Search-bar suggestions: matching dish names followed by matching
    /// restaurant names.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        self.dishes
            .iter()
            .filter(|dish| dish.name.to_lowercase().contains(&query))
            .map(|dish| dish.name.clone())
            .chain(
                self.restaurants
                    .iter()
                    .filter(|restaurant| restaurant.name.to_lowercase().contains(&query))
                    .map(|restaurant| restaurant.name.clone()),
            )
            .collect()
    }
}

// =============================================================================
// Filtering and Sorting
// =============================================================================

/// Price ordering for dish lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSort {
    /// Keep the source order.
    #[default]
    None,
    /// Cheapest first.
    LowToHigh,
    /// Most expensive first.
    HighToLow,
}

/// Filter settings for dish list views.
#[derive(Debug, Clone, Copy, Default)]
pub struct DishFilter {
    /// Exclude non-vegetarian dishes.
    pub vegetarian_only: bool,
    /// Exclude dishes below this calorie count.
    pub min_calories: u32,
    /// Price ordering applied after filtering.
    pub sort: PriceSort,
}

impl DishFilter {
    fn keeps(&self, dish: &Dish) -> bool {
        if self.vegetarian_only && !dish.vegetarian {
            return false;
        }
        dish.calories >= self.min_calories
    }
}

/// Sort key for a dish with no availability: it orders as infinitely
/// expensive, matching a minimum over an empty set.
fn price_or_infinity(catalog: &Catalog, dish: &Dish) -> f64 {
    catalog.cheapest_price(&dish.id).unwrap_or(f64::INFINITY)
}

/// Produce a filtered, ordered view of a dish list without mutating the
/// source. Price ordering uses each dish's cheapest availability.
#[must_use]
pub fn filter_and_sort<'a>(
    catalog: &Catalog,
    dishes: impl IntoIterator<Item = &'a Dish>,
    filter: &DishFilter,
) -> Vec<&'a Dish> {
    let mut view: Vec<&Dish> = dishes
        .into_iter()
        .filter(|dish| filter.keeps(dish))
        .collect();

    match filter.sort {
        PriceSort::None => {}
        PriceSort::LowToHigh => view.sort_by(|a, b| {
            f64::total_cmp(&price_or_infinity(catalog, a), &price_or_infinity(catalog, b))
        }),
        PriceSort::HighToLow => view.sort_by(|a, b| {
            f64::total_cmp(&price_or_infinity(catalog, b), &price_or_infinity(catalog, a))
        }),
    }

    view
}

/// Order a priced dish list (e.g. a restaurant menu) in place.
pub fn sort_priced(items: &mut [(&Dish, f64)], sort: PriceSort) {
    match sort {
        PriceSort::None => {}
        PriceSort::LowToHigh => items.sort_by(|a, b| f64::total_cmp(&a.1, &b.1)),
        PriceSort::HighToLow => items.sort_by(|a, b| f64::total_cmp(&b.1, &a.1)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::api::types::FlavorGenome;

    pub(crate) fn dish(id: &str, name: &str, vegetarian: bool, calories: u32) -> Dish {
        Dish {
            id: DishId::new(id),
            name: name.to_string(),
            description: String::new(),
            image_url: String::new(),
            calories,
            tags: Vec::new(),
            genome_data: FlavorGenome::default(),
            vegetarian,
            rating: 4.0,
        }
    }

    pub(crate) fn restaurant(id: &str, name: &str, cuisine: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            image_url: String::new(),
            rating: 4.2,
            cuisine_type: cuisine.to_string(),
        }
    }

    pub(crate) fn offer(id: &str, dish_id: &str, restaurant_id: &str, price: f64) -> DishAvailability {
        DishAvailability {
            id: AvailabilityId::new(id),
            dish_id: DishId::new(dish_id),
            restaurant_id: RestaurantId::new(restaurant_id),
            price,
        }
    }

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                dish("d1", "Pad Thai", false, 520),
                dish("d2", "Green Salad", true, 180),
                dish("d3", "Margherita", true, 650),
            ],
            vec![
                restaurant("r1", "Thai Corner", "Thai"),
                restaurant("r2", "Verdura", "Italian"),
            ],
            vec![
                offer("a1", "d1", "r1", 8.0),
                offer("a2", "d1", "r2", 5.0),
                offer("a3", "d1", "r2", 12.0),
                offer("a4", "d2", "r2", 6.5),
            ],
        )
    }

    #[test]
    fn test_find_availability_resolves_pair() {
        let catalog = sample_catalog();
        let record = catalog
            .find_availability(&DishId::new("d1"), &RestaurantId::new("r1"))
            .unwrap();
        assert_eq!(record.id.as_str(), "a1");

        assert!(
            catalog
                .find_availability(&DishId::new("d2"), &RestaurantId::new("r1"))
                .is_none()
        );
    }

    #[test]
    fn test_cheapest_price_is_minimum() {
        let catalog = sample_catalog();
        // d1 is offered at 8.0, 5.0 and 12.0
        assert_eq!(catalog.cheapest_price(&DishId::new("d1")), Some(5.0));
    }

    #[test]
    fn test_cheapest_price_none_without_availability() {
        let catalog = sample_catalog();
        assert_eq!(catalog.cheapest_price(&DishId::new("d3")), None);
    }

    #[test]
    fn test_cheapest_availability_picks_lowest_offer() {
        let catalog = sample_catalog();
        let record = catalog.cheapest_availability(&DishId::new("d1")).unwrap();
        assert_eq!(record.id.as_str(), "a2");
        assert_eq!(record.restaurant_id.as_str(), "r2");
    }

    #[test]
    fn test_restaurants_serving_joins_prices() {
        let catalog = sample_catalog();
        let offers = catalog.restaurants_serving(&DishId::new("d2"));
        assert_eq!(offers.len(), 1);
        let (restaurant, price) = &offers[0];
        assert_eq!(restaurant.name, "Verdura");
        assert!((price - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_menu_for_lists_offered_dishes() {
        let catalog = sample_catalog();
        let menu = catalog.menu_for(&RestaurantId::new("r2"));
        // d1 twice (two offers) and d2 once
        assert_eq!(menu.len(), 3);
        assert!(menu.iter().any(|(dish, _)| dish.id.as_str() == "d2"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search_dishes("pad").len(), 1);
        assert_eq!(catalog.search_restaurants("THAI").len(), 1);
        // cuisine matches too
        assert_eq!(catalog.search_restaurants("italian").len(), 1);
    }

    #[test]
    fn test_suggestions_combine_dishes_and_restaurants() {
        let catalog = sample_catalog();
        let suggestions = catalog.suggestions("r");
        assert!(suggestions.contains(&"Green Salad".to_string()));
        assert!(suggestions.contains(&"Verdura".to_string()));
    }

    #[test]
    fn test_vegetarian_filter_excludes_non_veg_regardless_of_sort() {
        let catalog = sample_catalog();
        for sort in [PriceSort::None, PriceSort::LowToHigh, PriceSort::HighToLow] {
            let filter = DishFilter {
                vegetarian_only: true,
                min_calories: 0,
                sort,
            };
            let view = filter_and_sort(&catalog, catalog.dishes(), &filter);
            assert!(view.iter().all(|dish| dish.vegetarian));
            assert_eq!(view.len(), 2);
        }
    }

    #[test]
    fn test_min_calories_filter() {
        let catalog = sample_catalog();
        let filter = DishFilter {
            vegetarian_only: false,
            min_calories: 500,
            sort: PriceSort::None,
        };
        let view = filter_and_sort(&catalog, catalog.dishes(), &filter);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|dish| dish.calories >= 500));
    }

    #[test]
    fn test_sort_low_to_high_puts_unpriced_dishes_last() {
        let catalog = sample_catalog();
        let filter = DishFilter {
            vegetarian_only: false,
            min_calories: 0,
            sort: PriceSort::LowToHigh,
        };
        let view = filter_and_sort(&catalog, catalog.dishes(), &filter);
        // d1 cheapest at 5.0, d2 at 6.5, d3 has no availability
        let ids: Vec<&str> = view.iter().map(|dish| dish.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn test_sort_high_to_low_reverses_order() {
        let catalog = sample_catalog();
        let filter = DishFilter {
            vegetarian_only: false,
            min_calories: 0,
            sort: PriceSort::HighToLow,
        };
        let view = filter_and_sort(&catalog, catalog.dishes(), &filter);
        let ids: Vec<&str> = view.iter().map(|dish| dish.id.as_str()).collect();
        assert_eq!(ids, vec!["d3", "d1", "d2"]);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let catalog = sample_catalog();
        let filter = DishFilter {
            vegetarian_only: true,
            min_calories: 0,
            sort: PriceSort::LowToHigh,
        };
        let _ = filter_and_sort(&catalog, catalog.dishes(), &filter);
        assert_eq!(catalog.dishes().len(), 3);
        assert_eq!(catalog.dishes()[0].id.as_str(), "d1");
    }

    #[test]
    fn test_sort_priced_menu() {
        let catalog = sample_catalog();
        let mut menu = catalog.menu_for(&RestaurantId::new("r2"));
        sort_priced(&mut menu, PriceSort::LowToHigh);
        let prices: Vec<f64> = menu.iter().map(|(_, price)| *price).collect();
        assert_eq!(prices, vec![5.0, 6.5, 12.0]);
    }
}
