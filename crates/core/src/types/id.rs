//! Newtype IDs for type-safe entity references.
//!
//! The backend issues opaque string identifiers for every document. Use the
//! `define_id!` macro to create type-safe wrappers around them so a dish id
//! can never be passed where a restaurant id is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use food_mood_core::define_id;
/// define_id!(DishId);
/// define_id!(RestaurantId);
///
/// let dish_id = DishId::new("661f0a2b9c8d");
/// let restaurant_id = RestaurantId::new("661f0a2b9c8d");
///
/// // These are different types, so this won't compile:
/// // let _: DishId = restaurant_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(DishId);
define_id!(RestaurantId);
define_id!(AvailabilityId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        let a = DishId::new("abc123");
        let b = DishId::from("abc123");
        assert_eq!(a, b);
        assert_ne!(a, DishId::new("def456"));
    }

    #[test]
    fn test_id_display() {
        let id = RestaurantId::new("661f0a2b9c8d");
        assert_eq!(format!("{id}"), "661f0a2b9c8d");
        assert_eq!(id.as_str(), "661f0a2b9c8d");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = AvailabilityId::new("avail-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"avail-1\"");

        let parsed: AvailabilityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_into_inner() {
        let id = UserId::new("user-9");
        assert_eq!(id.into_inner(), "user-9");
    }
}
