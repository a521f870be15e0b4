//! Local durable client storage.
//!
//! The browser-profile equivalent for the gateway: cart, recommendations,
//! and the session token live as JSON files under the configured data
//! directory and are rehydrated on startup. Loads treat a missing or
//! unreadable file as "nothing saved" (logged, never fatal); clears are
//! idempotent. The backend never sees any of this until checkout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::api::types::Dish;
use crate::cart::Cart;

const CART_FILE: &str = "cart.json";
const RECOMMENDATIONS_FILE: &str = "recommendations.json";
const SESSION_FILE: &str = "session.json";

/// Errors that can occur while persisting client state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// State could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persisted session record (the bearer token).
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct StoredSession {
    pub token: String,
}

/// File-backed store for client state.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open (creating if necessary) the store at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Load a JSON file, treating missing or unreadable content as absent.
    fn load_json<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.path(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read saved state");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unparsable saved state");
                None
            }
        }
    }

    /// Serialize a value to a JSON file.
    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        fs::write(self.path(file), raw)?;
        Ok(())
    }

    /// Remove a file, succeeding when it was already absent.
    fn clear_file(&self, file: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(file)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Load the saved cart, if any.
    #[must_use]
    pub fn load_cart(&self) -> Option<Cart> {
        self.load_json(CART_FILE)
    }

    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        self.save_json(CART_FILE, cart)
    }

    /// Delete the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear_cart(&self) -> Result<(), StorageError> {
        self.clear_file(CART_FILE)
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Load the saved recommendations, if any.
    #[must_use]
    pub fn load_recommendations(&self) -> Option<Vec<Dish>> {
        self.load_json(RECOMMENDATIONS_FILE)
    }

    /// Persist the recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written.
    pub fn save_recommendations(&self, recommendations: &[Dish]) -> Result<(), StorageError> {
        self.save_json(RECOMMENDATIONS_FILE, &recommendations)
    }

    /// Delete the saved recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear_recommendations(&self) -> Result<(), StorageError> {
        self.clear_file(RECOMMENDATIONS_FILE)
    }

    // =========================================================================
    // Session Token
    // =========================================================================

    /// Load the saved session token, if any.
    #[must_use]
    pub fn load_session(&self) -> Option<StoredSession> {
        self.load_json(SESSION_FILE)
    }

    /// Persist the session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn save_session(&self, session: &StoredSession) -> Result<(), StorageError> {
        self.save_json(SESSION_FILE, session)
    }

    /// Delete the saved session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.clear_file(SESSION_FILE)
    }

    /// Directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use food_mood_core::AvailabilityId;

    fn test_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("client-state")).unwrap();
        (dir, store)
    }

    fn sample_cart() -> Cart {
        Cart {
            user_id: "user-1".to_string(),
            items: vec![CartItem {
                dish_availability_id: AvailabilityId::new("a1"),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = LocalStore::open(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_cart_roundtrip() {
        let (_dir, store) = test_store();
        store.save_cart(&sample_cart()).unwrap();

        let loaded = store.load_cart().unwrap();
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.items, sample_cart().items);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let (_dir, store) = test_store();
        assert!(store.load_cart().is_none());
        assert!(store.load_recommendations().is_none());
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_corrupt_file_treated_as_absent() {
        let (_dir, store) = test_store();
        fs::write(store.dir().join(CART_FILE), "{not json").unwrap();
        assert!(store.load_cart().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = test_store();
        store.save_cart(&sample_cart()).unwrap();
        store.clear_cart().unwrap();
        store.clear_cart().unwrap();
        assert!(store.load_cart().is_none());
    }

    #[test]
    fn test_session_roundtrip() {
        let (_dir, store) = test_store();
        store
            .save_session(&StoredSession {
                token: "abc.def.ghi".to_string(),
            })
            .unwrap();
        let loaded = store.load_session().unwrap();
        assert_eq!(loaded.token, "abc.def.ghi");
    }

    #[test]
    fn test_recommendations_roundtrip() {
        let (_dir, store) = test_store();
        let dishes = vec![crate::catalog::tests::dish("d1", "Pad Thai", false, 520)];
        store.save_recommendations(&dishes).unwrap();
        let loaded = store.load_recommendations().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Pad Thai");
    }
}
