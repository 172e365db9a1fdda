//! Persisted preference store.
//!
//! Values are stored as JSON under fixed keys. Writes never fail from the
//! caller's point of view: when the backend is out of space, the user
//! profile is retried with its inline images swapped for remote URLs, and if
//! that still does not fit the in-memory value stays authoritative for the
//! rest of the session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use creth_types::preferences::UserProfile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::storage::Storage;
use crate::{DbError, Result};

/// Keys of the persisted records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Theme,
    Notifications,
    Privacy,
    UserProfile,
    Conversations,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Theme => "theme",
            PreferenceKey::Notifications => "notifications",
            PreferenceKey::Privacy => "privacy",
            PreferenceKey::UserProfile => "user_profile",
            PreferenceKey::Conversations => "conversations",
        }
    }
}

/// How a [`PreferenceStore::save`] call was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written as given.
    Stored,
    /// Written with inline images replaced by remote URLs.
    StoredSlim,
    /// Not written; the change will not survive a reload.
    InMemoryOnly,
}

impl SaveOutcome {
    pub fn is_durable(&self) -> bool {
        !matches!(self, SaveOutcome::InMemoryOnly)
    }
}

/// Shared handle to the preference backend.
///
/// Cloning is cheap; all clones write to the same storage.
#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<Mutex<Box<dyn Storage>>>,
}

impl PreferenceStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    fn backend(&self) -> MutexGuard<'_, Box<dyn Storage>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the value under `key`.
    ///
    /// Returns `None` when nothing is stored, the stored JSON does not parse,
    /// or the backend read fails. Failures are logged.
    pub fn load<T: DeserializeOwned>(&self, key: PreferenceKey) -> Option<T> {
        let raw = match self.backend().get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "preference read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "discarding malformed preference");
                None
            }
        }
    }

    /// Load the value under `key`, falling back to `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: PreferenceKey) -> T {
        self.load(key).unwrap_or_default()
    }

    /// Load the user profile, rejecting records that fail validation.
    pub fn load_profile(&self) -> UserProfile {
        match self.load::<UserProfile>(PreferenceKey::UserProfile) {
            Some(profile) => match profile.validate() {
                Ok(()) => profile,
                Err(e) => {
                    warn!(error = %e, "stored profile invalid, using defaults");
                    UserProfile::default()
                }
            },
            None => UserProfile::default(),
        }
    }

    /// Persist `value` under `key`.
    pub fn save<T: Serialize>(&self, key: PreferenceKey, value: &T) -> SaveOutcome {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                error!(key = key.as_str(), error = %e, "preference not serializable");
                return SaveOutcome::InMemoryOnly;
            }
        };

        match self.write(key, &json) {
            Ok(()) => {
                debug!(key = key.as_str(), "preference saved");
                SaveOutcome::Stored
            }
            Err(DbError::QuotaExceeded { needed, available, .. }) => {
                warn!(
                    key = key.as_str(),
                    needed,
                    available,
                    "storage quota exceeded"
                );
                if key == PreferenceKey::UserProfile {
                    self.save_slim_profile(json)
                } else {
                    SaveOutcome::InMemoryOnly
                }
            }
            Err(e) => {
                error!(key = key.as_str(), error = %e, "preference write failed");
                SaveOutcome::InMemoryOnly
            }
        }
    }

    /// Second attempt for an oversized profile: drop the inline images.
    fn save_slim_profile(&self, json: serde_json::Value) -> SaveOutcome {
        let profile: UserProfile = match serde_json::from_value(json) {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = %e, "profile record has unexpected shape, not retrying");
                return SaveOutcome::InMemoryOnly;
            }
        };
        if !profile.has_embedded_images() {
            error!("profile exceeds quota without inline images");
            return SaveOutcome::InMemoryOnly;
        }

        let slim = profile.without_embedded_images();
        let result = serde_json::to_value(&slim)
            .map_err(|e| DbError::Serialization(e.to_string()))
            .and_then(|json| self.write(PreferenceKey::UserProfile, &json));
        match result {
            Ok(()) => {
                info!(username = %slim.username, "saved slimmed profile without inline images");
                SaveOutcome::StoredSlim
            }
            Err(e) => {
                error!(error = %e, "cannot save even the slimmed profile");
                SaveOutcome::InMemoryOnly
            }
        }
    }

    fn write(&self, key: PreferenceKey, json: &serde_json::Value) -> Result<()> {
        let raw = serde_json::to_string(json).map_err(|e| DbError::Serialization(e.to_string()))?;
        self.backend().set(key.as_str(), &raw)
    }
}
