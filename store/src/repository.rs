//! Typed access to the well-known keys.
//!
//! The profile is stored as an envelope `{ "schemaVersion": N, "profile": {...} }`.
//! Version 1 is the legacy shape: the bare payload with no envelope. Legacy
//! values are upgraded on read and written back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::kv::KeyValueStore;

/// Current envelope version written by `save_profile`.
pub const PROFILE_SCHEMA_VERSION: u32 = 2;

const LEGACY_SCHEMA_VERSION: u32 = 1;

/// A profile payload read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProfile {
    /// Version found in storage before any migration.
    pub schema_version: u32,
    pub profile: Value,
}

impl StoredProfile {
    pub fn was_migrated(&self) -> bool {
        self.schema_version < PROFILE_SCHEMA_VERSION
    }
}

/// Signed-in user details kept alongside the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_role: Option<String>,
    pub token: Option<String>,
}

/// Repository over a `KeyValueStore`.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ── Profile ──────────────────────────────────────────────────────────

    /// Persist a profile payload under the current schema version.
    pub fn save_profile(&self, profile: &Value) -> Result<()> {
        let envelope = json!({
            "schemaVersion": PROFILE_SCHEMA_VERSION,
            "profile": profile,
        });
        self.store
            .set(keys::FREELANCER_PROFILE, &serde_json::to_string(&envelope)?)
    }

    /// Read the stored profile, upgrading legacy shapes.
    ///
    /// Returns `Ok(None)` when nothing (or JSON `null`) is stored.
    pub fn load_profile(&self) -> Result<Option<StoredProfile>> {
        let Some(raw) = self.store.get(keys::FREELANCER_PROFILE)? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)?;
        let Some(stored) = decode_envelope(value)? else {
            return Ok(None);
        };

        if stored.was_migrated() {
            tracing::debug!(
                from = stored.schema_version,
                to = PROFILE_SCHEMA_VERSION,
                "upgrading stored profile"
            );
            self.save_profile(&stored.profile)?;
        }
        Ok(Some(stored))
    }

    pub fn clear_profile(&self) -> Result<()> {
        self.store.remove(keys::FREELANCER_PROFILE)?;
        self.store.remove(keys::PROFILE_SUBMITTED)
    }

    pub fn mark_submitted(&self, submitted: bool) -> Result<()> {
        let value = if submitted { "true" } else { "false" };
        self.store.set(keys::PROFILE_SUBMITTED, value)
    }

    /// Anything other than the literal `"true"` reads as not submitted.
    pub fn is_submitted(&self) -> Result<bool> {
        Ok(self
            .store
            .get(keys::PROFILE_SUBMITTED)?
            .is_some_and(|v| v.trim() == "true"))
    }

    // ── Session ──────────────────────────────────────────────────────────

    pub fn session(&self) -> Result<Session> {
        Ok(Session {
            user_name: self.non_empty(keys::USER_NAME)?,
            user_email: self.non_empty(keys::USER_EMAIL)?,
            user_role: self.non_empty(keys::USER_ROLE)?,
            token: self.non_empty(keys::TOKEN)?,
        })
    }

    /// Write the populated fields of `session`. `None` fields are left as-is.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let fields = [
            (keys::USER_NAME, &session.user_name),
            (keys::USER_EMAIL, &session.user_email),
            (keys::USER_ROLE, &session.user_role),
            (keys::TOKEN, &session.token),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                self.store.set(key, value)?;
            }
        }
        Ok(())
    }

    pub fn clear_user_email(&self) -> Result<()> {
        self.store.remove(keys::USER_EMAIL)
    }

    pub fn clear_session(&self) -> Result<()> {
        for key in keys::SESSION_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.non_empty(keys::TOKEN)
    }

    fn non_empty(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .get(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

fn decode_envelope(value: Value) -> Result<Option<StoredProfile>> {
    if value.is_null() {
        return Ok(None);
    }

    let version = value
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok());

    match version {
        Some(found) if found > PROFILE_SCHEMA_VERSION => Err(StoreError::UnsupportedSchema {
            found,
            supported: PROFILE_SCHEMA_VERSION,
        }),
        Some(found) => {
            let profile = match value {
                Value::Object(mut map) => map.remove("profile").unwrap_or(Value::Null),
                _ => Value::Null,
            };
            if profile.is_null() {
                return Ok(None);
            }
            Ok(Some(StoredProfile {
                schema_version: found,
                profile,
            }))
        }
        None => Ok(Some(StoredProfile {
            schema_version: LEGACY_SCHEMA_VERSION,
            profile: value,
        })),
    }
}
