use anyhow::{Context, Result};
use tracing::warn;

use crate::models::UserProfile;
use crate::storage::{KeyValueStorage, StorageScope};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "maison_manoe_token";
/// Storage key for the token type
pub const TOKEN_TYPE_KEY: &str = "maison_manoe_token_type";
/// Storage key for the serialized user profile
pub const USER_KEY: &str = "maison_manoe_user";

/// The only token type the API issues
const TOKEN_TYPE_BEARER: &str = "bearer";

const CREDENTIAL_KEYS: [&str; 3] = [TOKEN_KEY, TOKEN_TYPE_KEY, USER_KEY];

struct ScopeEntry {
    scope: StorageScope,
    store: Box<dyn KeyValueStorage>,
}

/// Session state over an ordered list of storage scopes.
///
/// The three credential keys always live together in one scope. Reads check
/// the durable scope first and fall back to the ephemeral one; getters never
/// fail — a scope that errors or holds malformed data reads as absent.
pub struct SessionStore {
    scopes: Vec<ScopeEntry>,
}

impl SessionStore {
    pub fn new(durable: Box<dyn KeyValueStorage>, ephemeral: Box<dyn KeyValueStorage>) -> Self {
        Self {
            scopes: vec![
                ScopeEntry {
                    scope: StorageScope::Durable,
                    store: durable,
                },
                ScopeEntry {
                    scope: StorageScope::Ephemeral,
                    store: ephemeral,
                },
            ],
        }
    }

    /// First scope holding `key`, in precedence order.
    fn read(&self, key: &str) -> Option<String> {
        for entry in &self.scopes {
            match entry.store.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(e) => {
                    warn!(key, scope = %entry.scope, error = %e, "Storage read failed, treating as absent");
                }
            }
        }
        None
    }

    fn store_for(&self, scope: StorageScope) -> &dyn KeyValueStorage {
        // Both scopes are installed by the constructor
        self.scopes
            .iter()
            .find(|entry| entry.scope == scope)
            .map(|entry| entry.store.as_ref())
            .unwrap_or_else(|| self.scopes[0].store.as_ref())
    }

    /// The stored bearer token, if any. No side effects.
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// The stored token type, defaulting to `"bearer"`.
    pub fn token_type(&self) -> String {
        self.read(TOKEN_TYPE_KEY)
            .unwrap_or_else(|| TOKEN_TYPE_BEARER.to_string())
    }

    /// The cached user profile. A missing or malformed cache entry reads as
    /// absent.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Malformed cached user profile, treating as absent");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store the credential in the scope selected by `persist` (durable when
    /// true). The other scope is left untouched; `clear_auth` purges both.
    pub fn set_auth(&self, token: &str, user: Option<&UserProfile>, persist: bool) -> Result<()> {
        let scope = if persist {
            StorageScope::Durable
        } else {
            StorageScope::Ephemeral
        };
        let store = self.store_for(scope);
        store
            .set(TOKEN_KEY, token)
            .context("Failed to store token")?;
        store
            .set(TOKEN_TYPE_KEY, TOKEN_TYPE_BEARER)
            .context("Failed to store token type")?;
        if let Some(user) = user {
            let serialized = serde_json::to_string(user)?;
            store
                .set(USER_KEY, &serialized)
                .context("Failed to store user profile")?;
        }
        Ok(())
    }

    /// Remove the credential from every scope. Idempotent; scopes that fail
    /// are still all attempted.
    pub fn clear_auth(&self) -> Result<()> {
        let mut first_error = None;
        for entry in &self.scopes {
            for key in CREDENTIAL_KEYS {
                if let Err(e) = entry.store.remove(key) {
                    warn!(key, scope = %entry.scope, error = %e, "Failed to remove credential key");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            None => Ok(()),
            Some(e) => Err(e.context("Failed to clear session state")),
        }
    }

    /// Overwrite the cached profile in whichever scope currently holds the
    /// token, falling back to the last scope when none does.
    pub fn cache_user(&self, user: &UserProfile) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        let holder = self
            .scopes
            .iter()
            .find(|entry| matches!(entry.store.get(TOKEN_KEY), Ok(Some(_))))
            .or_else(|| self.scopes.last());
        if let Some(entry) = holder {
            entry
                .store
                .set(USER_KEY, &serialized)
                .context("Failed to cache user profile")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    fn memory_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new()))
    }

    fn sample_user() -> UserProfile {
        UserProfile {
            email: "jean.dupont@example.com".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_auth_then_getters() {
        let session = memory_store();
        session.set_auth("T", Some(&sample_user()), true).unwrap();

        assert_eq!(session.token(), Some("T".to_string()));
        assert_eq!(session.token_type(), "bearer");
        assert_eq!(
            session.current_user().map(|u| u.email),
            Some("jean.dupont@example.com".to_string())
        );
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let session = memory_store();
        assert_eq!(session.token_type(), "bearer");
    }

    #[test]
    fn test_durable_scope_wins_read_precedence() {
        let session = memory_store();
        session.set_auth("ephemeral-token", None, false).unwrap();
        session.set_auth("durable-token", None, true).unwrap();

        assert_eq!(session.token(), Some("durable-token".to_string()));
    }

    #[test]
    fn test_clear_auth_is_idempotent_across_scopes() {
        let session = memory_store();
        session.set_auth("T1", Some(&sample_user()), true).unwrap();
        session.set_auth("T2", Some(&sample_user()), false).unwrap();

        session.clear_auth().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.current_user(), None);
        assert!(!session.is_authenticated());

        // Clearing an already-empty session is fine
        session.clear_auth().unwrap();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_is_authenticated_tracks_token_presence() {
        let session = memory_store();
        assert!(!session.is_authenticated());

        session.set_auth("T", None, false).unwrap();
        assert!(session.is_authenticated());

        session.clear_auth().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_persisted_session_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        let session = SessionStore::new(
            Box::new(FileStorage::new(dir.path().to_path_buf())),
            Box::new(MemoryStorage::new()),
        );
        session.set_auth("T", Some(&sample_user()), true).unwrap();
        drop(session);

        // Simulated restart: fresh file handle, fresh (empty) ephemeral scope
        let reloaded = SessionStore::new(
            Box::new(FileStorage::new(dir.path().to_path_buf())),
            Box::new(MemoryStorage::new()),
        );
        assert_eq!(reloaded.token(), Some("T".to_string()));
        assert!(reloaded.current_user().is_some());
    }

    #[test]
    fn test_ephemeral_session_does_not_survive_reload() {
        let dir = tempfile::tempdir().unwrap();

        let session = SessionStore::new(
            Box::new(FileStorage::new(dir.path().to_path_buf())),
            Box::new(MemoryStorage::new()),
        );
        session.set_auth("T", Some(&sample_user()), false).unwrap();
        drop(session);

        let reloaded = SessionStore::new(
            Box::new(FileStorage::new(dir.path().to_path_buf())),
            Box::new(MemoryStorage::new()),
        );
        assert_eq!(reloaded.token(), None);
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_malformed_cached_profile_reads_as_absent() {
        let durable = MemoryStorage::new();
        durable.set(USER_KEY, "{broken json").unwrap();
        let session = SessionStore::new(Box::new(durable), Box::new(MemoryStorage::new()));

        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_cache_user_targets_token_holding_scope() {
        let session = memory_store();
        session.set_auth("T", None, true).unwrap();

        session.cache_user(&sample_user()).unwrap();
        assert!(session.current_user().is_some());

        // The profile landed next to the token: a durable-only reload keeps both
        session.clear_auth().unwrap();
        session.set_auth("T", None, false).unwrap();
        session.cache_user(&sample_user()).unwrap();
        assert_eq!(
            session.current_user().map(|u| u.first_name),
            Some("Jean".to_string())
        );
    }

    #[test]
    fn test_cache_user_falls_back_to_ephemeral_without_token() {
        let session = memory_store();
        session.cache_user(&sample_user()).unwrap();
        // No token, so still unauthenticated, but the profile is readable
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_some());
    }

    #[test]
    fn test_set_auth_without_user_keeps_prior_cache_untouched() {
        let session = memory_store();
        session.set_auth("T1", Some(&sample_user()), true).unwrap();
        session.set_auth("T2", None, true).unwrap();

        // Token rotated, cached profile from the first login remains
        assert_eq!(session.token(), Some("T2".to_string()));
        assert!(session.current_user().is_some());
    }
}
