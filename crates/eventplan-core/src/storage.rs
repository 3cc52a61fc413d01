//! Session persistence
//!
//! The session is two entries in a key-value store: the raw auth token and
//! the JSON-serialized user profile. [`SledSessionStore`] keeps them in an
//! embedded sled database so they survive restarts; [`MemorySessionStore`]
//! keeps them in memory.
//!
//! The `try_*` primitives surface failures as [`AppError`]. The best-effort
//! operations built on top never fail: a storage error is logged and read as
//! "no value", the same way a missing entry is.

use crate::error::{AppError, Result};
use crate::session::Session;
use sled::Db;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key of the raw auth token
pub const TOKEN_KEY: &str = "ep_token";

/// Key of the JSON-serialized user profile
pub const USER_KEY: &str = "ep_user";

const SESSION_TREE: &str = "session";

/// Durable storage for the current [`Session`]
pub trait SessionStore: Send + Sync {
    /// Read the raw token and serialized profile
    fn try_read_raw(&self) -> Result<(Option<String>, Option<Vec<u8>>)>;

    /// Persist both entries; `None` removes the entry
    fn try_write_raw(&self, token: Option<&str>, user: Option<&[u8]>) -> Result<()>;

    /// Read the session, failing on storage errors.
    ///
    /// A stored profile that does not deserialize reads as absent.
    fn try_read(&self) -> Result<Session> {
        let (token, user_bytes) = self.try_read_raw()?;
        let user = user_bytes.and_then(|bytes| match serde_json::from_slice(&bytes) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring malformed stored user profile: {}", e);
                None
            }
        });
        Ok(Session { token, user })
    }

    /// Persist the session, failing on storage errors.
    ///
    /// Empty tokens are treated as absent.
    fn try_write(&self, session: &Session) -> Result<()> {
        let token = session.token.as_deref().filter(|t| !t.is_empty());
        let user = session
            .user
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()?;
        self.try_write_raw(token, user.as_deref())
    }

    fn try_clear(&self) -> Result<()> {
        self.try_write_raw(None, None)
    }

    /// Best-effort read; storage failures yield an empty session
    fn read_session(&self) -> Session {
        self.try_read().unwrap_or_else(|e| {
            tracing::warn!("Failed to read session: {}", e);
            Session::default()
        })
    }

    /// Best-effort write; storage failures are logged and dropped
    fn write_session(&self, session: &Session) {
        if let Err(e) = self.try_write(session) {
            tracing::warn!("Failed to write session: {}", e);
        }
    }

    /// Best-effort clear; equivalent to writing an empty session
    fn clear_session(&self) {
        self.write_session(&Session::default());
    }

    /// Token to attach to outgoing requests, if any
    fn token(&self) -> Option<String> {
        self.read_session().token
    }
}

/// Session store backed by an embedded sled database
pub struct SledSessionStore {
    db: Arc<Db>,
}

impl SledSessionStore {
    /// Open (or create) the session database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(db_path.as_ref())
            .map_err(|e| AppError::StorageError(format!("Failed to open sled database: {e}")))?;

        tracing::debug!("Opened session store at {}", db_path.as_ref().display());
        Ok(Self { db: Arc::new(db) })
    }

    fn tree(&self) -> Result<sled::Tree> {
        self.db
            .open_tree(SESSION_TREE)
            .map_err(|e| AppError::StorageError(format!("Failed to open session tree: {e}")))
    }
}

impl SessionStore for SledSessionStore {
    fn try_read_raw(&self) -> Result<(Option<String>, Option<Vec<u8>>)> {
        let tree = self.tree()?;

        let token = tree
            .get(TOKEN_KEY)
            .map_err(|e| AppError::StorageError(format!("Failed to get token: {e}")))?
            .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
            .filter(|t| !t.is_empty());

        let user = tree
            .get(USER_KEY)
            .map_err(|e| AppError::StorageError(format!("Failed to get user: {e}")))?
            .map(|bytes| bytes.to_vec());

        Ok((token, user))
    }

    fn try_write_raw(&self, token: Option<&str>, user: Option<&[u8]>) -> Result<()> {
        let tree = self.tree()?;

        match token {
            Some(token) => tree.insert(TOKEN_KEY, token.as_bytes()),
            None => tree.remove(TOKEN_KEY),
        }
        .map_err(|e| AppError::StorageError(format!("Failed to store token: {e}")))?;

        match user {
            Some(user) => tree.insert(USER_KEY, user),
            None => tree.remove(USER_KEY),
        }
        .map_err(|e| AppError::StorageError(format!("Failed to store user: {e}")))?;

        self.db
            .flush()
            .map_err(|e| AppError::StorageError(format!("Failed to flush database: {e}")))?;

        tracing::debug!(
            "Stored session (token: {}, user: {})",
            token.is_some(),
            user.is_some()
        );
        Ok(())
    }
}

/// In-memory session store; nothing survives the process
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<(Option<String>, Option<Vec<u8>>)>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing session
    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        store.write_session(session);
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn try_read_raw(&self) -> Result<(Option<String>, Option<Vec<u8>>)> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::StorageError("Session store lock poisoned".to_string()))?;
        Ok(entries.clone())
    }

    fn try_write_raw(&self, token: Option<&str>, user: Option<&[u8]>) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::StorageError("Session store lock poisoned".to_string()))?;
        *entries = (token.map(str::to_string), user.map(<[u8]>::to_vec));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;
    use serde_json::json;
    use tempfile::TempDir;

    fn ann() -> UserProfile {
        UserProfile::named("Ann").with_field("email", json!("ann@example.com"))
    }

    #[test]
    fn test_sled_write_then_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledSessionStore::open(temp_dir.path()).unwrap();

        let session = Session::new(Some("abc".to_string()), Some(ann()));
        store.write_session(&session);

        assert_eq!(store.read_session(), session);
    }

    #[test]
    fn test_sled_session_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new(Some("abc".to_string()), Some(ann()));

        {
            let store = SledSessionStore::open(temp_dir.path()).unwrap();
            store.write_session(&session);
        }

        let reopened = SledSessionStore::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.read_session(), session);
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn try_read_raw(&self) -> Result<(Option<String>, Option<Vec<u8>>)> {
            Err(AppError::StorageError("disk unplugged".to_string()))
        }

        fn try_write_raw(&self, _token: Option<&str>, _user: Option<&[u8]>) -> Result<()> {
            Err(AppError::StorageError("disk unplugged".to_string()))
        }
    }

    #[test]
    fn test_storage_failures_read_as_no_value() {
        let store = BrokenStore;

        assert!(matches!(store.try_read(), Err(AppError::StorageError(_))));
        assert!(store.try_clear().is_err());

        store.write_session(&Session::new(Some("abc".to_string()), Some(ann())));
        store.clear_session();
        assert_eq!(store.read_session(), Session::default());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_sled_clear_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledSessionStore::open(temp_dir.path()).unwrap();

        store.write_session(&Session::new(Some("abc".to_string()), Some(ann())));
        store.clear_session();

        assert_eq!(store.read_session(), Session::default());
    }

    #[test]
    fn test_absent_field_clears_only_that_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledSessionStore::open(temp_dir.path()).unwrap();

        store.write_session(&Session::new(Some("abc".to_string()), Some(ann())));
        store.write_session(&Session::new(None, Some(ann())));

        let session = store.read_session();
        assert!(session.token.is_none());
        assert_eq!(session.user, Some(ann()));
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledSessionStore::open(temp_dir.path()).unwrap();

        store
            .try_write_raw(Some("abc"), Some(b"{not json"))
            .unwrap();

        let session = store.read_session();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert!(session.user.is_none());
    }

    #[test]
    fn test_empty_token_is_not_stored() {
        let store = MemorySessionStore::new();
        store.write_session(&Session::new(Some(String::new()), None));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let session = Session::new(Some("t".to_string()), Some(ann()));
        let store = MemorySessionStore::with_session(&session);
        assert_eq!(store.read_session(), session);

        store.clear_session();
        store.clear_session();
        assert!(store.read_session().is_empty());
    }
}
