//! Durable session state: who is logged in and with what credential.
//!
//! The store is the single owner of the credential token and identity. It
//! restores them from a JSON state file at startup and fails open to "no
//! session" when the file is missing, incomplete, or unparseable.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use api_types::auth::Identity;

use crate::error::Result;

const DEFAULT_SESSION_PATH: &str = "config/session.json";

/// A live session: the opaque credential token plus the identity it proves.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

/// On-disk blob. Both entries must be present for a restore to succeed.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    token: Option<String>,
    user: Option<Identity>,
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Opens the store at `path`, restoring any persisted session.
    ///
    /// A corrupt state file is removed so the next restore starts clean.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = restore(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Stores the session in memory and on disk.
    ///
    /// The in-memory session is visible to the gateway immediately, even if
    /// persisting it fails.
    pub fn establish(&self, token: String, identity: Identity) -> Result<()> {
        let session = Session { token, identity };
        let stored = StoredSession {
            token: Some(session.token.clone()),
            user: Some(session.identity.clone()),
        };
        *lock(&self.current) = Some(session);
        persist(&self.path, &stored)
    }

    /// Drops the session from memory and disk. Used by logout and by
    /// credential-rejection recovery.
    pub fn clear(&self) -> Result<()> {
        *lock(&self.current) = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn current(&self) -> Option<Session> {
        lock(&self.current).clone()
    }
}

fn lock<'a>(current: &'a Mutex<Option<Session>>) -> std::sync::MutexGuard<'a, Option<Session>> {
    // Never poisoned: no code path panics while holding the guard.
    current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn restore(path: &Path) -> Option<Session> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read session state");
            return None;
        }
    };

    let stored: StoredSession = match serde_json::from_str(&content) {
        Ok(stored) => stored,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "discarding corrupt session state");
            let _ = fs::remove_file(path);
            return None;
        }
    };

    match (stored.token, stored.user) {
        (Some(token), Some(identity)) => Some(Session { token, identity }),
        _ => {
            let _ = fs::remove_file(path);
            None
        }
    }
}

fn persist(path: &Path, stored: &StoredSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(stored)?;
    fs::write(path, payload)?;
    Ok(())
}

pub fn default_session_path() -> &'static str {
    DEFAULT_SESSION_PATH
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::auth::Role;

    fn identity() -> Identity {
        Identity {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            role: Role::Member,
            can_edit: true,
            requires_password_change: false,
        }
    }

    fn temp_state_path() -> PathBuf {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_sessions");
        std::fs::create_dir_all(&root).unwrap();
        root.join(format!("session_{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn establish_then_reopen_restores_the_session() {
        let path = temp_state_path();

        let store = SessionStore::open(&path);
        assert!(store.current().is_none());
        store.establish("T1".to_string(), identity()).unwrap();

        let reopened = SessionStore::open(&path);
        let session = reopened.current().unwrap();
        assert_eq!(session.token, "T1");
        assert_eq!(session.identity.name, "Ana");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn clear_removes_memory_and_disk() {
        let path = temp_state_path();

        let store = SessionStore::open(&path);
        store.establish("T1".to_string(), identity()).unwrap();
        store.clear().unwrap();

        assert!(store.current().is_none());
        assert!(!path.exists());
        assert!(SessionStore::open(&path).current().is_none());
    }

    #[test]
    fn corrupt_state_fails_open_to_no_session() {
        let path = temp_state_path();
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.current().is_none());
        // The corrupt blob is discarded so later opens start clean.
        assert!(!path.exists());
    }

    #[test]
    fn partial_state_counts_as_no_session() {
        let path = temp_state_path();
        fs::write(&path, r#"{"token":"T1"}"#).unwrap();

        let store = SessionStore::open(&path);
        assert!(store.current().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn clearing_a_never_persisted_store_is_not_an_error() {
        let store = SessionStore::open(temp_state_path());
        store.clear().unwrap();
    }
}
