// SessionStore - Persistent session state using sled
//
// Two values survive restarts:
// - The active node address that node commands route to
// - The flag marking the onboarding help as already shown

use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const ACTIVE_NODE: &[u8] = b"session:active_node";
    pub const HELP_SHOWN: &[u8] = b"session:help_shown";
}

/// Errors from session storage operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to open session database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Stored value is not valid UTF-8")]
    CorruptValue,

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for SessionError {
    fn from(err: sled::Error) -> Self {
        SessionError::DatabaseError(err.to_string())
    }
}

/// Persistent store for the client session.
///
/// Absence of an active node is a valid state (nothing selected yet);
/// callers must refuse to issue node commands in it. Neither value is
/// ever cleared, only overwritten.
pub struct SessionStore {
    db: sled::Db,
}

impl SessionStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let db = sled::open(path).map_err(|e| SessionError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), SessionError> {
        self.db
            .flush()
            .map_err(|e| SessionError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Persist the address node commands route to, replacing any prior value
    pub fn set_active_node(&self, address: &str) -> Result<(), SessionError> {
        self.db.insert(keys::ACTIVE_NODE, address.as_bytes())?;
        self.flush()
    }

    /// Get the active node address, if one was ever selected
    pub fn active_node(&self) -> Result<Option<String>, SessionError> {
        match self.db.get(keys::ACTIVE_NODE)? {
            Some(bytes) => {
                let address = String::from_utf8(bytes.to_vec())
                    .map_err(|_| SessionError::CorruptValue)?;
                Ok(Some(address))
            }
            None => Ok(None),
        }
    }

    /// Record that the onboarding help was shown. Set once, never reset.
    pub fn mark_help_shown(&self) -> Result<(), SessionError> {
        self.db.insert(keys::HELP_SHOWN, &b"true"[..])?;
        self.flush()
    }

    /// Whether the onboarding help was already shown for this profile
    pub fn help_shown(&self) -> Result<bool, SessionError> {
        Ok(self.db.get(keys::HELP_SHOWN)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_active_node_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.active_node().unwrap(), None);

        store.set_active_node("http://localhost:5001").unwrap();
        assert_eq!(
            store.active_node().unwrap(),
            Some("http://localhost:5001".to_string())
        );
    }

    #[test]
    fn test_active_node_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).unwrap();

        store.set_active_node("http://localhost:5001").unwrap();
        store.set_active_node("http://localhost:5002").unwrap();

        assert_eq!(
            store.active_node().unwrap(),
            Some("http://localhost:5002".to_string())
        );
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = SessionStore::open(temp_dir.path()).unwrap();
            store.set_active_node("http://localhost:5001").unwrap();
            store.mark_help_shown().unwrap();
        }

        {
            let store = SessionStore::open(temp_dir.path()).unwrap();
            assert_eq!(
                store.active_node().unwrap(),
                Some("http://localhost:5001".to_string())
            );
            assert!(store.help_shown().unwrap());
        }
    }

    #[test]
    fn test_help_flag_defaults_to_unshown() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).unwrap();

        assert!(!store.help_shown().unwrap());
        store.mark_help_shown().unwrap();
        assert!(store.help_shown().unwrap());
    }
}
