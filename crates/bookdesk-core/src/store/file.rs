use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{decode_entries, SessionStore, StoredSession, CREDENTIAL_KEY, USER_KEY};
use crate::error::StoreError;
use crate::models::{Credential, UserProfile};

/// Session store backed by two files in the cache directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read session entry");
                None
            }
        }
    }

    /// Write an entry through a temp file so readers never see half a value.
    fn write_entry(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tmp = self.dir.join(format!("{}.tmp", key));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, self.entry_path(key))?;
        Ok(())
    }

    fn remove_entry(path: &Path) -> Result<(), StoreError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<StoredSession> {
        let stored = decode_entries(self.read_entry(CREDENTIAL_KEY), self.read_entry(USER_KEY));
        debug!(found = stored.is_some(), dir = %self.dir.display(), "Session store loaded");
        stored
    }

    fn save(&self, credential: &Credential, user: &UserProfile) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let user = serde_json::to_string_pretty(user)?;
        let result = self
            .write_entry(CREDENTIAL_KEY, credential.as_str())
            .and_then(|()| self.write_entry(USER_KEY, &user));
        if result.is_err() {
            // Never leave a credential paired with someone else's profile
            if let Err(e) = self.clear() {
                warn!(error = %e, "Failed to clear session after partial save");
            }
        }
        result
    }

    fn clear(&self) -> Result<(), StoreError> {
        Self::remove_entry(&self.entry_path(CREDENTIAL_KEY))?;
        Self::remove_entry(&self.entry_path(USER_KEY))?;
        Ok(())
    }
}
