use std::collections::HashMap;
use std::sync::Mutex;

use super::{decode_entries, SessionStore, StoredSession, CREDENTIAL_KEY, USER_KEY};
use crate::error::StoreError;
use crate::models::{Credential, UserProfile};

/// Process-local session store.
///
/// Entries are kept as raw strings so corrupt values can be injected the
/// same way they would appear in a durable backend.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw value under a key.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.lock().insert(key.to_string(), value.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds consistent string entries
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        decode_entries(self.get_raw(CREDENTIAL_KEY), self.get_raw(USER_KEY))
    }

    fn save(&self, credential: &Credential, user: &UserProfile) -> Result<(), StoreError> {
        let user = serde_json::to_string(user)?;
        let mut entries = self.lock();
        entries.insert(CREDENTIAL_KEY.to_string(), credential.as_str().to_string());
        entries.insert(USER_KEY.to_string(), user);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.lock();
        entries.remove(CREDENTIAL_KEY);
        entries.remove(USER_KEY);
        Ok(())
    }
}
