//! Durable persistence of the `{credential, user}` pair.
//!
//! The store is a small key-value area with two fixed keys. Readers treat
//! any missing, corrupt or outdated entry as "no stored session"; the gate
//! never sees a load error.
//!
//! Backends:
//! - `FileSessionStore`: one file per key under the cache directory
//! - `KeyringSessionStore`: OS keychain entries
//! - `MemorySessionStore`: process-local, for embedding and tests

pub mod file;
pub mod keychain;
pub mod memory;

pub use file::FileSessionStore;
pub use keychain::KeyringSessionStore;
pub use memory::MemorySessionStore;

use tracing::warn;

use crate::error::StoreError;
use crate::models::{Credential, UserProfile};

/// Key under which the bearer credential is stored
pub const CREDENTIAL_KEY: &str = "auth_token";

/// Key under which the serialized user profile is stored
pub const USER_KEY: &str = "auth_user";

/// A persisted session as read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub credential: Credential,
    pub user: UserProfile,
}

pub trait SessionStore: Send + Sync {
    /// Load the stored session, or `None` if absent or undecodable.
    fn load(&self) -> Option<StoredSession>;

    /// Persist a credential and user, replacing whatever was stored.
    fn save(&self, credential: &Credential, user: &UserProfile) -> Result<(), StoreError>;

    /// Remove both entries. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Decode the raw entries of a store into a session.
///
/// Shared by the string-valued backends so they agree on what counts as
/// corrupt.
pub(crate) fn decode_entries(credential: Option<String>, user: Option<String>) -> Option<StoredSession> {
    let credential = credential?.trim().to_string();
    let user = user?;

    if credential.is_empty() {
        warn!("Stored credential is empty, ignoring stored session");
        return None;
    }

    match serde_json::from_str::<UserProfile>(&user) {
        Ok(user) => Some(StoredSession {
            credential: Credential::new(credential),
            user,
        }),
        Err(e) => {
            warn!(error = %e, "Stored user is corrupt, ignoring stored session");
            None
        }
    }
}
