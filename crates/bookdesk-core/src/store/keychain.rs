use keyring::Entry;
use tracing::warn;

use super::{decode_entries, SessionStore, StoredSession, CREDENTIAL_KEY, USER_KEY};
use crate::error::StoreError;
use crate::models::{Credential, UserProfile};

/// Session store backed by the OS keychain.
///
/// Each key is a separate keychain entry under `service`, which callers
/// scope to the backend origin.
pub struct KeyringSessionStore {
    credential: Entry,
    user: Entry,
}

impl KeyringSessionStore {
    pub fn new(service: &str) -> Result<Self, StoreError> {
        Ok(Self {
            credential: Entry::new(service, CREDENTIAL_KEY)?,
            user: Entry::new(service, USER_KEY)?,
        })
    }

    fn read_entry(entry: &Entry, key: &str) -> Option<String> {
        match entry.get_password() {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, key, "Failed to read keychain entry");
                None
            }
        }
    }

    fn delete_entry(entry: &Entry) -> Result<(), StoreError> {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, credential: &Credential, user: &str) -> Result<(), StoreError> {
        self.credential.set_password(credential.as_str())?;
        self.user.set_password(user)?;
        Ok(())
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Option<StoredSession> {
        decode_entries(
            Self::read_entry(&self.credential, CREDENTIAL_KEY),
            Self::read_entry(&self.user, USER_KEY),
        )
    }

    fn save(&self, credential: &Credential, user: &UserProfile) -> Result<(), StoreError> {
        let user = serde_json::to_string(user)?;
        let result = self.write_entries(credential, &user);
        if result.is_err() {
            // Never leave a credential paired with someone else's profile
            if let Err(e) = self.clear() {
                warn!(error = %e, "Failed to clear keychain after partial save");
            }
        }
        result
    }

    fn clear(&self) -> Result<(), StoreError> {
        Self::delete_entry(&self.credential)?;
        Self::delete_entry(&self.user)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use keyring::mock::MockCredential;

    fn mock_store(service: &str) -> KeyringSessionStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringSessionStore::new(service).expect("mock keychain entries")
    }

    fn mock_of(entry: &Entry) -> &MockCredential {
        entry
            .get_credential()
            .downcast_ref::<MockCredential>()
            .expect("mock credential")
    }

    #[test]
    fn test_missing_entries_load_none() {
        let store = mock_store("bookdesk-test-missing");
        assert!(store.load().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_save_load_clear() {
        let store = mock_store("bookdesk-test-cycle");
        let user = UserProfile::new(3, "Ana", Role::Librarian);

        store.save(&Credential::new("h.p.s"), &user).expect("save should succeed");
        let loaded = store.load().expect("stored session");
        assert_eq!(loaded.credential.as_str(), "h.p.s");
        assert_eq!(loaded.user, user);

        store.clear().expect("clear should succeed");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_user_entry_loads_none() {
        let store = mock_store("bookdesk-test-corrupt");
        store.credential.set_password("h.p.s").expect("set credential");
        store.user.set_password("<<garbage>>").expect("set user");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_failed_user_write_clears_both_entries() {
        let store = mock_store("bookdesk-test-partial");
        let first = UserProfile::new(1, "Ana", Role::Admin);
        store.save(&Credential::new("a.a.a"), &first).expect("first save");

        mock_of(&store.user).set_error(keyring::Error::NoStorageAccess(
            "locked".to_string().into(),
        ));
        let second = UserProfile::new(2, "Luis", Role::RegularUser);
        assert!(store.save(&Credential::new("b.b.b"), &second).is_err());

        assert!(store.load().is_none());
        assert!(matches!(store.credential.get_password(), Err(keyring::Error::NoEntry)));
    }
}
