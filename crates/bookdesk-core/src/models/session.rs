use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::UserProfile;
use crate::token;

/// Opaque bearer credential issued by the backend.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_expired(&self) -> bool {
        token::is_expired(&self.0)
    }

    pub fn subject(&self) -> Option<String> {
        token::decode(&self.0).and_then(|c| c.subject)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        token::decode(&self.0).and_then(|c| c.expires_at)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Snapshot of the process-wide session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub credential: Option<Credential>,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl Session {
    /// The state at boot, before rehydration has run.
    pub fn booting() -> Self {
        Self {
            credential: None,
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            credential: None,
            user: None,
            loading: false,
        }
    }

    pub fn authenticated(credential: Credential, user: UserProfile) -> Self {
        Self {
            credential: Some(credential),
            user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .as_ref()
            .map(UserProfile::has_valid_enrollment)
            .unwrap_or(false)
    }

    /// Time left on the credential, if it carries an expiry claim.
    pub fn expires_in(&self) -> Option<Duration> {
        let expires_at = self.credential.as_ref()?.expires_at()?;
        Some(expires_at - Utc::now())
    }

    /// Minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_in().map(|d| d.num_minutes().max(0))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::booting()
    }
}
