use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AuthError;
use crate::models::{Credential, UserProfile};

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: Credential,
    pub user: UserProfile,
}

/// Remote authentication service as seen by the session gate.
///
/// Implementations own transport concerns (timeouts, retries). The gate
/// tells the backend which credential to present via `set_credential`
/// whenever the session changes.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange a username and password for a credential and profile.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Fetch the profile behind the current credential.
    async fn who_am_i(&self) -> Result<UserProfile, AuthError>;

    /// Revoke the current credential server-side.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Set or clear the credential presented on subsequent calls.
    fn set_credential(&self, credential: Option<Credential>);
}
