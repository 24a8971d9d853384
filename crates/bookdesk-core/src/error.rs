//! Error types for the session gate.
//!
//! Only `AuthError::Authentication` is meant to reach the user; every other
//! failure is recovered inside `AuthSession` and logged.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Login was rejected or the server could not be reached.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] ApiError),

    /// The server rejected a credential that looked valid locally.
    #[error("Session rejected by server: {0}")]
    SessionInvalid(#[source] ApiError),

    #[error("Logout failed: {0}")]
    Logout(#[source] ApiError),
}

impl AuthError {
    fn api_error(&self) -> &ApiError {
        match self {
            AuthError::Authentication(e) | AuthError::SessionInvalid(e) | AuthError::Logout(e) => e,
        }
    }

    /// Message suitable for an inline login error.
    pub fn user_message(&self) -> String {
        match self.api_error() {
            ApiError::Unauthorized | ApiError::AccessDenied(_) => {
                "Invalid username or password".to_string()
            }
            ApiError::NetworkError(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::NetworkError(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            ApiError::RateLimited => "Too many attempts - please wait before retrying".to_string(),
            other => format!("Login failed: {}", other),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}
