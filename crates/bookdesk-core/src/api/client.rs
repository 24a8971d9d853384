//! API client for the library service's authentication endpoints.
//!
//! This module provides the `ApiClient` struct, the HTTP implementation of
//! `AuthBackend` used by the console.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ApiError, AuthBackend, LoginResponse};
use crate::error::AuthError;
use crate::models::{Credential, UserProfile};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/auth/login";
const ME_PATH: &str = "/auth/me";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// API client for the library service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and clones share the current credential.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<Credential>>>,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn current_token(&self) -> Option<Credential> {
        self.token.read().map(|t| t.clone()).unwrap_or_else(|e| e.into_inner().clone())
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = self.current_token() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid credential header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    async fn post_login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "login response").await
    }

    async fn get_me(&self) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url(ME_PATH))
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "current user").await
    }

    async fn post_logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(LOGOUT_PATH))
            .headers(self.auth_headers()?)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        debug!(base_url = %self.base_url, "Sending login request");
        self.post_login(username, password)
            .await
            .map_err(AuthError::Authentication)
    }

    async fn who_am_i(&self) -> Result<UserProfile, AuthError> {
        self.get_me().await.map_err(AuthError::SessionInvalid)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post_logout().await.map_err(AuthError::Logout)
    }

    fn set_credential(&self, credential: Option<Credential>) {
        match self.token.write() {
            Ok(mut token) => *token = credential,
            Err(e) => *e.into_inner() = credential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("https://library.example.org/api/").expect("client");
        assert_eq!(client.base_url(), "https://library.example.org/api");
        assert_eq!(client.url(ME_PATH), "https://library.example.org/api/auth/me");
    }

    #[test]
    fn test_auth_header_follows_credential() {
        let client = ApiClient::new("http://localhost").expect("client");
        assert!(client.auth_headers().expect("headers").get(header::AUTHORIZATION).is_none());

        // Clones share the credential
        let clone = client.clone();
        clone.set_credential(Some(Credential::new("h.p.s")));
        let headers = client.auth_headers().expect("headers");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer h.p.s")
        );

        client.set_credential(None);
        assert!(clone.auth_headers().expect("headers").get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"accessToken":"h.p.s","user":{"enrollment":2021001,"name":"Marta","role":"ESTUDIANTE","career":"Physics"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("Failed to parse login test JSON");
        assert_eq!(resp.token.as_str(), "h.p.s");
        assert_eq!(resp.user.role, Role::RegularUser);
        assert_eq!(resp.user.enrollment, Some(2021001));
    }
}
