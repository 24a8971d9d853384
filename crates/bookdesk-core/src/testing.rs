//! Scripted backend shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, AuthBackend, LoginResponse};
use crate::auth::CancelToken;
use crate::error::AuthError;
use crate::models::{Credential, UserProfile};

/// Backend whose answers are fixed up front and whose calls are counted.
#[derive(Default)]
pub struct FakeBackend {
    pub login_result: Mutex<Option<LoginResponse>>,
    pub who_am_i_result: Mutex<Option<UserProfile>>,
    pub logout_fails: bool,
    /// Cancelled while `who_am_i` is in flight.
    pub cancel_during_who_am_i: Mutex<Option<CancelToken>>,

    pub login_calls: AtomicUsize,
    pub who_am_i_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub credential: Mutex<Option<Credential>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting_login(credential: Credential, user: UserProfile) -> Self {
        let backend = Self::new();
        *backend.login_result.lock().expect("lock") = Some(LoginResponse {
            token: credential,
            user,
        });
        backend
    }

    pub fn knowing(user: UserProfile) -> Self {
        let backend = Self::new();
        *backend.who_am_i_result.lock().expect("lock") = Some(user);
        backend
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn current_credential(&self) -> Option<Credential> {
        self.credential.lock().expect("lock").clone()
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result
            .lock()
            .expect("lock")
            .clone()
            .ok_or(AuthError::Authentication(ApiError::Unauthorized))
    }

    async fn who_am_i(&self) -> Result<UserProfile, AuthError> {
        self.who_am_i_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.cancel_during_who_am_i.lock().expect("lock").as_ref() {
            token.cancel();
        }
        self.who_am_i_result
            .lock()
            .expect("lock")
            .clone()
            .ok_or(AuthError::SessionInvalid(ApiError::Unauthorized))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails {
            return Err(AuthError::Logout(ApiError::ServerError("down".to_string())));
        }
        Ok(())
    }

    fn set_credential(&self, credential: Option<Credential>) {
        *self.credential.lock().expect("lock") = credential;
    }
}
