use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::fallback::{self, ProfileCandidate, ProfileSource};
use super::CancelToken;
use crate::api::AuthBackend;
use crate::error::AuthError;
use crate::models::{Credential, Session, UserProfile};
use crate::store::SessionStore;

/// The session/authorization gate.
///
/// Exactly one instance exists per running console. It starts out booting
/// (`loading = true`), is rehydrated once from the session store, and is
/// mutated afterwards only by `login` and `logout`. The store is written in
/// lockstep with every change.
pub struct AuthSession {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Session>,
    rehydrated: AtomicBool,
}

impl AuthSession {
    pub fn new(backend: Arc<dyn AuthBackend>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(Session::booting());
        Self {
            backend,
            store,
            state,
            rehydrated: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Apply a new session unless the consumer has been torn down.
    fn apply(&self, mount: &CancelToken, session: Session) {
        if mount.is_cancelled() {
            debug!("Consumer torn down, dropping session update");
            return;
        }
        self.backend.set_credential(session.credential.clone());
        self.state.send_replace(session);
    }

    fn persist(&self, credential: &Credential, user: &UserProfile) {
        if let Err(e) = self.store.save(credential, user) {
            warn!(error = %e, "Failed to save session");
        }
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    /// Rebuild the session from the store at startup.
    ///
    /// Runs at most once per instance; later calls are no-ops. Every path
    /// leaves the session with `loading = false` unless `mount` was
    /// cancelled, in which case store writes still happen but session state
    /// is left alone.
    pub async fn rehydrate(&self, mount: &CancelToken) {
        if self.rehydrated.swap(true, Ordering::SeqCst) {
            debug!("Session already rehydrated");
            return;
        }

        let Some(stored) = self.store.load() else {
            debug!("No stored session");
            self.apply(mount, Session::anonymous());
            return;
        };

        if stored.credential.is_expired() {
            info!("Stored credential expired, signing out");
            self.backend.set_credential(Some(stored.credential.clone()));
            if let Err(e) = self.backend.logout().await {
                warn!(error = %e, "Logout of expired session failed");
            }
            self.backend.set_credential(None);
            self.clear_store();
            self.apply(mount, Session::anonymous());
            return;
        }

        // Provisionally authenticated while the backend confirms
        self.backend.set_credential(Some(stored.credential.clone()));
        let fresh = self.backend.who_am_i().await;

        let resolved = fallback::resolve([
            ProfileCandidate::Fresh(fresh),
            ProfileCandidate::Cached(stored.user),
        ]);

        match resolved {
            Some((ProfileSource::Fresh, user)) => {
                self.persist(&stored.credential, &user);
                info!(role = %user.role, "Session restored");
                self.apply(mount, Session::authenticated(stored.credential, user));
            }
            Some((ProfileSource::Cached, user)) => {
                warn!(role = %user.role, "Backend unavailable, using cached profile");
                self.apply(mount, Session::authenticated(stored.credential, user));
            }
            None => {
                warn!("Stored session could not be confirmed, continuing anonymously");
                if !mount.is_cancelled() {
                    self.backend.set_credential(None);
                }
                self.apply(mount, Session::anonymous());
            }
        }
    }

    /// Log in with a username and password.
    ///
    /// On failure the error is returned and the prior session is restored
    /// untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let prior = self.session();
        self.state.send_modify(|s| s.loading = true);

        match self.backend.login(username, password).await {
            Ok(response) => {
                self.persist(&response.token, &response.user);
                self.backend.set_credential(Some(response.token.clone()));
                info!(role = %response.user.role, "Login successful");
                self.state
                    .send_replace(Session::authenticated(response.token, response.user.clone()));
                Ok(response.user)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.state.send_replace(prior);
                Err(e)
            }
        }
    }

    /// Log out. Backend failures are logged, never returned.
    pub async fn logout(&self) {
        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.backend.set_credential(None);
        self.clear_store();
        self.state.send_replace(Session::anonymous());
        info!("Logged out");
    }
}

// ============================================================================
// Tests
// ============================================================================
