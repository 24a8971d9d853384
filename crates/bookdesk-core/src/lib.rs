//! Core library for bookdesk, the library console front end.
//!
//! This crate owns the session/authorization gate of the console:
//! - `token`: decoding subject and expiry claims from bearer credentials
//! - `store`: durable persistence of the `{credential, user}` pair
//! - `api`: the `AuthBackend` contract and its HTTP implementation
//! - `auth`: `AuthSession`, the single source of truth for who is logged in
//! - `guard`: `RouteGuard`, deciding per navigation what gets rendered
//!
//! The composition root constructs exactly one `AuthSession`, calls
//! `rehydrate` once at boot, and hands clones of its receiver to consumers.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod store;
pub mod token;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, AuthBackend, LoginResponse};
pub use auth::{AuthSession, CancelToken, ProfileCandidate, ProfileSource};
pub use config::{Config, StoreKind};
pub use error::{AuthError, StoreError};
pub use guard::{
    AccessDenial, AccessDeniedPresenter, Acknowledge, GuardDecision, MemoryRouter,
    NavigateOptions, RoleRequirement, RouteGuard, RouteTable, Router,
};
pub use models::{Credential, Role, Session, UserProfile};
pub use store::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore, StoredSession,
};
