//! Authentication module for managing the console session.
//!
//! This module provides:
//! - `AuthSession`: the single source of truth for who is logged in
//! - `CancelToken`: gates state writes of an in-flight rehydration
//! - `fallback`: the fresh → cached → anonymous profile precedence
//!
//! Sessions are rehydrated once per process from the session store and
//! reconciled against the backend.

pub mod cancel;
pub mod fallback;
pub mod session;

pub use cancel::CancelToken;
pub use fallback::{ProfileCandidate, ProfileSource};
pub use session::AuthSession;
