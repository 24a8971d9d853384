//! Domain models for the session gate.
//!
//! - `Role`: the closed three-role vocabulary plus legacy alias normalization
//! - `UserProfile`: the authenticated principal as returned by the backend
//! - `Credential` and `Session`: the in-memory session snapshot

pub mod role;
pub mod session;
pub mod user;

pub use role::Role;
pub use session::{Credential, Session};
pub use user::UserProfile;
