//! REST backend access for the session gate.
//!
//! This module provides the `AuthBackend` contract consumed by
//! `AuthSession` and `ApiClient`, its implementation against the library
//! service's REST API.
//!
//! The API uses JWT bearer token authentication obtained through the
//! `/auth/login` endpoint.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::{AuthBackend, LoginResponse};
pub use client::ApiClient;
pub use error::ApiError;
