//! Role-based route protection.
//!
//! `RouteGuard` reads the current session on every protected navigation and
//! decides whether to render, show a loading placeholder, redirect to login
//! or raise an access-denied notice. Navigation and the notice itself are
//! collaborators behind the `Router` and `AccessDeniedPresenter` traits.

pub mod presenter;
pub mod route_guard;
pub mod router;
pub mod routes;

pub use presenter::{AccessDeniedPresenter, Acknowledge};
pub use route_guard::{evaluate, AccessDenial, GuardDecision, RouteGuard};
pub use router::{MemoryRouter, NavigateOptions, Router};
pub use routes::{RoleRequirement, RouteTable};
