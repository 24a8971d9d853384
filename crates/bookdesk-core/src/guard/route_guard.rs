use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::{AccessDeniedPresenter, NavigateOptions, RoleRequirement, RouteTable, Router};
use crate::models::{Role, Session};

/// Why a user was kept off a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenial {
    pub allowed: RoleRequirement,
    pub actual: Role,
}

impl AccessDenial {
    pub fn message(&self) -> String {
        format!(
            "Access denied. This page is available to: {}. Your role: {}.",
            self.allowed, self.actual
        )
    }
}

/// What a protected navigation renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Rehydration or login still in progress.
    Loading,
    RedirectToLogin,
    AccessDenied(AccessDenial),
    Render,
}

/// Decide what a navigation to a route with `requirement` renders.
pub fn evaluate(session: &Session, requirement: &RoleRequirement) -> GuardDecision {
    if session.loading {
        return GuardDecision::Loading;
    }

    let user = match session.user.as_ref() {
        Some(user) if session.is_authenticated() => user,
        _ => return GuardDecision::RedirectToLogin,
    };

    if !requirement.allows(user.role) {
        return GuardDecision::AccessDenied(AccessDenial {
            allowed: requirement.clone(),
            actual: user.role,
        });
    }

    GuardDecision::Render
}

/// Applies `evaluate` and carries out its side effects.
#[derive(Clone)]
pub struct RouteGuard {
    session: watch::Receiver<Session>,
    router: Arc<dyn Router>,
    presenter: Arc<dyn AccessDeniedPresenter>,
    routes: Arc<RouteTable>,
}

impl RouteGuard {
    pub fn new(
        session: watch::Receiver<Session>,
        router: Arc<dyn Router>,
        presenter: Arc<dyn AccessDeniedPresenter>,
        routes: Arc<RouteTable>,
    ) -> Self {
        Self {
            session,
            router,
            presenter,
            routes,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn current_path(&self) -> String {
        self.router.current_path()
    }

    /// Guard the current route against `requirement`.
    ///
    /// Unauthenticated users are sent to login with the history entry
    /// replaced. A role mismatch shows the access-denied notice and only
    /// redirects once the user acknowledges it.
    pub fn check(&self, requirement: &RoleRequirement) -> GuardDecision {
        let decision = evaluate(&self.session.borrow(), requirement);

        match &decision {
            GuardDecision::Loading => debug!("Session loading, showing placeholder"),
            GuardDecision::RedirectToLogin => {
                info!(from = %self.router.current_path(), "Not signed in, redirecting to login");
                self.router
                    .navigate(self.routes.login_path(), NavigateOptions::replace());
            }
            GuardDecision::AccessDenied(denial) => {
                info!(
                    path = %self.router.current_path(),
                    role = %denial.actual,
                    allowed = %denial.allowed,
                    "Access denied"
                );
                self.presenter
                    .show(&denial.message(), Box::new(self.acknowledge_handler()));
            }
            GuardDecision::Render => {}
        }

        decision
    }

    /// Navigate to `path` and guard it according to the route table.
    pub fn visit(&self, path: &str) -> GuardDecision {
        self.router.navigate(path, NavigateOptions::default());
        match self.routes.requirement_for(path) {
            Some(requirement) => self.check(requirement),
            None => GuardDecision::Render,
        }
    }

    /// Redirect for a dismissed access-denied notice, resolved against the
    /// session at the moment of dismissal.
    fn acknowledge_handler(&self) -> impl FnOnce() + Send + 'static {
        let session = self.session.clone();
        let router = self.router.clone();
        let routes = self.routes.clone();

        move || {
            let role = session.borrow().user.as_ref().map(|u| u.role);
            let destination = match role {
                Some(role) => routes.home_for(role),
                None => routes.login_path(),
            };
            debug!(destination, "Access-denied notice acknowledged");
            router.navigate(destination, NavigateOptions::replace());
        }
    }
}
