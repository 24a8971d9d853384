//! Route configuration for the library console.
//!
//! Maps protected path prefixes to the roles allowed on them, and each role
//! to the page it lands on after login or after dismissing an
//! access-denied notice.

use std::fmt;

use crate::models::Role;

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

/// Ordered set of roles allowed on a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: Vec<Role>,
}

impl RoleRequirement {
    /// Build a requirement, dropping repeated roles but keeping first-seen order.
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut unique = Vec::new();
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self { roles: unique }
    }

    /// Any authenticated user.
    pub fn any() -> Self {
        Self::new(Role::ALL)
    }

    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        f.write_str(&labels.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    login_path: String,
    admin_home: String,
    librarian_home: String,
    regular_home: String,
    /// Protected prefixes; the longest matching prefix wins.
    protected: Vec<(String, RoleRequirement)>,
}

impl RouteTable {
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Landing page for a role.
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin_home,
            Role::Librarian => &self.librarian_home,
            Role::RegularUser => &self.regular_home,
        }
    }

    /// Protect every path under `prefix`.
    pub fn protect(mut self, prefix: impl Into<String>, requirement: RoleRequirement) -> Self {
        self.protected.push((prefix.into(), requirement));
        self
    }

    /// Requirement for a path, or `None` if the path is public.
    pub fn requirement_for(&self, path: &str) -> Option<&RoleRequirement> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.protected
            .iter()
            .filter(|(prefix, _)| Self::matches_prefix(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, requirement)| requirement)
    }

    /// `/loans` matches `/loans` and `/loans/12` but not `/loansx`.
    fn matches_prefix(path: &str, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        use Role::{Admin, Librarian, RegularUser};

        let staff = || RoleRequirement::new([Librarian, Admin]);

        Self {
            login_path: LOGIN_PATH.to_string(),
            admin_home: "/admin".to_string(),
            librarian_home: "/librarian".to_string(),
            regular_home: "/catalog".to_string(),
            protected: Vec::new(),
        }
        .protect("/admin", RoleRequirement::new([Admin]))
        .protect("/users", RoleRequirement::new([Admin]))
        .protect("/librarian", staff())
        .protect("/books/manage", staff())
        .protect("/authors", staff())
        .protect("/categories", staff())
        .protect("/courses", staff())
        .protect("/loans", staff())
        .protect("/fines", staff())
        .protect("/catalog", RoleRequirement::any())
        .protect("/books", RoleRequirement::any())
        .protect("/reservations", RoleRequirement::any())
        .protect("/profile", RoleRequirement::any())
        .protect("/my", RoleRequirement::new([RegularUser]))
    }
}
