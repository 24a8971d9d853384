use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Console role of an authenticated user.
///
/// Serialized with the backend's vocabulary (`REGULAR_USER`, `LIBRARIAN`,
/// `ADMIN`). Deserialization also accepts the legacy labels some backend
/// versions still emit, normalizing them on the way in.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Role {
    RegularUser,
    Librarian,
    Admin,
}

/// Role labels from older backend schemas and what they mean today.
const LEGACY_ALIASES: &[(&str, Role)] = &[
    ("ADMINISTRADOR", Role::Admin),
    ("ADMINISTRATOR", Role::Admin),
    ("ESTUDIANTE", Role::RegularUser),
    ("STUDENT", Role::RegularUser),
    ("PROFESOR", Role::RegularUser),
    ("DOCENTE", Role::RegularUser),
    ("TEACHER", Role::RegularUser),
    ("BIBLIOTECARIO", Role::Librarian),
];

impl Role {
    pub const ALL: [Role; 3] = [Role::RegularUser, Role::Librarian, Role::Admin];

    /// Wire label for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::RegularUser => "REGULAR_USER",
            Role::Librarian => "LIBRARIAN",
            Role::Admin => "ADMIN",
        }
    }

    /// Map a free-form role label onto the current vocabulary.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace and a
    /// `ROLE_` prefix. Labels outside the current and legacy sets are `None`.
    pub fn normalize(label: &str) -> Option<Role> {
        let upper = label.trim().to_uppercase();
        let upper = upper.strip_prefix("ROLE_").unwrap_or(&upper);

        if let Some(role) = Role::ALL.iter().find(|r| r.as_str() == upper) {
            return Some(*role);
        }

        LEGACY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == upper)
            .map(|(_, role)| *role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::normalize(s).ok_or_else(|| format!("unknown role: {}", s))
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().inspect_err(|_| {
            warn!(role = %value, "Rejecting unknown role label");
        })
    }
}
