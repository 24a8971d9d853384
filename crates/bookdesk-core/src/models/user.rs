use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;

/// The authenticated principal as described by the backend.
///
/// Fields the console does not interpret are kept in `extra` and written
/// back verbatim when the profile is persisted.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub enrollment: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(enrollment: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            enrollment: Some(enrollment),
            name: name.into(),
            role,
            extra: Map::new(),
        }
    }

    /// A profile only counts as authenticated with a positive enrollment.
    pub fn has_valid_enrollment(&self) -> bool {
        matches!(self.enrollment, Some(id) if id > 0)
    }
}
