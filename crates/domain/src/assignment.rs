use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Subject whose permission set an assignment screen edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AssignmentTarget {
    /// A role, by backend id.
    Role(i64),
    /// A single user, by backend id.
    User(i64),
}

impl AssignmentTarget {
    /// Returns the backend id of the target.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Role(id) | Self::User(id) => *id,
        }
    }

    /// Returns `role` or `user`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Role(_) => "role",
            Self::User(_) => "user",
        }
    }

    /// Returns the list route the screen leaves to after save or cancel.
    #[must_use]
    pub fn return_route(&self) -> &'static str {
        match self {
            Self::Role(_) => "/role",
            Self::User(_) => "/users",
        }
    }
}

impl Display for AssignmentTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {}", self.kind(), self.id())
    }
}
