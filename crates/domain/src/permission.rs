use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Items that carry a stable identity key for set reconciliation.
pub trait Keyed {
    /// Key type compared by the transfer-list algebra.
    type Key: Copy + Eq + std::hash::Hash;

    /// Returns the identity key.
    fn key(&self) -> Self::Key;
}

/// Backend identifier of a permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Wraps a backend permission id.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One permission of the catalog as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Unique key used by assignment screens.
    pub id: PermissionId,
    /// Human label, also the value matched by the permission gate.
    pub name: String,
    /// Optional description shown under the label.
    #[serde(default)]
    pub description: Option<String>,
    /// Backend status flag.
    #[serde(default)]
    pub status: Option<i64>,
}

impl PermissionRecord {
    /// Creates a catalog entry without status.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: PermissionId::new(id),
            name: name.into(),
            description,
            status: None,
        }
    }

    /// Returns the label and description joined the way list rows show them.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.description.as_deref().filter(|value| !value.is_empty()) {
            Some(description) => format!("{} - {description}", self.name),
            None => self.name.clone(),
        }
    }
}

impl Keyed for PermissionRecord {
    type Key = PermissionId;

    fn key(&self) -> Self::Key {
        self.id
    }
}
