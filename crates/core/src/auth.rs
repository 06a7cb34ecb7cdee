use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a stored bearer token cannot be turned into an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    /// Token does not have exactly three dot-separated segments.
    #[error("token must have 3 segments, found {0}")]
    SegmentCount(usize),

    /// Payload segment is not valid base64url.
    #[error("token payload is not valid base64: {0}")]
    Encoding(String),

    /// Payload is not JSON or does not match the claims schema.
    #[error("token payload does not match claims schema: {0}")]
    Structure(String),

    /// Token carries an `exp` claim in the past.
    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Signed-in actor derived from a bearer token.
///
/// Permissions are fixed at construction; nothing in the client mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    email: String,
    role: String,
    user_id: i64,
    permissions: BTreeSet<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Creates an identity from decoded claims or a login response.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        role: impl Into<String>,
        user_id: i64,
        permissions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
            user_id,
            permissions: permissions.into_iter().collect(),
            expires_at: None,
        }
    }

    /// Attaches the token expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Returns the email (`sub` claim).
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role label.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the backend user id.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the granted permission names.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns the token expiry, if the token carried one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns whether the token expired before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Returns whether this identity holds the named permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Decides whether an action should be offered to the current actor.
///
/// Exact, case-sensitive name match. A guest (`None`) is always denied. This only
/// drives what the client shows; the backend re-checks every mutating call.
#[must_use]
pub fn has_permission(identity: Option<&Identity>, permission: &str) -> bool {
    identity.is_some_and(|identity| identity.has_permission(permission))
}
