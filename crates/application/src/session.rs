use std::sync::Arc;

use backoffice_core::{AppError, AppResult, Identity, NonEmptyString, has_permission};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::ports::{AuthApi, TokenStore};
use crate::token_identity::{decode_stored_token, decode_token};

/// Signed-in state shared by every screen of one client process.
///
/// The stored token and the identity derived from it only change through
/// [`Session::restore`], [`Session::sign_in`] and [`Session::sign_out`].
pub struct Session {
    store: Arc<dyn TokenStore>,
    token: Option<String>,
    identity: Option<Identity>,
}

impl Session {
    /// Creates a guest session backed by `store` without reading it.
    #[must_use]
    pub fn guest(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            token: None,
            identity: None,
        }
    }

    /// Restores the session from the stored token.
    ///
    /// A malformed or expired token is removed from the store and the session
    /// starts as guest. Failing to remove it is logged, not returned.
    pub async fn restore(store: Arc<dyn TokenStore>) -> AppResult<Self> {
        Self::restore_at(store, Utc::now()).await
    }

    /// Restores the session, judging token expiry against `now`.
    pub async fn restore_at(store: Arc<dyn TokenStore>, now: DateTime<Utc>) -> AppResult<Self> {
        let token = store.load().await?;
        let mut session = Self::guest(store);

        let identity = match decode_stored_token(token.as_deref()) {
            Ok(Some(identity)) if identity.is_expired_at(now) => {
                warn!(
                    email = %identity.email(),
                    "stored token expired, continuing as guest"
                );
                None
            }
            Ok(identity) => identity,
            Err(error) => {
                warn!(error = %error, "stored token could not be decoded, continuing as guest");
                None
            }
        };

        match identity {
            Some(identity) => {
                session.token = token;
                session.identity = Some(identity);
            }
            None if token.is_some() => {
                if let Err(error) = session.store.clear().await {
                    warn!(error = %error, "stale token could not be removed");
                }
            }
            None => {}
        }

        Ok(session)
    }

    /// Signs in with credentials and persists the returned token.
    pub async fn sign_in(
        &mut self,
        auth_api: &dyn AuthApi,
        email: &str,
        password: &str,
    ) -> AppResult<&Identity> {
        let (email, password) = match (NonEmptyString::new(email), NonEmptyString::new(password))
        {
            (Ok(email), Ok(password)) => (email, password),
            _ => {
                return Err(AppError::Validation(
                    "email and password are required".to_owned(),
                ));
            }
        };

        let response = auth_api.login(email.as_str(), password.as_str()).await?;
        self.store.save(response.token.as_str()).await?;

        let expires_at = decode_token(response.token.as_str())
            .ok()
            .and_then(|identity| identity.expires_at());
        let identity = Identity::new(
            String::from(email),
            response.role,
            response.user_id,
            response.permissions,
        )
        .with_expiry(expires_at);

        info!(email = %identity.email(), role = %identity.role(), "signed in");
        self.token = Some(response.token);
        Ok(self.identity.insert(identity))
    }

    /// Forgets the identity and removes the stored token.
    pub async fn sign_out(&mut self) -> AppResult<()> {
        self.token = None;
        self.identity = None;
        self.store.clear().await
    }

    /// Returns the signed-in identity, or `None` for a guest.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the bearer token for outgoing calls.
    pub fn bearer_token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("user not logged in".to_owned()))
    }

    /// Returns whether the current actor holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        has_permission(self.identity(), permission)
    }
}
