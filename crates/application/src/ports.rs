use async_trait::async_trait;

use backoffice_core::AppResult;
use backoffice_domain::{
    AdminResource, AssignmentTarget, PermissionId, PermissionRecord, ResourceRow,
};

/// Successful sign-in answer of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Role label of the signed-in user.
    pub role: String,
    /// Backend user id.
    pub user_id: i64,
    /// Permission names granted to the user.
    pub permissions: Vec<String>,
}

/// Port for the backend sign-in endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse>;
}

/// Persistent key-value slot holding the bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    async fn load(&self) -> AppResult<Option<String>>;

    /// Replaces the stored token.
    async fn save(&self, token: &str) -> AppResult<()>;

    /// Removes the stored token. Removing an absent token succeeds.
    async fn clear(&self) -> AppResult<()>;
}

/// Port for reading and replacing permission assignments of roles and users.
///
/// Both target kinds share one contract; adapters absorb backend differences.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Lists the full permission catalog.
    async fn list_permission_catalog(&self, token: &str) -> AppResult<Vec<PermissionRecord>>;

    /// Returns the target's display name.
    async fn target_display_name(&self, token: &str, target: AssignmentTarget)
    -> AppResult<String>;

    /// Lists the ids currently assigned to the target.
    async fn assigned_permission_ids(
        &self,
        token: &str,
        target: AssignmentTarget,
    ) -> AppResult<Vec<PermissionId>>;

    /// Replaces the target's assignment set wholesale.
    async fn replace_assignment(
        &self,
        token: &str,
        target: AssignmentTarget,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;
}

/// Port for admin list endpoints.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Lists every row of `resource`.
    async fn list_rows(&self, token: &str, resource: AdminResource) -> AppResult<Vec<ResourceRow>>;
}
