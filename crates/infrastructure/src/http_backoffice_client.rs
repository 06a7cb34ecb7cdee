use std::time::Duration;

use async_trait::async_trait;
use backoffice_application::{AssignmentRepository, AuthApi, LoginResponse, ResourceRepository};
use backoffice_core::{AppError, AppResult};
use backoffice_domain::{
    AdminResource, AssignmentTarget, PermissionId, PermissionRecord, ResourceRow,
};
use reqwest::{RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponseBody {
    token: String,
    role: String,
    user_id: i64,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RoleBody {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    username: String,
}

#[derive(Debug, Deserialize)]
struct RolePermissionLink {
    permission_id: PermissionId,
}

#[derive(Debug, Deserialize)]
struct AnnotatedPermission {
    id: PermissionId,
    #[serde(default)]
    assigned: Value,
}

#[derive(Debug, Serialize)]
struct ReplaceRolePermissionsRequest<'a> {
    permission_ids: &'a [PermissionId],
}

#[derive(Debug, Serialize)]
struct AssignUserPermissionsRequest<'a> {
    permission_id: &'a [PermissionId],
}

/// reqwest-based client for the back-office REST API.
#[derive(Clone)]
pub struct HttpBackofficeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackofficeClient {
    /// Creates a client whose every call is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Self::with_client(http_client, base_url)
    }

    /// Creates a client reusing an existing reqwest client.
    pub fn with_client(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let parsed = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "API base URL '{base_url}' must use http or https"
            )));
        }

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> AppResult<T> {
        let request = self
            .http_client
            .get(self.endpoint(path))
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        let response = send(request, path).await?;
        parse_json(response, path).await
    }

    async fn put_json<B: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> AppResult<()> {
        let request = self
            .http_client
            .put(self.endpoint(path))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .json(body);
        send(request, path).await.map(|_| ())
    }
}

async fn send(request: RequestBuilder, path: &str) -> AppResult<Response> {
    let response = request.send().await.map_err(|error| {
        if error.is_timeout() {
            AppError::Internal(format!("request to '{path}' timed out"))
        } else {
            AppError::Internal(format!("failed to call '{path}': {error}"))
        }
    })?;

    let status = response.status();
    debug!(path, status = status.as_u16(), "backend responded");
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
    Err(status_error(status, path, body))
}

fn status_error(status: StatusCode, path: &str, body: String) -> AppError {
    let message = format!("'{path}' returned status {}: {body}", status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Internal(message),
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> AppResult<T> {
    response.json::<T>().await.map_err(|error| {
        AppError::Internal(format!("failed to parse '{path}' response body: {error}"))
    })
}

/// Backend flags come back as booleans or 0/1 integers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

#[async_trait]
impl AuthApi for HttpBackofficeClient {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let path = "/auth/login";
        let request = self
            .http_client
            .post(self.endpoint(path))
            .json(&LoginRequest { email, password });
        let body: LoginResponseBody = parse_json(send(request, path).await?, path).await?;

        Ok(LoginResponse {
            token: body.token,
            role: body.role,
            user_id: body.user_id,
            permissions: body.permissions.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl AssignmentRepository for HttpBackofficeClient {
    async fn list_permission_catalog(&self, token: &str) -> AppResult<Vec<PermissionRecord>> {
        self.get_json(token, AdminResource::Permissions.list_path())
            .await
    }

    async fn target_display_name(
        &self,
        token: &str,
        target: AssignmentTarget,
    ) -> AppResult<String> {
        match target {
            AssignmentTarget::Role(id) => {
                let role: RoleBody = self.get_json(token, &format!("/roles/{id}")).await?;
                Ok(role.name)
            }
            AssignmentTarget::User(id) => {
                let user: UserBody = self.get_json(token, &format!("/users/{id}")).await?;
                Ok(user.username)
            }
        }
    }

    async fn assigned_permission_ids(
        &self,
        token: &str,
        target: AssignmentTarget,
    ) -> AppResult<Vec<PermissionId>> {
        match target {
            AssignmentTarget::Role(id) => {
                let links: Vec<RolePermissionLink> = self
                    .get_json(token, &format!("/role-permissions/{id}"))
                    .await?;
                Ok(links.into_iter().map(|link| link.permission_id).collect())
            }
            AssignmentTarget::User(id) => {
                let annotated: Vec<AnnotatedPermission> = self
                    .get_json(token, &format!("/role-permissions/user/{id}"))
                    .await?;
                Ok(annotated
                    .into_iter()
                    .filter(|permission| is_truthy(&permission.assigned))
                    .map(|permission| permission.id)
                    .collect())
            }
        }
    }

    async fn replace_assignment(
        &self,
        token: &str,
        target: AssignmentTarget,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        match target {
            AssignmentTarget::Role(id) => {
                self.put_json(
                    token,
                    &format!("/role-permissions/update/{id}"),
                    &ReplaceRolePermissionsRequest { permission_ids },
                )
                .await
            }
            AssignmentTarget::User(id) => {
                self.put_json(
                    token,
                    &format!("/role-permissions/assign/{id}"),
                    &AssignUserPermissionsRequest {
                        permission_id: permission_ids,
                    },
                )
                .await
            }
        }
    }
}

#[async_trait]
impl ResourceRepository for HttpBackofficeClient {
    async fn list_rows(&self, token: &str, resource: AdminResource) -> AppResult<Vec<ResourceRow>> {
        self.get_json(token, resource.list_path()).await
    }
}
