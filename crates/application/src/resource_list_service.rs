use std::sync::Arc;

use backoffice_core::AppResult;
use backoffice_domain::{AdminResource, ListQuery, ResourceAction, ResourceRow};
use tracing::debug;

use crate::ports::ResourceRepository;
use crate::session::Session;

/// One list row with the row actions the current user may use.
#[derive(Debug, Clone, PartialEq)]
pub struct GatedRow {
    /// Backend row.
    pub row: ResourceRow,
    /// Whether the edit action is shown.
    pub can_update: bool,
    /// Whether the delete action is shown.
    pub can_delete: bool,
}

/// One page of an admin list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceListing {
    /// Listed resource.
    pub resource: AdminResource,
    /// Rows of the requested page.
    pub rows: Vec<GatedRow>,
    /// Rows matching the filters before pagination.
    pub total: usize,
    /// Whether the "add" action is shown.
    pub can_create: bool,
}

/// Application service backing admin list screens.
#[derive(Clone)]
pub struct ResourceListService {
    repository: Arc<dyn ResourceRepository>,
}

impl ResourceListService {
    /// Creates a new list service.
    #[must_use]
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }

    /// Fetches all rows of `resource` and applies `query` client-side.
    pub async fn list(
        &self,
        session: &Session,
        resource: AdminResource,
        query: &ListQuery,
    ) -> AppResult<ResourceListing> {
        query.validate()?;
        let token = session.bearer_token()?;

        let rows = self.repository.list_rows(token, resource).await?;
        let fetched = rows.len();
        let page = query.apply(rows);
        debug!(
            resource = resource.as_str(),
            fetched,
            matched = page.total,
            "resource list filtered"
        );

        let can_update = session.has_permission(&resource.permission_name(ResourceAction::Update));
        let can_delete = session.has_permission(&resource.permission_name(ResourceAction::Delete));

        Ok(ResourceListing {
            resource,
            rows: page
                .rows
                .into_iter()
                .map(|row| GatedRow {
                    row,
                    can_update,
                    can_delete,
                })
                .collect(),
            total: page.total,
            can_create: session.has_permission(&resource.permission_name(ResourceAction::Create)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use backoffice_core::{AppError, AppResult};
    use backoffice_domain::{AdminResource, ListQuery, ResourceRow};
    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::ports::{ResourceRepository, TokenStore};
    use crate::session::Session;

    use super::ResourceListService;

    #[derive(Default)]
    struct FakeResourceRepository {
        requests: Mutex<Vec<AdminResource>>,
    }

    #[async_trait]
    impl ResourceRepository for FakeResourceRepository {
        async fn list_rows(
            &self,
            _token: &str,
            resource: AdminResource,
        ) -> AppResult<Vec<ResourceRow>> {
            self.requests.lock().await.push(resource);
            ["Carol", "alice", "Bob", "dave", "Eve", "frank"]
                .into_iter()
                .enumerate()
                .map(|(index, name)| {
                    let value = json!({ "id": index + 1, "username": name, "name": name });
                    serde_json::from_value(value)
                        .map_err(|error| AppError::Internal(error.to_string()))
                })
                .collect()
        }
    }

    struct FixedTokenStore(Option<String>);

    #[async_trait]
    impl TokenStore for FixedTokenStore {
        async fn load(&self) -> AppResult<Option<String>> {
            Ok(self.0.clone())
        }

        async fn save(&self, _token: &str) -> AppResult<()> {
            Ok(())
        }

        async fn clear(&self) -> AppResult<()> {
            Ok(())
        }
    }

    async fn session_with(permissions: &str) -> Session {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let payload = format!(
            r#"{{"sub":"a@b.com","role":"staff","user_id":4,"permissions":{permissions}}}"#
        );
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload));
        Session::restore(Arc::new(FixedTokenStore(Some(token))))
            .await
            .unwrap_or_else(|error| panic!("{error}"))
    }

    #[tokio::test]
    async fn list_gates_row_actions_by_permission_names() {
        let repository = Arc::new(FakeResourceRepository::default());
        let service = ResourceListService::new(repository.clone());
        let session = session_with(r#"["Update Users","Create Roles"]"#).await;

        let listing = service
            .list(&session, AdminResource::Users, &ListQuery::default())
            .await
            .unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(listing.total, 6);
        assert_eq!(listing.rows.len(), 5);
        assert!(!listing.can_create);
        assert!(listing.rows.iter().all(|row| row.can_update && !row.can_delete));
        assert_eq!(*repository.requests.lock().await, vec![AdminResource::Users]);
    }

    #[tokio::test]
    async fn list_applies_search_and_paging() {
        let service = ResourceListService::new(Arc::new(FakeResourceRepository::default()));
        let session = session_with("[]").await;
        let query = ListQuery {
            search: Some("A".to_owned()),
            rows_per_page: 2,
            page: 1,
            ..ListQuery::default()
        };

        let listing = service
            .list(&session, AdminResource::Users, &query)
            .await
            .unwrap_or_else(|error| panic!("{error}"));

        let labels: Vec<_> = listing
            .rows
            .iter()
            .filter_map(|row| row.row.label().map(str::to_owned))
            .collect();
        assert_eq!(listing.total, 4);
        assert_eq!(labels, vec!["dave", "frank"]);
    }

    #[tokio::test]
    async fn guest_is_rejected_before_fetching() {
        let repository = Arc::new(FakeResourceRepository::default());
        let service = ResourceListService::new(repository.clone());
        let session = Session::guest(Arc::new(FixedTokenStore(None)));

        let result = service
            .list(&session, AdminResource::Roles, &ListQuery::default())
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert!(repository.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_query_is_rejected() {
        let service = ResourceListService::new(Arc::new(FakeResourceRepository::default()));
        let session = session_with("[]").await;
        let query = ListQuery {
            rows_per_page: 0,
            ..ListQuery::default()
        };

        let result = service.list(&session, AdminResource::Users, &query).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
