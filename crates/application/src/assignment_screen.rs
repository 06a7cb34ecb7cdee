use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use backoffice_core::AppError;
use backoffice_domain::{
    AssignmentTarget, Keyed, PermissionId, PermissionRecord, TransferList, TransferSide,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::notice::{Notice, NoticeSink};
use crate::ports::AssignmentRepository;
use crate::session::Session;

const SAVED_MESSAGE: &str = "Permissions updated successfully";

/// Lifecycle of one assignment screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Fetching catalog, assignment and display name.
    Loading,
    /// Interactive; selection and moves are local.
    Ready,
    /// Replacement call in flight.
    Saving,
    /// Replacement accepted. Terminal.
    Saved,
    /// A required fetch failed. Only reload or cancel are accepted.
    LoadFailed,
    /// Left without saving. Terminal.
    Cancelled,
}

impl ScreenState {
    /// Returns a stable lowercase label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::LoadFailed => "load_failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ScreenState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failures surfaced by [`AssignmentScreenController`].
#[derive(Debug, Error)]
pub enum AssignmentScreenError {
    /// A loading fetch failed; the screen is not interactive.
    #[error("failed to load permissions: {0}")]
    Load(AppError),
    /// The replacement call failed; the selection is kept.
    #[error("failed to update permissions: {0}")]
    Save(AppError),
    /// The operation is not valid in the current state.
    #[error("assignment screen is {0}")]
    NotReady(ScreenState),
    /// No pane lists the permission.
    #[error("permission {0} is not listed on this screen")]
    UnknownPermission(PermissionId),
}

impl From<AssignmentScreenError> for AppError {
    fn from(error: AssignmentScreenError) -> Self {
        match error {
            AssignmentScreenError::Load(error) | AssignmentScreenError::Save(error) => error,
            AssignmentScreenError::NotReady(_) => Self::Conflict(error.to_string()),
            AssignmentScreenError::UnknownPermission(_) => Self::NotFound(error.to_string()),
        }
    }
}

/// Where the shell navigates once the screen is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenExit {
    /// Route of the list screen to return to.
    pub route: &'static str,
}

/// Drives one "assign permissions" screen for a role or a user.
pub struct AssignmentScreenController {
    target: AssignmentTarget,
    repository: Arc<dyn AssignmentRepository>,
    notices: Arc<dyn NoticeSink>,
    state: ScreenState,
    display_name: String,
    transfer: TransferList<PermissionRecord>,
}

impl AssignmentScreenController {
    /// Creates a controller in [`ScreenState::Loading`] with empty panes.
    #[must_use]
    pub fn new(
        target: AssignmentTarget,
        repository: Arc<dyn AssignmentRepository>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            target,
            repository,
            notices,
            state: ScreenState::Loading,
            display_name: String::new(),
            transfer: TransferList::partition(Vec::new(), |_| false),
        }
    }

    /// Fetches everything the screen shows and becomes interactive.
    ///
    /// Accepted while loading and after a failed load. A failure of any fetch
    /// leaves no partial state behind.
    pub async fn load(&mut self, session: &Session) -> Result<(), AssignmentScreenError> {
        if !matches!(self.state, ScreenState::Loading | ScreenState::LoadFailed) {
            return Err(AssignmentScreenError::NotReady(self.state));
        }
        self.state = ScreenState::Loading;

        match self.fetch(session).await {
            Ok((display_name, transfer)) => {
                info!(
                    target_kind = self.target.kind(),
                    target_id = self.target.id(),
                    available = transfer.available().len(),
                    assigned = transfer.assigned().len(),
                    "assignment screen loaded"
                );
                self.display_name = display_name;
                self.transfer = transfer;
                self.state = ScreenState::Ready;
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, assignment = %self.target, "assignment screen load failed");
                self.state = ScreenState::LoadFailed;
                let error = AssignmentScreenError::Load(error);
                self.notices.notify(Notice::error(error.to_string()));
                Err(error)
            }
        }
    }

    async fn fetch(
        &self,
        session: &Session,
    ) -> Result<(String, TransferList<PermissionRecord>), AppError> {
        let token = session.bearer_token()?;
        let (catalog, assigned_ids, display_name) = tokio::try_join!(
            self.repository.list_permission_catalog(token),
            self.repository.assigned_permission_ids(token, self.target),
            self.repository.target_display_name(token, self.target),
        )?;

        let assigned_ids: HashSet<PermissionId> = assigned_ids.into_iter().collect();
        let transfer =
            TransferList::partition(catalog, |record| assigned_ids.contains(&record.key()));
        Ok((display_name, transfer))
    }

    /// Flips the checked state of one permission.
    pub fn toggle(&mut self, permission_id: PermissionId) -> Result<(), AssignmentScreenError> {
        self.ensure_ready()?;
        if self.transfer.toggle(permission_id) {
            Ok(())
        } else {
            Err(AssignmentScreenError::UnknownPermission(permission_id))
        }
    }

    /// Select-all control of one pane.
    pub fn toggle_all(&mut self, side: TransferSide) -> Result<(), AssignmentScreenError> {
        self.ensure_ready()?;
        self.transfer.toggle_all(side);
        Ok(())
    }

    /// Moves checked available permissions to the assigned pane.
    pub fn move_to_assigned(&mut self) -> Result<usize, AssignmentScreenError> {
        self.ensure_ready()?;
        Ok(self.transfer.move_checked_to_assigned())
    }

    /// Moves checked assigned permissions back to the available pane.
    pub fn move_to_available(&mut self) -> Result<usize, AssignmentScreenError> {
        self.ensure_ready()?;
        Ok(self.transfer.move_checked_to_available())
    }

    /// Replaces the target's assignment with the assigned pane.
    ///
    /// On failure the screen returns to [`ScreenState::Ready`] with panes and
    /// selection untouched so the user can retry.
    pub async fn save(&mut self, session: &Session) -> Result<ScreenExit, AssignmentScreenError> {
        self.ensure_ready()?;
        self.state = ScreenState::Saving;

        let permission_ids = self.transfer.assigned_keys();
        let result = match session.bearer_token() {
            Ok(token) => {
                self.repository
                    .replace_assignment(token, self.target, &permission_ids)
                    .await
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => {
                info!(
                    assignment = %self.target,
                    assigned = permission_ids.len(),
                    "assignment replaced"
                );
                self.state = ScreenState::Saved;
                self.notices.notify(Notice::success(SAVED_MESSAGE));
                Ok(self.exit())
            }
            Err(error) => {
                warn!(error = %error, assignment = %self.target, "assignment save failed");
                self.state = ScreenState::Ready;
                let error = AssignmentScreenError::Save(error);
                self.notices.notify(Notice::error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Leaves the screen without any backend call.
    pub fn cancel(&mut self) -> Result<ScreenExit, AssignmentScreenError> {
        if !matches!(self.state, ScreenState::Ready | ScreenState::LoadFailed) {
            return Err(AssignmentScreenError::NotReady(self.state));
        }

        self.state = ScreenState::Cancelled;
        self.notices.notify(Notice::info("Changes discarded"));
        Ok(self.exit())
    }

    /// Returns the edited role or user.
    #[must_use]
    pub fn target(&self) -> AssignmentTarget {
        self.target
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScreenState {
        self.state
    }

    /// Returns the role name or username, empty until loaded.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns both panes and the current selection.
    #[must_use]
    pub fn transfer(&self) -> &TransferList<PermissionRecord> {
        &self.transfer
    }

    fn ensure_ready(&self) -> Result<(), AssignmentScreenError> {
        if self.state == ScreenState::Ready {
            Ok(())
        } else {
            Err(AssignmentScreenError::NotReady(self.state))
        }
    }

    fn exit(&self) -> ScreenExit {
        ScreenExit {
            route: self.target.return_route(),
        }
    }
}
