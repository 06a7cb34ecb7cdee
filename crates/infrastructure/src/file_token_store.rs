use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use backoffice_application::TokenStore;
use backoffice_core::{AppError, AppResult};
use tracing::debug;

const TOKEN_FILE_NAME: &str = "token";

/// Token store keeping the bearer token in `<dir>/token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store under `directory`. Nothing is touched until first use.
    #[must_use]
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(TOKEN_FILE_NAME),
        }
    }

    /// Returns the token file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read token file '{}': {error}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create token directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        tokio::fs::write(&self.path, token).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write token file '{}': {error}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "token stored");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove token file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}
