use super::session::UploadSession;
use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Hands out the process's single upload session.
///
/// The session is derived lazily on first access; every later access returns
/// the same `Arc` without looking at the clock again.
#[derive(Debug)]
pub struct SessionStore {
    base_dir: PathBuf,
    current: OnceCell<Arc<UploadSession>>,
}

impl SessionStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            current: OnceCell::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the session, creating it (and its directory) on first call
    pub async fn session(&self) -> Result<Arc<UploadSession>> {
        let session = self
            .current
            .get_or_try_init(|| async {
                UploadSession::create(&self.base_dir, Local::now()).map(Arc::new)
            })
            .await?;

        debug!("Using upload session {}", session.session_id);
        Ok(Arc::clone(session))
    }

    /// Whether a session has been observed yet
    pub fn is_started(&self) -> bool {
        self.current.initialized()
    }
}
