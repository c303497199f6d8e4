use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The per-process upload session
#[derive(Debug, Clone, Serialize)]
pub struct UploadSession {
    /// Timestamp-derived identifier (e.g. "2025-03-14T09_26_53.589793+09_00")
    pub session_id: String,

    /// Directory holding this session's uploads
    pub directory: PathBuf,

    /// When the session was first observed
    pub started_at: DateTime<Local>,
}

impl UploadSession {
    /// Derive a session from `started_at` and make sure its directory exists.
    ///
    /// An already existing directory is not an error.
    pub fn create(base_dir: &Path, started_at: DateTime<Local>) -> Result<Self> {
        let session_id = session_id_from(&started_at);
        let directory = base_dir.join(&session_id);

        fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create session directory {}", directory.display())
        })?;

        info!(
            "Upload session {} ready at {}",
            session_id,
            directory.display()
        );

        Ok(Self {
            session_id,
            directory,
            started_at,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// ISO-8601 timestamp with the colons swapped for underscores so the result
/// is usable as a directory name everywhere.
pub fn session_id_from(timestamp: &DateTime<Local>) -> String {
    timestamp
        .to_rfc3339_opts(SecondsFormat::Micros, false)
        .replace(':', "_")
}
