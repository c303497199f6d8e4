use super::policy::{resolve_target, CollisionPolicy};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Uploads refused before anything is written
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid upload file name: {0:?}")]
    InvalidName(String),

    #[error("{0} is not valid UTF-8 text")]
    InvalidText(String),
}

/// A single file handed over by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as supplied by the client
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Plain-text uploads are stored in text mode
    pub fn is_text(&self) -> bool {
        self.target_name()
            .map(|name| is_text_name(&name))
            .unwrap_or(false)
    }

    /// Final path component of the client-supplied name
    fn target_name(&self) -> Result<String> {
        let name = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        if name.is_empty() || name == "." || name == ".." {
            return Err(UploadError::InvalidName(self.name.clone()).into());
        }
        Ok(name.to_string())
    }
}

fn is_text_name(name: &str) -> bool {
    name.ends_with(".txt")
}

/// Result of a successful `save`
#[derive(Debug, Clone, Serialize)]
pub struct SavedUpload {
    /// Name the file was stored under
    pub name: String,
    pub path: PathBuf,
    /// Whether an existing file was replaced
    pub overwritten: bool,
}

impl SavedUpload {
    pub fn message(&self) -> String {
        format!("파일 업로드 성공! ({})", self.name)
    }
}

/// Write `file` into `directory` under its original name.
///
/// `.txt` uploads are decoded as UTF-8 and written as text; anything else is
/// written byte for byte.
pub fn save(directory: &Path, file: &UploadedFile, policy: CollisionPolicy) -> Result<SavedUpload> {
    let target_name = file.target_name()?;
    let (path, overwritten) = resolve_target(directory, &target_name, policy)?;

    let written = if is_text_name(&target_name) {
        let text = std::str::from_utf8(&file.bytes)
            .map_err(|_| UploadError::InvalidText(file.name.clone()))?;
        fs::write(&path, text)
    } else {
        fs::write(&path, &file.bytes)
    };
    written.with_context(|| format!("Failed to write upload to {}", path.display()))?;

    if overwritten {
        warn!("Upload replaced existing file {}", path.display());
    }
    info!(
        "Saved upload {} ({} bytes) to {}",
        target_name,
        file.bytes.len(),
        path.display()
    );

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(target_name);

    Ok(SavedUpload {
        name,
        path,
        overwritten,
    })
}

/// Names of every entry in `directory`, sorted; empty when it doesn't exist
pub fn list(directory: &Path) -> Result<Vec<String>> {
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(directory)
        .with_context(|| format!("Failed to read {}", directory.display()))?
    {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    Ok(names)
}

/// Delete `directory` with everything in it, then recreate it empty
pub fn clear(directory: &Path) -> Result<()> {
    if directory.exists() {
        fs::remove_dir_all(directory)
            .with_context(|| format!("Failed to delete {}", directory.display()))?;
    }
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to recreate {}", directory.display()))?;

    info!("Cleared uploads in {}", directory.display());
    Ok(())
}

/// Listing as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct UploadListing {
    pub files: Vec<String>,
    pub count: usize,
    pub message: String,
}

pub fn summarize(files: Vec<String>) -> UploadListing {
    let count = files.len();
    let message = if count == 0 {
        "현재 업로드된 파일이 없습니다.".to_string()
    } else {
        format!("현재 저장된 파일 수: {}개", count)
    };

    UploadListing {
        files,
        count,
        message,
    }
}
