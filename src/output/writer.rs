use crate::uploads::{resolve_target, CollisionPolicy};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FILE_PREFIX: &str = "회의록_";
const FILE_EXTENSION: &str = ".txt";

/// Writes minutes to `<dir>/회의록_<meeting name>.txt`
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a meeting; path separators and NUL become `_`
    pub fn file_name(meeting_name: &str) -> String {
        let safe: String = meeting_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                c => c,
            })
            .collect();
        format!("{}{}{}", FILE_PREFIX, safe, FILE_EXTENSION)
    }

    /// Write `text` as UTF-8 and return where it went
    pub fn write(&self, meeting_name: &str, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let (path, overwritten) =
            resolve_target(&self.dir, &Self::file_name(meeting_name), self.policy)?;

        fs::write(&path, text)
            .with_context(|| format!("Failed to write minutes to {}", path.display()))?;

        if overwritten {
            warn!("Replaced earlier minutes at {}", path.display());
        }
        info!("Wrote {} bytes of minutes to {}", text.len(), path.display());

        Ok(path)
    }

    /// Read back a file this writer produced, by its file name.
    ///
    /// Returns `None` for names this writer would never produce or that do
    /// not exist.
    pub fn read(&self, file_name: &str) -> Result<Option<String>> {
        let well_formed = file_name.starts_with(FILE_PREFIX)
            && file_name.ends_with(FILE_EXTENSION)
            && !file_name.contains(['/', '\\'])
            && file_name != ".."
            && file_name != ".";
        if !well_formed {
            return Ok(None);
        }

        let path = self.dir.join(file_name);
        if !path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(text))
    }
}
