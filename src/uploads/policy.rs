use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to do when a file with the target name already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Refuse the write
    Reject,
    /// Keep both: `name (1).ext`, `name (2).ext`, ...
    VersionSuffix,
}

#[derive(Debug, Error)]
pub enum CollisionError {
    #[error("{0} already exists")]
    AlreadyExists(String),
}

/// Pick the path a write for `file_name` in `dir` should go to.
///
/// Returns the path and whether it replaces an existing file.
pub fn resolve_target(
    dir: &Path,
    file_name: &str,
    policy: CollisionPolicy,
) -> Result<(PathBuf, bool), CollisionError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok((path, false));
    }

    match policy {
        CollisionPolicy::Overwrite => Ok((path, true)),
        CollisionPolicy::Reject => Err(CollisionError::AlreadyExists(file_name.to_string())),
        CollisionPolicy::VersionSuffix => {
            let (stem, ext) = split_extension(file_name);
            let mut n = 1usize;
            loop {
                let candidate = dir.join(format!("{} ({}){}", stem, n, ext));
                if !candidate.exists() {
                    return Ok((candidate, false));
                }
                n += 1;
            }
        }
    }
}

/// Split "report.final.pdf" into ("report.final", ".pdf"); dotfiles and
/// extensionless names keep everything in the stem.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}
