//! # Document Discovery
//!
//! Resolves a user-supplied path (file or directory) into a sorted list of
//! document files. Unreadable subdirectories are logged and skipped; only a
//! missing or unlistable root aborts discovery. Symlinked directories below
//! the root are not followed, so a link back to an ancestor cannot repeat
//! documents.

use std::path::{Path, PathBuf};

use crate::config::ValidatorConfig;
use crate::error::DiscoveryError;

/// Find document files under `root`.
///
/// A file root is returned as-is regardless of its extension, so a single
/// document can always be validated explicitly. A directory root is walked
/// recursively for files whose extension is in `config.extensions`.
pub fn find_documents(root: &Path, config: &ValidatorConfig) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let entries = std::fs::read_dir(root).map_err(|source| DiscoveryError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut acc = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => visit(&entry.path(), config, &mut acc),
            Err(e) => {
                tracing::warn!(dir = %root.display(), error = %e, "failed to read directory entry");
            }
        }
    }
    acc.sort();
    tracing::debug!(root = %root.display(), count = acc.len(), "discovered documents");
    Ok(acc)
}

fn visit(path: &Path, config: &ValidatorConfig, acc: &mut Vec<PathBuf>) {
    let is_link = std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    if path.is_dir() {
        if is_link {
            tracing::debug!(dir = %path.display(), "skipping symlinked directory");
            return;
        }
        let entries = match std::fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    dir = %path.display(),
                    error = %e,
                    "failed to read directory during document walk"
                );
                return;
            }
        };
        for entry in entries.flatten() {
            visit(&entry.path(), config, acc);
        }
    } else if config.is_document_path(path) {
        acc.push(path.to_path_buf());
    }
}
