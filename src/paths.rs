//! Path handling for conversion entries
//!
//! Table entries are written with forward slashes. This module handles:
//! - Accepting `\` as well, so a Windows-style entry still resolves
//! - Joining entries onto the base directory
//! - Creating destination directories before a write

use std::path::{Path, PathBuf};

/// Convert Windows path separators to `/`
/// `terrain\atlas0.dds` -> `terrain/atlas0.dds`
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Join a base directory with a relative table entry
pub fn resolve(base: &Path, relative: &str) -> PathBuf {
    to_forward_slashes(relative)
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

/// Create parent directories for a path if they don't exist
pub fn ensure_parent_dirs(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
