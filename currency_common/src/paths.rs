//! Cleanup of file paths passed as `--rates` / `--script`.
use std::path::{Path, PathBuf};

/// Turns a path argument into a `PathBuf`.
///
/// Leading and trailing blanks are dropped, then one pair of enclosing double
/// quotes, as left behind by shells that do not strip them (`cmd.exe`).
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = match trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => trimmed,
    };
    PathBuf::from(unquoted)
}

/// `true` when `path` names an existing regular file (not a directory).
pub fn is_regular_file(path: &Path) -> bool {
    path.is_file()
}
