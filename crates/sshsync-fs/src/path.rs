//! User path helpers

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the current user's home directory.
///
/// Only the bare `~` and `~/...` forms are handled; `~user` is returned
/// unchanged, as is any path when the home directory can't be determined.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    expand_with(path, &home)
}

/// The user's `~/.ssh` directory, if a home directory is known.
pub fn ssh_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh"))
}

fn expand_with(path: &Path, home: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if text == "~" {
        return home.to_path_buf();
    }
    match text.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => path.to_path_buf(),
    }
}
