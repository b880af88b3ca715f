//! Non-clobbering backups of the config file
//!
//! A backup is a byte-identical copy of the file as it was right before a
//! save, placed next to it as `<path>.backup.<tag>`. An existing backup is
//! never overwritten.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// How the backup file should be named
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackupName {
    /// `<path>.backup.<YYYYmmdd_HHMMSS>` using the local clock
    #[default]
    Timestamp,
    /// `<path>.backup.<tag>`
    Tag(String),
    /// Exact file name to use
    Explicit(PathBuf),
}

/// Compute the backup target for `original`.
pub fn backup_path(original: &Path, name: &BackupName) -> PathBuf {
    let tag = match name {
        BackupName::Explicit(path) => return path.clone(),
        BackupName::Tag(tag) => tag.clone(),
        BackupName::Timestamp => Local::now().format("%Y%m%d_%H%M%S").to_string(),
    };

    let mut file_name = original.as_os_str().to_owned();
    file_name.push(format!(".backup.{tag}"));
    PathBuf::from(file_name)
}

/// Copy `original` to its backup location.
///
/// Fails with [`Error::BackupExists`] when the target already exists. The
/// copy keeps the original's permission bits.
pub fn create_backup(original: &Path, name: &BackupName) -> Result<PathBuf> {
    let target = backup_path(original, name);

    // create_new fails atomically if something raced us to the name
    let reserved = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target);
    match reserved {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::BackupExists { path: target });
        }
        Err(e) => return Err(Error::io(&target, e)),
    }

    fs::copy(original, &target).map_err(|e| {
        let _ = fs::remove_file(&target);
        Error::io(original, e)
    })?;

    tracing::debug!(
        from = %original.display(),
        to = %target.display(),
        "created backup"
    );
    Ok(target)
}
