//! Filesystem helpers for gce-ssh-sync
//!
//! Everything that touches the disk on behalf of the config document lives
//! here: reading the file once, writing it back atomically, taking backups
//! and loading the optional settings file.

pub mod backup;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use backup::{BackupName, backup_path, create_backup};
pub use config::load_toml;
pub use error::{Error, Result};
pub use path::expand_home;
