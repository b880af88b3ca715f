//! SSH config editing for gce-ssh-sync
//!
//! Parses `~/.ssh/config`, finds the region fenced by the Compute Engine
//! markers and keeps the `Host` entries inside it in sync with a set of
//! instances, touching as few lines as possible. Everything outside the
//! region is passed through untouched.

pub mod case_map;
pub mod diff;
pub mod document;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod sync;
pub mod template;

pub use case_map::CaseInsensitiveMap;
pub use diff::{ChangeKind, DiffRow, DiffRows};
pub use document::{ConfigDocument, EntryRecord, Param, Upsert};
pub use error::{Error, FieldError, Result};
pub use filter::{InstanceFilter, looks_like_pattern};
pub use sync::{InstanceRecord, InstanceStatus, SyncOptions, SyncReport, sync_namespace};
pub use template::{HostTemplate, RenderOptions, TemplateBuilder, Value};

pub use sshsync_fs::BackupName;
