//! TOML settings loading

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{Error, Result, io};

/// Load and deserialize a TOML file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = io::read_text(path)?;
    toml::from_str(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Like [`load_toml`], but a missing file yields `Ok(None)`.
pub fn load_toml_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file");
        return Ok(None);
    }
    load_toml(path).map(Some)
}
