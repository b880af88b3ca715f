//! Settings file and its merge with the command line
//!
//! Precedence, lowest first: built-in defaults, the settings file, flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::Result;

/// Default SSH config location
const DEFAULT_SSH_CONFIG: &str = "~/.ssh/config";

/// `<config dir>/gce-ssh-sync/config.toml`
const SETTINGS_DIR: &str = "gce-ssh-sync";
const SETTINGS_FILE: &str = "config.toml";

/// Contents of the optional settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub ssh_config: Option<PathBuf>,
    /// `Keyword=Argument` pairs applied before any `-k`
    pub kwargs: Vec<String>,
    pub host_defaults: Option<bool>,
    pub inference: Option<bool>,
    pub backup: Option<bool>,
    pub remove_stopped: Option<bool>,
    pub remove_vanished: Option<bool>,
}

impl Settings {
    /// Load `explicit` if given (it must exist), else the default file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(sshsync_fs::load_toml(&sshsync_fs::expand_home(path))?);
        }
        let Some(path) = default_path() else {
            return Ok(Self::default());
        };
        Ok(sshsync_fs::config::load_toml_if_exists(&path)?.unwrap_or_default())
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Everything a run needs, settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub ssh_config: PathBuf,
    pub kwargs: Vec<String>,
    pub host_defaults: bool,
    pub inference: bool,
    pub backup: bool,
    pub remove_stopped: bool,
    pub remove_vanished: bool,
    pub interactive: bool,
}

impl RunConfig {
    pub fn resolve(cli: &Cli, settings: Settings) -> Self {
        let ssh_config = cli
            .ssh_config
            .clone()
            .or(settings.ssh_config)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SSH_CONFIG));

        let mut kwargs = settings.kwargs;
        kwargs.extend(cli.kwargs.iter().cloned());

        // A flag can only turn a feature off
        let setting = |flag: bool, value: Option<bool>| !flag && value.unwrap_or(true);

        Self {
            ssh_config,
            kwargs,
            host_defaults: setting(cli.no_host_defaults, settings.host_defaults),
            inference: setting(cli.no_inference, settings.inference),
            backup: setting(cli.no_backup, settings.backup),
            remove_stopped: setting(cli.no_remove_stopped, settings.remove_stopped),
            remove_vanished: setting(cli.no_remove_vanished, settings.remove_vanished),
            interactive: !cli.yes,
        }
    }
}
