//! Assembling the template used for new hosts
//!
//! Layers, each overriding the previous: built-in defaults, settings
//! common to the hosts already in the config, settings-file kwargs, then
//! command-line kwargs.

use std::path::Path;

use sshsync_config::{ConfigDocument, HostTemplate, RenderOptions, TemplateBuilder};

use crate::error::{CliError, Result};
use crate::settings::RunConfig;

pub fn build_template(doc: &ConfigDocument, config: &RunConfig) -> Result<HostTemplate> {
    let ssh_dir = sshsync_fs::path::ssh_dir()
        .ok_or_else(|| CliError::user("can't determine the home directory"))?;
    assemble(doc, config, &ssh_dir)
}

fn assemble(doc: &ConfigDocument, config: &RunConfig, ssh_dir: &Path) -> Result<HostTemplate> {
    let mut builder = TemplateBuilder::new();

    if config.host_defaults {
        builder.merge(&HostTemplate::gce_defaults(ssh_dir));
    }

    if config.inference {
        let inferred = HostTemplate::infer(doc.entries().map(|(_, entry)| entry));
        tracing::debug!("inferred {} settings from existing hosts", inferred.len());
        builder.merge(&inferred);
    }

    for kwarg in &config.kwargs {
        builder.apply_kwarg(kwarg)?;
    }

    Ok(builder.build()?)
}

/// The template as it would appear under a new `Host` line.
pub fn render_template(template: &HostTemplate) -> String {
    template.render(&RenderOptions::gce()).concat()
}
