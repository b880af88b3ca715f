//! The synchronization run

use colored::Colorize;
use tracing::{info, warn};

use sshsync_config::{BackupName, ConfigDocument, InstanceFilter, SyncOptions, sync_namespace};

use super::template::{build_template, render_template};
use crate::cli::Cli;
use crate::display;
use crate::error::{CliError, Result};
use crate::instances::{read_inventory, select_projects};
use crate::settings::RunConfig;

pub fn run(cli: &Cli, config: &RunConfig) -> Result<()> {
    let mut doc = ConfigDocument::load(&config.ssh_config)?;
    let template = build_template(&doc, config)?;

    if cli.debug_template {
        print!("{}", render_template(&template));
        return Ok(());
    }

    let source = cli.instances.as_deref().ok_or_else(|| {
        CliError::user("no instance inventory given: use --instances FILE, or - for stdin")
    })?;
    let inventory = read_inventory(source)?;
    let projects = select_projects(&inventory, &cli.project, cli.all_projects)?;

    let options = SyncOptions {
        remove_stopped: config.remove_stopped,
        remove_vanished: config.remove_vanished,
        filter: InstanceFilter::new(&cli.instance_globs)?,
    };

    if !options.filter.patterns().is_empty() {
        info!(
            "Only instances matching {}",
            options.filter.patterns().join(", ")
        );
    }
    info!("Synchronizing {} project(s)", projects.len());
    for project in &projects {
        let Some(instances) = inventory.get(project) else {
            warn!("[{}] Not present in the instance inventory, skipping", project);
            continue;
        };
        let report = sync_namespace(&mut doc, project, instances, &template, &options);
        if report.changed() {
            info!(
                "[{}] {} added, {} updated, {} removed",
                project,
                report.inserted.len(),
                report.updated.len(),
                report.removed.len()
            );
        }
    }

    let Some(rows) = doc.diff() else {
        info!("No changes to SSH config");
        return Ok(());
    };

    if config.interactive {
        display::print_diff(rows);
        if !display::confirm_save()? {
            println!("{}", "Changes discarded".yellow());
            return Ok(());
        }
    }

    if config.backup {
        if let Some(backup) = doc.backup(&BackupName::Timestamp)? {
            info!("Backed up previous SSH config to {}", backup.display());
        }
    }

    let path = doc.save()?;
    info!("Rewrote SSH config file at {}", path.display());
    Ok(())
}
