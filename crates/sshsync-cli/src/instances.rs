//! Instance inventory input
//!
//! The inventory maps each project to its instances, keyed by the entry
//! name the instance gets in the SSH config (`<instance>.<project>`).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use sshsync_config::{InstanceFilter, InstanceRecord};

use crate::error::{CliError, Result};

pub type Inventory = BTreeMap<String, BTreeMap<String, InstanceRecord>>;

/// Read the inventory from a JSON file, or stdin for `-`.
pub fn read_inventory(source: &Path) -> Result<Inventory> {
    let text = if source == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        sshsync_fs::io::read_text(&sshsync_fs::expand_home(source))?
    };
    parse_inventory(&text)
}

pub fn parse_inventory(text: &str) -> Result<Inventory> {
    Ok(serde_json::from_str(text)?)
}

/// Projects to synchronize, in order.
///
/// Plain names are used as given; if any name is a glob, every project of
/// the inventory matching one of the names is taken instead.
pub fn select_projects(inventory: &Inventory, projects: &[String], all: bool) -> Result<Vec<String>> {
    if all {
        return Ok(inventory.keys().cloned().collect());
    }
    if projects.is_empty() {
        return Err(CliError::user(
            "no project selected: use --project or --all-projects",
        ));
    }
    let filter = InstanceFilter::new(projects)?;
    if !filter.has_pattern() {
        return Ok(filter.patterns().to_vec());
    }

    Ok(inventory
        .keys()
        .filter(|name| filter.matches(name))
        .cloned()
        .collect())
}
