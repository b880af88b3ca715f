//! Terminal output: the colored diff and the confirmation prompt

use colored::{ColoredString, Colorize};
use dialoguer::Confirm;

use sshsync_config::{ChangeKind, DiffRow};

use crate::error::Result;

const DEFAULT_COLUMNS: usize = 80;

/// Terminal width from `COLUMNS`, 80 when unset or garbage.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse().ok())
        .filter(|&c: &usize| c > 0)
        .unwrap_or(DEFAULT_COLUMNS)
}

/// Color one rendered row by what happened to it.
pub fn colorize(row: &DiffRow<'_>, width: usize) -> ColoredString {
    let text = row.render(width);
    match row {
        DiffRow::Header { .. } => text.blue().bold(),
        DiffRow::Separator => text.blue(),
        DiffRow::Line { kind, .. } => match kind {
            ChangeKind::Equal => text.normal(),
            ChangeKind::Delete => text.red(),
            ChangeKind::Insert => text.green(),
            ChangeKind::Replace => text.yellow(),
        },
    }
}

/// Print rows as they come.
pub fn print_diff<'a>(rows: impl Iterator<Item = DiffRow<'a>>) {
    let width = terminal_width();
    for row in rows {
        println!("{}", colorize(&row, width));
    }
}

/// Ask whether to write the changes; defaults to no.
pub fn confirm_save() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Save changes?")
        .default(false)
        .interact()?)
}
