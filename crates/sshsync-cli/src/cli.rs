//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Keep the Compute Engine section of your SSH config in sync with your instances
///
/// Instances are read as JSON from --instances (a file, or - for stdin):
///
///   { "<project>": { "<instance>.<project>": { "address": "1.2.3.4",
///                                              "identifier": "123",
///                                              "status": "RUNNING" } } }
///
/// Examples:
///   gce-ssh-sync -i instances.json -p my-project
///   gce-ssh-sync -i - --all-projects 'web-*'
///   gce-ssh-sync -k StrictHostKeyChecking=ask --debug-template
#[derive(Parser, Debug)]
#[command(name = "gce-ssh-sync")]
#[command(author, version, about, verbatim_doc_comment)]
pub struct Cli {
    /// Only consider instances whose name matches one of these globs
    #[arg(value_name = "INSTANCE_GLOBS")]
    pub instance_globs: Vec<String>,

    /// JSON file describing instances per project (- for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub instances: Option<PathBuf>,

    /// Project to synchronize; globs allowed (can be given several times)
    #[arg(short, long, value_name = "PROJECT_NAME")]
    pub project: Vec<String>,

    /// Synchronize every project found in the instances file
    #[arg(short = 'P', long, conflicts_with = "project")]
    pub all_projects: bool,

    /// Path to the SSH config file [default: ~/.ssh/config]
    #[arg(short = 'c', long, value_name = "CONFIG_PATH")]
    pub ssh_config: Option<PathBuf>,

    /// Settings file [default: <config dir>/gce-ssh-sync/config.toml]
    #[arg(long, value_name = "PATH", env = "GCE_SSH_SYNC_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Set a Keyword=Argument pair for new hosts; Keyword= removes it
    ///
    /// Ex: "-k StrictHostKeyChecking=ask" to set,
    /// "-k StrictHostKeyChecking=" to remove the field
    #[arg(short, long = "kwarg", value_name = "KW=[ARG]")]
    pub kwargs: Vec<String>,

    /// (for new hosts) Don't infer settings from existing hosts
    #[arg(long)]
    pub no_inference: bool,

    /// (for new hosts) Don't use the built-in defaults
    #[arg(long)]
    pub no_host_defaults: bool,

    /// Keep entries of stopped instances
    #[arg(long)]
    pub no_remove_stopped: bool,

    /// Keep entries of instances that no longer exist
    #[arg(long)]
    pub no_remove_vanished: bool,

    /// Don't back the config up before saving
    #[arg(long)]
    pub no_backup: bool,

    /// Don't show the diff or ask before writing
    #[arg(short = 'y', long = "yes", visible_alias = "not-interactive")]
    pub yes: bool,

    /// Print the host template and exit
    #[arg(long)]
    pub debug_template: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "gce-ssh-sync",
            "-i",
            "instances.json",
            "-p",
            "proj-a",
            "--project",
            "proj-*",
            "-k",
            "User=me",
            "--kwarg",
            "Port=",
            "--not-interactive",
            "web-*",
        ])
        .unwrap();

        assert_eq!(cli.instances, Some(PathBuf::from("instances.json")));
        assert_eq!(cli.project, vec!["proj-a", "proj-*"]);
        assert_eq!(cli.kwargs, vec!["User=me", "Port="]);
        assert_eq!(cli.instance_globs, vec!["web-*"]);
        assert!(cli.yes);
    }

    #[test]
    fn test_project_conflicts_with_all_projects() {
        let result = Cli::try_parse_from(["gce-ssh-sync", "-p", "a", "--all-projects"]);
        assert!(result.is_err());
    }
}
