use pretty_assertions::assert_eq;
use serde::Deserialize;
use sshsync_fs::Error;
use sshsync_fs::config::{load_toml, load_toml_if_exists};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    ssh_config: Option<String>,
    #[serde(default)]
    kwargs: Vec<String>,
}

#[test]
fn test_load_toml_reads_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "ssh_config = \"~/.ssh/other\"\nkwargs = [\"User=zor\"]\n",
    )
    .unwrap();

    let sample: Sample = load_toml(&path).unwrap();
    assert_eq!(
        sample,
        Sample {
            ssh_config: Some("~/.ssh/other".into()),
            kwargs: vec!["User=zor".into()],
        }
    );
}

#[test]
fn test_load_toml_if_exists_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let loaded: Option<Sample> = load_toml_if_exists(&temp.path().join("nope.toml")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_load_toml_invalid_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "kwargs = not-a-list").unwrap();

    let result: Result<Sample, _> = load_toml(&path);
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}
