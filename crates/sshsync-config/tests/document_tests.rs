//! Behaviour of the managed region under edits

use std::path::Path;

use pretty_assertions::assert_eq;
use sshsync_config::{
    ChangeKind, ConfigDocument, DiffRow, Error, HostTemplate, TemplateBuilder, Upsert,
};

const HAND_WRITTEN: &str = concat!(
    "# my own settings\n",
    "Host *\n",
    "    ServerAliveInterval 30\n",
    "\n",
    "Host bastion\n",
    "    HostName bastion.example.com\n",
);

fn region(body: &str) -> String {
    format!(
        "{HAND_WRITTEN}\n# Google Compute Engine Section\n{body}# End of Google Compute Engine Section\n"
    )
}

fn three_entries() -> ConfigDocument {
    ConfigDocument::parse_str(&region(concat!(
        "\n",
        "Host a.proj\n",
        "    HostName 1.1.1.1\n",
        "    HostKeyAlias compute.1\n",
        "\n",
        "Host b.proj\n",
        "    HostName 2.2.2.2\n",
        "    HostKeyAlias compute.2\n",
        "    LocalForward 8080 localhost:80\n",
        "    LocalForward 8443 localhost:443\n",
        "\n",
        "Host c.proj\n",
        "    HostName 3.3.3.3\n",
    )))
    .unwrap()
}

fn assert_positions_in_region(doc: &ConfigDocument) {
    assert!(doc.begin_marker() < doc.end_marker());
    for (name, entry) in doc.entries() {
        for pos in entry.positions() {
            assert!(
                doc.begin_marker() < pos && pos < doc.end_marker(),
                "{name} has line {pos} outside the region"
            );
        }
        assert!(doc.lines()[entry.header_line()].starts_with("Host "));
    }
}

fn changed_lines(before: &str, after: &str) -> usize {
    let before: Vec<_> = before.lines().collect();
    let after: Vec<_> = after.lines().collect();
    assert_eq!(before.len(), after.len());
    before.iter().zip(&after).filter(|(a, b)| a != b).count()
}

#[test]
fn test_empty_file_gets_a_fresh_region() {
    let mut doc = ConfigDocument::parse_str("").unwrap();
    assert!(doc.is_dirty());

    let text = doc.serialize();
    assert_eq!(
        text,
        concat!(
            "\n",
            "# Google Compute Engine Section\n",
            "# This block has been generated by gce-ssh-sync\n",
            "# It should be safe to edit manually.\n",
            "# End of Google Compute Engine Section\n",
        )
    );

    doc.rebaseline().unwrap();
    assert!(!doc.is_dirty());
    assert!(doc.diff().is_none());
}

#[test]
fn test_serialize_round_trips_exactly() {
    let doc = three_entries();
    assert!(!doc.is_dirty());
    assert!(doc.diff().is_none());

    let again = ConfigDocument::parse_str(&doc.serialize()).unwrap();
    assert_eq!(again.lines(), doc.lines());
    assert!(!again.is_dirty());
}

#[test]
fn test_rebaseline_after_edit_clears_the_diff() {
    let mut doc = three_entries();
    doc.remove("b.proj");
    doc.insert("d.proj", "4.4.4.4", "4", &HostTemplate::new());
    doc.rebaseline().unwrap();

    assert!(!doc.is_dirty());
    assert!(doc.diff().is_none());
    assert!(doc.contains("d.proj"));
    assert_positions_in_region(&doc);
}

#[test]
fn test_update_changes_exactly_one_line() {
    let mut doc = ConfigDocument::parse_str(&region(
        "Host alpha\n    HostName 1.1.1.1\n    User zor\n",
    ))
    .unwrap();
    let before = doc.serialize();

    assert_eq!(doc.update("alpha", "9.9.9.9"), Some(true));
    assert!(doc.is_dirty());
    assert_eq!(changed_lines(&before, &doc.serialize()), 1);

    let rows: Vec<_> = doc.diff().unwrap().collect();
    let changes: Vec<_> = rows
        .iter()
        .filter_map(|row| match row {
            DiffRow::Line {
                kind: ChangeKind::Replace,
                old,
                new,
            } => Some((old.unwrap().1, new.unwrap().1)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![("    HostName 1.1.1.1", "    HostName 9.9.9.9")]);
}

#[test]
fn test_update_is_idempotent() {
    let mut doc = three_entries();
    assert_eq!(doc.update("a.proj", "1.1.1.1"), Some(false));
    assert!(!doc.is_dirty());

    assert_eq!(doc.update("a.proj", "5.5.5.5"), Some(true));
    let after_first = doc.serialize();
    assert_eq!(doc.update("a.proj", "5.5.5.5"), Some(false));
    assert_eq!(doc.serialize(), after_first);
}

#[test]
fn test_insert_keeps_unmanaged_lines() {
    let mut doc = ConfigDocument::parse_str(&region("")).unwrap();
    let template = HostTemplate::gce_defaults(Path::new("/home/me/.ssh"));
    let added = doc.insert("web-1.proj", "10.0.0.1", "1234", &template);

    let text = doc.serialize();
    assert!(text.starts_with(HAND_WRITTEN));
    assert_eq!(added, 2 + 6);
    assert!(text.ends_with(concat!(
        "# Google Compute Engine Section\n",
        "\n",
        "Host web-1.proj\n",
        "    HostName 10.0.0.1\n",
        "    IdentityFile /home/me/.ssh/google_compute_engine\n",
        "    UserKnownHostsFile /home/me/.ssh/google_compute_known_hosts\n",
        "    HostKeyAlias compute.1234\n",
        "    IdentitiesOnly yes\n",
        "    CheckHostIP no\n",
        "# End of Google Compute Engine Section\n",
    )));
    assert_positions_in_region(&doc);
}

#[test]
fn test_upsert_reports_what_happened() {
    let mut doc = three_entries();
    let template = HostTemplate::new();

    assert_eq!(doc.upsert("a.proj", "1.1.1.1", "1", &template), Upsert::Unchanged);
    assert_eq!(doc.upsert("a.proj", "1.1.1.9", "1", &template), Upsert::Updated);
    assert_eq!(
        doc.upsert("z.proj", "7.7.7.7", "7", &template),
        Upsert::Inserted { lines: 4 }
    );
    assert_eq!(doc.entry("z.proj").unwrap().address(), Some("7.7.7.7"));
}

#[test]
fn test_remove_middle_entry_shifts_the_rest() {
    let mut doc = three_entries();
    let a_before = doc.entry("a.proj").unwrap().positions();
    let c_before = doc.entry("c.proj").unwrap().positions();
    let end_before = doc.end_marker();

    let removed = doc.remove("b.proj").unwrap();
    assert_eq!(removed, 6);

    let names: Vec<_> = doc.entries().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a.proj", "c.proj"]);
    assert_eq!(doc.entry("a.proj").unwrap().positions(), a_before);
    let c_after: Vec<_> = c_before.iter().map(|p| p - removed).collect();
    assert_eq!(doc.entry("c.proj").unwrap().positions(), c_after);
    assert_eq!(doc.end_marker(), end_before - removed);
    assert!(!doc.serialize().contains("LocalForward"));
    assert_positions_in_region(&doc);
}

#[test]
fn test_remove_unknown_is_a_no_op() {
    let mut doc = three_entries();
    let positions: Vec<_> = doc.entries().map(|(_, e)| e.positions()).collect();

    assert_eq!(doc.remove("zzz.proj"), None);
    assert!(!doc.is_dirty());
    let after: Vec<_> = doc.entries().map(|(_, e)| e.positions()).collect();
    assert_eq!(after, positions);
}

#[test]
fn test_remove_then_insert_restores_the_text() {
    let template = TemplateBuilder::new().set("User", "zor").build().unwrap();

    let mut doc = ConfigDocument::parse_str(&region("")).unwrap();
    doc.insert("a.proj", "1.1.1.1", "1", &template);
    doc.insert("b.proj", "2.2.2.2", "2", &template);
    let expected = doc.serialize();

    doc.remove("b.proj");
    doc.insert("b.proj", "2.2.2.2", "2", &template);
    assert_eq!(doc.serialize(), expected);
    assert_positions_in_region(&doc);
}

#[test]
fn test_edits_compose_without_reparsing() {
    let mut doc = three_entries();
    let template = HostTemplate::new();

    doc.remove("a.proj");
    doc.update("c.proj", "3.3.3.4");
    doc.insert("d.proj", "4.4.4.4", "4", &template);
    doc.remove("b.proj");
    assert_positions_in_region(&doc);

    let reparsed = ConfigDocument::parse_str(&doc.serialize()).unwrap();
    for (name, entry) in reparsed.entries() {
        assert_eq!(doc.entry(name), Some(entry), "{name} index drifted");
    }
    assert_eq!(reparsed.entries().count(), doc.entries().count());
}

#[test]
fn test_entries_matching_filters_by_name() {
    let doc = three_entries();
    let names: Vec<_> = doc
        .entries_matching(|name| name.starts_with('b') || name.starts_with('c'))
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, vec!["b.proj", "c.proj"]);
}

#[test]
fn test_infer_then_render_common_settings() {
    let doc = ConfigDocument::parse_str(&region(concat!(
        "Host a\n",
        "    X v\n",
        "    User w\n",
        "    Port 22\n",
        "Host b\n",
        "    X v\n",
        "    User w\n",
        "    Port 2222\n",
    )))
    .unwrap();

    // X isn't an ssh keyword, so it is dropped even though it's shared
    let template = HostTemplate::infer(doc.entries().map(|(_, e)| e));
    assert_eq!(template.render(&Default::default()), vec!["    User w\n"]);
}

#[test]
fn test_parse_errors_are_classified() {
    let err = ConfigDocument::parse_str("# Google Compute Engine Section\n").unwrap_err();
    assert!(err.is_parse_error());
    insta::assert_snapshot!(err.to_string(), @"Mismatched markers. End marker missing; begin marker at line 1");

    assert!(!Error::Detached.is_parse_error());
}
