//! Reconcile a namespace's instances with the managed region
//!
//! See <https://cloud.google.com/compute/docs/instances/instance-life-cycle>
//! for the lifecycle states. Transitional and suspension states are left
//! alone: the entry keeps whatever it had.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::document::{ConfigDocument, Upsert, instance_of};
use crate::filter::InstanceFilter;
use crate::template::HostTemplate;

/// Lifecycle state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum InstanceStatus {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Stopped,
    Suspending,
    Suspended,
    Repairing,
    Terminated,
}

impl InstanceStatus {
    pub const ALL: [Self; 9] = [
        Self::Provisioning,
        Self::Staging,
        Self::Running,
        Self::Stopping,
        Self::Stopped,
        Self::Suspending,
        Self::Suspended,
        Self::Repairing,
        Self::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Staging => "STAGING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Suspending => "SUSPENDING",
            Self::Suspended => "SUSPENDED",
            Self::Repairing => "REPAIRING",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Stopped for good, as opposed to on its way somewhere.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped | Self::Terminated)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instance status string we don't know
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown instance status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for InstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for InstanceStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What is known about one instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceRecord {
    /// External address, absent when the instance has none
    #[serde(default)]
    pub address: Option<String>,
    /// Numeric instance id, as a string
    pub identifier: String,
    pub status: InstanceStatus,
}

/// Knobs for [`sync_namespace`]
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Drop entries of stopped/terminated instances
    pub remove_stopped: bool,
    /// Drop entries whose instance is gone
    pub remove_vanished: bool,
    /// Only instances passing this filter are touched
    pub filter: InstanceFilter,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            remove_stopped: true,
            remove_vanished: true,
            filter: InstanceFilter::all(),
        }
    }
}

/// Outcome of syncing one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub namespace: String,
    pub statuses: BTreeMap<InstanceStatus, usize>,
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    /// Removed entries and how many lines each took
    pub removed: Vec<(String, usize)>,
    /// Running instances without an address
    pub skipped: Vec<String>,
}

impl SyncReport {
    fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }

    /// Whether the document was modified.
    pub fn changed(&self) -> bool {
        !(self.inserted.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }

    /// Instance counts per status, e.g. `2 RUNNING, 1 TERMINATED`.
    pub fn recap(&self) -> String {
        self.statuses
            .iter()
            .map(|(status, count)| format!("{count} {status}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Bring the entries of `namespace` in line with `instances`.
///
/// Keys of `instances` are entry names (`<instance>.<namespace>`). Running
/// instances with an address are upserted from `template`; stopped ones and
/// entries with no matching instance are removed unless disabled in
/// `options`.
pub fn sync_namespace(
    doc: &mut ConfigDocument,
    namespace: &str,
    instances: &BTreeMap<String, InstanceRecord>,
    template: &HostTemplate,
    options: &SyncOptions,
) -> SyncReport {
    let mut report = SyncReport::new(namespace);

    if instances.is_empty() {
        tracing::info!("[{namespace}] No instances");
    }

    for (name, instance) in instances {
        if !options.filter.matches(instance_of(name)) {
            continue;
        }
        *report.statuses.entry(instance.status).or_default() += 1;

        match (instance.status, instance.address.as_deref()) {
            (InstanceStatus::Running, Some(address)) => {
                match doc.upsert(name, address, &instance.identifier, template) {
                    Upsert::Inserted { .. } => report.inserted.push(name.clone()),
                    Upsert::Updated => report.updated.push(name.clone()),
                    Upsert::Unchanged => report.unchanged.push(name.clone()),
                }
            }
            (InstanceStatus::Running, None) => {
                tracing::debug!("[{namespace}] {name} is running without an address");
                report.skipped.push(name.clone());
            }
            (status, _) if status.is_stopped() && options.remove_stopped => {
                if let Some(lines) = doc.remove(name) {
                    report.removed.push((name.clone(), lines));
                }
            }
            _ => {}
        }
    }

    if !report.statuses.is_empty() {
        tracing::info!("[{namespace}] Instance status: {}", report.recap());
    }

    if options.remove_vanished {
        let vanished: Vec<String> = doc
            .entries_of_namespace(namespace)
            .map(|(name, _)| name)
            .filter(|name| options.filter.matches_entry(name))
            .filter(|name| !instances.keys().any(|k| k.eq_ignore_ascii_case(name)))
            .map(str::to_string)
            .collect();
        for name in vanished {
            if let Some(lines) = doc.remove(&name) {
                tracing::debug!("[{namespace}] {name} vanished, removed");
                report.removed.push((name, lines));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("RUNNING", InstanceStatus::Running)]
    #[case("running", InstanceStatus::Running)]
    #[case("Terminated", InstanceStatus::Terminated)]
    #[case(" SUSPENDED ", InstanceStatus::Suspended)]
    fn test_status_parse(#[case] text: &str, #[case] expected: InstanceStatus) {
        assert_eq!(text.parse::<InstanceStatus>(), Ok(expected));
    }

    #[test]
    fn test_status_parse_unknown() {
        assert_eq!(
            "EXPLODED".parse::<InstanceStatus>(),
            Err(UnknownStatus("EXPLODED".into()))
        );
    }

    #[test]
    fn test_recap_orders_by_lifecycle() {
        let mut report = SyncReport::new("p");
        report.statuses.insert(InstanceStatus::Terminated, 1);
        report.statuses.insert(InstanceStatus::Running, 2);
        assert_eq!(report.recap(), "2 RUNNING, 1 TERMINATED");
    }

    #[test]
    fn test_record_deserializes() {
        let record: InstanceRecord = serde_json::from_str(
            r#"{"address": "1.2.3.4", "identifier": "42", "status": "running"}"#,
        )
        .unwrap();
        assert_eq!(record.status, InstanceStatus::Running);
        assert_eq!(record.address.as_deref(), Some("1.2.3.4"));

        let no_address: InstanceRecord =
            serde_json::from_str(r#"{"identifier": "42", "status": "TERMINATED"}"#).unwrap();
        assert_eq!(no_address.address, None);

        assert!(
            serde_json::from_str::<InstanceRecord>(
                r#"{"identifier": "42", "status": "NOPE"}"#
            )
            .is_err()
        );
    }
}
