//! Host templates
//!
//! A [`HostTemplate`] is the desired configuration of one generated `Host`
//! entry: validated, typed keyword values that render into canonical lines.

mod builder;
pub mod keywords;
mod value;

pub use builder::TemplateBuilder;
pub use value::Value;

use std::collections::BTreeMap;
use std::path::Path;

use crate::document::EntryRecord;
use crate::grammar;

/// Keyword holding an entry's reachability address
pub const ADDRESS_KEYWORD: &str = "HostName";

/// Keyword holding an entry's host-key alias
pub const ALIAS_KEYWORD: &str = "HostKeyAlias";

/// Prefix of a generated `HostKeyAlias`, followed by the instance id
pub const HOST_KEY_ALIAS_PREFIX: &str = "compute.";

/// Order in which generated entries list their well-known keywords
pub const GCE_ORDERING: [&str; 6] = [
    "HostName",
    "IdentityFile",
    "UserKnownHostsFile",
    "HostKeyAlias",
    "IdentitiesOnly",
    "CheckHostIP",
];

/// Validated keyword values for one entry.
///
/// Fields are keyed by canonical keyword casing. Once built a template is
/// never modified in place; [`HostTemplate::materialize`] returns a copy
/// with the per-instance fields filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTemplate {
    fields: BTreeMap<&'static str, Value>,
}

/// Formatting knobs for [`HostTemplate::render`]
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Between keyword and value
    pub separator: String,
    /// Keyword casing overrides, matched case-insensitively
    pub casings: Vec<String>,
    pub indent: String,
    /// Quote every value, not only those containing spaces
    pub force_quotes: bool,
    /// Keywords to render first, in this order
    pub ordering: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            casings: Vec::new(),
            indent: "    ".to_string(),
            force_quotes: false,
            ordering: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Defaults with the ordering generated entries use.
    pub fn gce() -> Self {
        Self {
            ordering: GCE_ORDERING.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// One rendered line and the field it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Canonical keyword
    pub keyword: &'static str,
    /// Unquoted value
    pub value: String,
    /// Full line text, newline included
    pub text: String,
}

impl HostTemplate {
    /// An empty template.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::new()
    }

    /// Settings every Compute Engine host needs for `ssh` to work the way
    /// `gcloud compute ssh` sets it up.
    pub fn gce_defaults(ssh_dir: &Path) -> Self {
        let mut template = Self::new();
        template.fields.insert(
            "IdentityFile",
            Value::Str(ssh_dir.join("google_compute_engine").display().to_string()),
        );
        template.fields.insert(
            "UserKnownHostsFile",
            Value::Str(
                ssh_dir
                    .join("google_compute_known_hosts")
                    .display()
                    .to_string(),
            ),
        );
        template.fields.insert("IdentitiesOnly", Value::Bool(true));
        template.fields.insert("CheckHostIP", Value::Bool(false));
        template
    }

    /// Look up a field by keyword, in any casing.
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        let (canonical, _) = keywords::lookup(keyword)?;
        self.fields.get(canonical)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in canonical-keyword byte order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// A copy ready to render a new entry: address and host-key alias set.
    pub fn materialize(&self, address: &str, identifier: &str) -> Self {
        let mut template = self.clone();
        template
            .fields
            .insert(ADDRESS_KEYWORD, Value::Str(address.to_string()));
        template.fields.insert(
            ALIAS_KEYWORD,
            Value::Str(format!("{HOST_KEY_ALIAS_PREFIX}{identifier}")),
        );
        template
    }

    /// Render every field into config lines.
    pub fn render(&self, options: &RenderOptions) -> Vec<String> {
        self.render_fields(options)
            .into_iter()
            .map(|line| line.text)
            .collect()
    }

    /// Like [`render`](Self::render) but keeps track of which field each
    /// line belongs to.
    pub fn render_fields(&self, options: &RenderOptions) -> Vec<RenderedLine> {
        let mut remaining: Vec<(&'static str, &Value)> = self.iter().collect();
        let mut ordered = Vec::with_capacity(remaining.len());

        for wanted in &options.ordering {
            if let Some(pos) = remaining
                .iter()
                .position(|(k, _)| k.eq_ignore_ascii_case(wanted))
            {
                ordered.push(remaining.remove(pos));
            }
        }
        remaining.sort_by_key(|(k, _)| k.to_ascii_lowercase());
        ordered.extend(remaining);

        let mut lines = Vec::new();
        for (keyword, value) in ordered {
            let spelled = options
                .casings
                .iter()
                .find(|c| c.eq_ignore_ascii_case(keyword))
                .map(String::as_str)
                .unwrap_or(keyword);

            for item in value.rendered() {
                let text = grammar::format_line(
                    &options.indent,
                    spelled,
                    &options.separator,
                    &grammar::quote(&item, options.force_quotes),
                );
                lines.push(RenderedLine {
                    keyword,
                    value: item,
                    text,
                });
            }
        }
        lines
    }

    /// Keep what all `entries` have in common.
    ///
    /// A keyword survives if every entry carries it with identical values.
    /// Values that don't validate (or keywords we don't know) are dropped
    /// with a warning rather than failing the run.
    pub fn infer<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a EntryRecord>,
    {
        let entries: Vec<&EntryRecord> = entries.into_iter().collect();
        let Some((first, rest)) = entries.split_first() else {
            return Self::new();
        };

        let mut builder = TemplateBuilder::new();
        for (keyword, _) in first.params() {
            let Some(values) = effective_values(first, keyword) else {
                continue;
            };
            let shared = rest
                .iter()
                .all(|entry| effective_values(entry, keyword).as_ref() == Some(&values));
            if !shared {
                continue;
            }
            for value in values {
                builder.set(keyword, value);
            }
        }

        let (template, rejected) = builder.build_lenient();
        for err in rejected {
            tracing::warn!("Ignoring inferred setting: {}", err);
        }
        template
    }
}

/// The values ssh would use: all of a list keyword, the first of a scalar.
fn effective_values<'e>(entry: &'e EntryRecord, keyword: &str) -> Option<Vec<&'e str>> {
    let mut values = entry.values(keyword)?;
    if !keywords::is_multi_valued(keyword) {
        values.truncate(1);
    }
    Some(values)
}
