//! Shell-style name filters for instances and namespaces

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::document::instance_of;
use crate::error::{Error, Result};

/// Matches names against a list of glob patterns.
///
/// An empty pattern list matches every name.
#[derive(Debug, Clone)]
pub struct InstanceFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl InstanceFilter {
    pub fn new<I, S>(globs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();
        for glob in globs {
            let glob = glob.as_ref();
            let compiled = Glob::new(glob).map_err(|e| Error::InvalidGlob {
                pattern: glob.to_string(),
                message: e.kind().to_string(),
            })?;
            builder.add(compiled);
            patterns.push(glob.to_string());
        }
        let set = builder.build().map_err(|e| Error::InvalidGlob {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })?;
        Ok(Self { patterns, set })
    }

    /// A filter that lets everything through.
    pub fn all() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `name` matches any pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.set.is_match(name)
    }

    /// Match the instance part (`web-1` of `web-1.my-project`) of an entry name.
    pub fn matches_entry(&self, entry_name: &str) -> bool {
        self.matches(instance_of(entry_name))
    }

    /// Whether any pattern has wildcard characters.
    pub fn has_pattern(&self) -> bool {
        self.patterns.iter().any(|p| looks_like_pattern(p))
    }
}

impl Default for InstanceFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Whether `text` contains `?`, `*` or brackets and so is likely a glob.
pub fn looks_like_pattern(text: &str) -> bool {
    text.contains(['?', '*', '[', ']'])
}
