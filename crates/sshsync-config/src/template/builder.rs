//! Layered template construction and validation

use crate::case_map::CaseInsensitiveMap;
use crate::error::{Error, FieldError, Result};

use super::HostTemplate;
use super::keywords::{self, ValueKind};
use super::value::Value;

/// Collects raw keyword/value pairs and validates them into a [`HostTemplate`].
///
/// Layers are applied in call order: later `set`/`merge` calls override
/// earlier ones for scalar keywords, while `set` appends for multi-valued
/// keywords (`LocalForward`, `SendEnv`, ...).
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    raw: CaseInsensitiveMap<Vec<String>>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyword. Appends when the keyword is multi-valued.
    pub fn set(&mut self, keyword: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if keywords::is_multi_valued(keyword) {
            self.raw.entry_or_insert_with(keyword, Vec::new).push(value);
        } else {
            self.raw.insert(keyword, vec![value]);
        }
        self
    }

    /// Drop a keyword entirely (all values of a multi-valued keyword).
    pub fn unset(&mut self, keyword: &str) -> &mut Self {
        self.raw.remove(keyword);
        self
    }

    /// Apply a `Keyword=Argument` pair; `Keyword=` unsets the keyword.
    pub fn apply_kwarg(&mut self, kwarg: &str) -> Result<&mut Self> {
        let Some((keyword, value)) = kwarg.split_once('=') else {
            return Err(Error::InvalidKeywordArgument(kwarg.to_string()));
        };
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(Error::InvalidKeywordArgument(kwarg.to_string()));
        }

        if value.is_empty() {
            Ok(self.unset(keyword))
        } else {
            Ok(self.set(keyword, value))
        }
    }

    /// Override with every field of `template`, replacing whole lists.
    pub fn merge(&mut self, template: &HostTemplate) -> &mut Self {
        for (keyword, value) in template.iter() {
            self.raw.insert(keyword, value.rendered());
        }
        self
    }

    /// Validate everything, reporting every offending field.
    pub fn build(&self) -> Result<HostTemplate> {
        let (template, errors) = self.build_lenient();
        if errors.is_empty() {
            Ok(template)
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Build from the fields that validate, returning the rejects alongside.
    pub fn build_lenient(&self) -> (HostTemplate, Vec<FieldError>) {
        let mut template = HostTemplate::new();
        let mut errors = Vec::new();

        for (keyword, values) in self.raw.iter() {
            let Some((canonical, kind)) = keywords::lookup(keyword) else {
                errors.push(FieldError::unsupported(keyword));
                continue;
            };
            let Some(last) = values.last() else {
                continue;
            };

            let parsed = match kind {
                ValueKind::List => Ok(Value::List(values.clone())),
                _ => Value::parse(kind, last),
            };
            match parsed {
                Ok(value) => {
                    template.fields.insert(canonical, value);
                }
                Err(expected) => errors.push(FieldError::invalid(canonical, last, expected)),
            }
        }

        (template, errors)
    }
}
