//! Typed template values

use std::fmt;

use super::keywords::ValueKind;

/// A validated keyword value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Canonical (lower-case) spelling of an enumerated choice
    Choice(&'static str),
    List(Vec<String>),
}

impl Value {
    /// Parse one raw textual value for a keyword of kind `kind`.
    ///
    /// For list keywords this yields a one-element list; callers append.
    /// On failure returns the expected-shape description.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, String> {
        match kind {
            ValueKind::Str => Ok(Self::Str(raw.to_string())),
            ValueKind::List => Ok(Self::List(vec![raw.to_string()])),
            ValueKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| kind.describe()),
            ValueKind::Bool => parse_bool(raw).map(Self::Bool).ok_or_else(|| kind.describe()),
            ValueKind::Choice(choices) => choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(raw.trim()))
                .map(|c| Self::Choice(*c))
                .ok_or_else(|| kind.describe()),
        }
    }

    /// Textual values as they'd be written in the config, one per line.
    pub fn rendered(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            other => vec![other.to_string()],
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(true) => f.write_str("yes"),
            Self::Bool(false) => f.write_str("no"),
            Self::Choice(c) => f.write_str(c),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(Value::parse(ValueKind::Bool, "yes"), Ok(Value::Bool(true)));
        assert_eq!(Value::parse(ValueKind::Bool, "No"), Ok(Value::Bool(false)));
        assert_eq!(Value::parse(ValueKind::Bool, "true"), Ok(Value::Bool(true)));
        assert!(Value::parse(ValueKind::Bool, "maybe").is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(Value::parse(ValueKind::Int, "2222"), Ok(Value::Int(2222)));
        assert_eq!(
            Value::parse(ValueKind::Int, "twenty"),
            Err("an integer".to_string())
        );
    }

    #[test]
    fn test_parse_choice_is_case_insensitive() {
        let kind = ValueKind::Choice(&["yes", "accept-new", "no"]);
        assert_eq!(Value::parse(kind, "Accept-New"), Ok(Value::Choice("accept-new")));
        assert_eq!(
            Value::parse(kind, "sometimes"),
            Err("one of yes, accept-new, no".to_string())
        );
    }

    #[test]
    fn test_bool_renders_yes_no() {
        assert_eq!(Value::Bool(true).rendered(), vec!["yes"]);
        assert_eq!(Value::Bool(false).rendered(), vec!["no"]);
    }
}
