//! Line classification for the managed region
//!
//! From ssh_config(5): the file contains keyword-argument pairs, one per
//! line. Lines starting with `#` and empty lines are comments. Arguments may
//! be enclosed in double quotes to contain spaces. Keywords and arguments are
//! separated by whitespace or by optional whitespace and exactly one `=`.
//!
//! This is not a full ssh_config grammar (`Match` blocks are not
//! understood); it covers what appears inside a generated block in practice
//! and tolerates anything else.

use regex::Regex;
use std::sync::LazyLock;

/// First line of the managed region
pub const BEGIN_MARKER: &str = "# Google Compute Engine Section";

/// Last line of the managed region
pub const END_MARKER: &str = "# End of Google Compute Engine Section";

/// Comment placed in a freshly synthesized region, one entry per line
pub const GENERATED_COMMENT: [&str; 2] = [
    "# This block has been generated by gce-ssh-sync",
    "# It should be safe to edit manually.",
];

static BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*$").expect("Invalid blank line regex"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*#").expect("Invalid comment regex"));

static HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*Host[ \t]+(.+)$").expect("Invalid host regex"));

static KEYWORD_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<indent>[ \t]*)(?P<keyword>[^ \t=]+)(?P<sep>[ \t]*=[ \t]*|[ \t]+)(?P<value>.+?)[ \t]*$"#,
    )
    .expect("Invalid keyword-value regex")
});

/// What a single line of the config is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    BeginMarker,
    EndMarker,
    Blank,
    Comment,
    /// `Host <name>`
    Host { name: &'a str },
    /// `<indent><keyword><sep><value>`, value unquoted
    KeywordValue {
        indent: &'a str,
        keyword: &'a str,
        separator: &'a str,
        value: &'a str,
    },
    /// Anything else; logged and skipped by the parser
    Unrecognized,
}

/// Classify one line. Matchers are tried in a fixed priority order.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with(BEGIN_MARKER) {
        return LineKind::BeginMarker;
    }
    if line.starts_with(END_MARKER) {
        return LineKind::EndMarker;
    }

    let line = strip_newline(line);
    if BLANK.is_match(line) {
        return LineKind::Blank;
    }
    if COMMENT.is_match(line) {
        return LineKind::Comment;
    }

    if let Some(caps) = HOST.captures(line) {
        let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        return LineKind::Host { name };
    }

    if let Some(caps) = KEYWORD_VALUE.captures(line) {
        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();
        return LineKind::KeywordValue {
            indent: group("indent"),
            keyword: group("keyword"),
            separator: group("sep"),
            value: unquote(group("value")),
        };
    }

    LineKind::Unrecognized
}

/// Remove one pair of surrounding double quotes, if present.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Quote `value` when it contains a space or when `force` is set.
pub fn quote(value: &str, force: bool) -> String {
    if force || value.contains(' ') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Format a keyword-value line, newline included.
pub fn format_line(indent: &str, keyword: &str, separator: &str, value: &str) -> String {
    format!("{indent}{keyword}{separator}{value}\n")
}

/// The line without its trailing `\n` / `\r\n`.
pub fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\n")]
    #[case("   \t\n")]
    #[case("")]
    fn test_blank_lines(#[case] line: &str) {
        assert_eq!(classify(line), LineKind::Blank);
    }

    #[rstest]
    #[case("# a comment\n")]
    #[case("    # indented comment\n")]
    #[case("#\n")]
    fn test_comment_lines(#[case] line: &str) {
        assert_eq!(classify(line), LineKind::Comment);
    }

    #[test]
    fn test_markers_take_priority_over_comments() {
        assert_eq!(classify(&format!("{BEGIN_MARKER}\n")), LineKind::BeginMarker);
        assert_eq!(classify(&format!("{END_MARKER}\n")), LineKind::EndMarker);
        assert_eq!(
            classify(&format!("{BEGIN_MARKER} (trailing text)\n")),
            LineKind::BeginMarker
        );
    }

    #[test]
    fn test_indented_marker_is_just_a_comment() {
        assert_eq!(classify(&format!("  {BEGIN_MARKER}\n")), LineKind::Comment);
    }

    #[rstest]
    #[case("Host alpha\n", "alpha")]
    #[case("  Host   spaced.name  \n", "spaced.name")]
    #[case("Host\ttabbed\n", "tabbed")]
    fn test_host_lines(#[case] line: &str, #[case] name: &str) {
        assert_eq!(classify(line), LineKind::Host { name });
    }

    #[test]
    fn test_host_keyword_is_case_sensitive() {
        assert!(matches!(
            classify("host alpha\n"),
            LineKind::KeywordValue { keyword: "host", .. }
        ));
    }

    #[test]
    fn test_hostname_is_not_a_host_header() {
        assert!(matches!(
            classify("    HostName 1.2.3.4\n"),
            LineKind::KeywordValue {
                keyword: "HostName",
                value: "1.2.3.4",
                ..
            }
        ));
    }

    #[rstest]
    #[case("    User zor\n", "    ", "User", " ", "zor")]
    #[case("  Port=22\n", "  ", "Port", "=", "22")]
    #[case("\tPort = 22\n", "\t", "Port", " = ", "22")]
    #[case("Port   22  \n", "", "Port", "   ", "22")]
    #[case("    User \"narcissus maximus\"\n", "    ", "User", " ", "narcissus maximus")]
    fn test_keyword_value_lines(
        #[case] line: &str,
        #[case] indent: &str,
        #[case] keyword: &str,
        #[case] separator: &str,
        #[case] value: &str,
    ) {
        assert_eq!(
            classify(line),
            LineKind::KeywordValue {
                indent,
                keyword,
                separator,
                value
            }
        );
    }

    #[test]
    fn test_single_word_is_unrecognized() {
        assert_eq!(
            classify("Single_keyword_directive_are_not_supported\n"),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain", false), "plain");
        assert_eq!(quote("with space", false), "\"with space\"");
        assert_eq!(quote("plain", true), "\"plain\"");
    }
}
