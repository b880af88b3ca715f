//! Line diff between the loaded and the proposed config
//!
//! The comparison is computed once with `similar`; the display rows are then
//! produced one at a time by [`DiffRows`], so a caller can start printing
//! before the whole table exists.

use similar::{DiffOp, DiffTag, TextDiff};

use crate::grammar::strip_newline;

/// Unchanged lines shown around each change
pub const DEFAULT_CONTEXT: usize = 2;

/// Right-hand header label
pub const PROPOSED_LABEL: &str = "proposed changes";

/// How a line pair differs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// One display row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRow<'a> {
    Header {
        from: String,
        to: &'static str,
    },
    /// Unchanged lines were elided here
    Separator,
    /// Side-by-side line; numbers are 1-based, text has no newline
    Line {
        kind: ChangeKind,
        old: Option<(usize, &'a str)>,
        new: Option<(usize, &'a str)>,
    },
}

impl DiffRow<'_> {
    /// Plain side-by-side rendering fitted to `width` columns.
    pub fn render(&self, width: usize) -> String {
        let side = width.saturating_sub(3) / 2;
        match self {
            Self::Header { from, to } => {
                format!("{} | {}", fit(from, side), fit(to, side)).trim_end().to_string()
            }
            Self::Separator => "---".to_string(),
            Self::Line { old, new, .. } => {
                let cell = |half: &Option<(usize, &str)>| match half {
                    Some((no, text)) => fit(&format!("{no:>4} {text}"), side),
                    None => fit("", side),
                };
                format!("{} | {}", cell(old), cell(new)).trim_end().to_string()
            }
        }
    }
}

/// Truncate or pad to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Lazily produced rows of a grouped diff
#[derive(Debug)]
pub struct DiffRows<'a> {
    old: &'a [String],
    new: &'a [String],
    from: Option<String>,
    groups: Vec<Vec<DiffOp>>,
    group: usize,
    op: usize,
    offset: usize,
}

impl<'a> DiffRows<'a> {
    pub fn new(old: &'a [String], new: &'a [String], from: String, context: usize) -> Self {
        let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
        let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
        let groups = TextDiff::from_slices(&old_refs, &new_refs).grouped_ops(context);

        Self {
            old,
            new,
            from: Some(from),
            groups,
            group: 0,
            op: 0,
            offset: 0,
        }
    }

    fn side(lines: &'a [String], range: &std::ops::Range<usize>, i: usize) -> Option<(usize, &'a str)> {
        (i < range.len()).then(|| {
            let idx = range.start + i;
            (idx + 1, strip_newline(&lines[idx]))
        })
    }
}

impl<'a> Iterator for DiffRows<'a> {
    type Item = DiffRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(from) = self.from.take() {
            return Some(DiffRow::Header {
                from,
                to: PROPOSED_LABEL,
            });
        }

        loop {
            let group = self.groups.get(self.group)?;
            let Some(op) = group.get(self.op) else {
                self.group += 1;
                self.op = 0;
                self.offset = 0;
                if self.group < self.groups.len() {
                    return Some(DiffRow::Separator);
                }
                return None;
            };

            let (tag, old_range, new_range) = op.as_tag_tuple();
            let i = self.offset;
            if i >= old_range.len().max(new_range.len()) {
                self.op += 1;
                self.offset = 0;
                continue;
            }
            self.offset += 1;

            let old = Self::side(self.old, &old_range, i);
            let new = Self::side(self.new, &new_range, i);
            let kind = match (tag, &old, &new) {
                (DiffTag::Equal, _, _) => ChangeKind::Equal,
                (DiffTag::Replace, Some(_), Some(_)) => ChangeKind::Replace,
                (_, Some(_), None) => ChangeKind::Delete,
                _ => ChangeKind::Insert,
            };
            return Some(DiffRow::Line { kind, old, new });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(str::to_string).collect()
    }

    #[test]
    fn test_single_change_with_context() {
        let old = lines("a\nb\nc\nd\ne\nf\ng\n");
        let new = lines("a\nb\nc\nD\ne\nf\ng\n");
        let rows: Vec<_> = DiffRows::new(&old, &new, "cfg".into(), 2).collect();

        assert_eq!(
            rows,
            vec![
                DiffRow::Header {
                    from: "cfg".into(),
                    to: PROPOSED_LABEL
                },
                DiffRow::Line {
                    kind: ChangeKind::Equal,
                    old: Some((2, "b")),
                    new: Some((2, "b"))
                },
                DiffRow::Line {
                    kind: ChangeKind::Equal,
                    old: Some((3, "c")),
                    new: Some((3, "c"))
                },
                DiffRow::Line {
                    kind: ChangeKind::Replace,
                    old: Some((4, "d")),
                    new: Some((4, "D"))
                },
                DiffRow::Line {
                    kind: ChangeKind::Equal,
                    old: Some((5, "e")),
                    new: Some((5, "e"))
                },
                DiffRow::Line {
                    kind: ChangeKind::Equal,
                    old: Some((6, "f")),
                    new: Some((6, "f"))
                },
            ]
        );
    }

    #[test]
    fn test_distant_changes_are_separated() {
        let old = lines("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
        let new = lines("one\n2\n3\n4\n5\n6\n7\n8\n9\nten\n");
        let rows: Vec<_> = DiffRows::new(&old, &new, "cfg".into(), 1).collect();

        let separators = rows.iter().filter(|r| **r == DiffRow::Separator).count();
        assert_eq!(separators, 1);
        assert!(matches!(rows.last(), Some(DiffRow::Line { kind: ChangeKind::Replace, .. })));
    }

    #[test]
    fn test_pure_insertion_rows() {
        let old = lines("a\nz\n");
        let new = lines("a\nb\nc\nz\n");
        let kinds: Vec<_> = DiffRows::new(&old, &new, "cfg".into(), 0)
            .filter_map(|row| match row {
                DiffRow::Line { kind, new, .. } => Some((kind, new)),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Insert, Some((2, "b"))),
                (ChangeKind::Insert, Some((3, "c"))),
            ]
        );
    }

    #[test]
    fn test_identical_input_yields_header_only() {
        let old = lines("a\n");
        let rows: Vec<_> = DiffRows::new(&old, &old, "cfg".into(), 2).collect();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_render_side_by_side() {
        let row = DiffRow::Line {
            kind: ChangeKind::Replace,
            old: Some((7, "    HostName 1.1.1.1")),
            new: Some((7, "    HostName 9.9.9.9")),
        };
        assert_eq!(
            row.render(63),
            "   7     HostName 1.1.1.1      |    7     HostName 9.9.9.9"
        );
        assert_eq!(DiffRow::Separator.render(80), "---");
    }
}
