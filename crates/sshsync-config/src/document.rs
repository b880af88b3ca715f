//! The SSH config document and its managed region
//!
//! A [`ConfigDocument`] holds the file as physical lines and an index of the
//! `Host` entries found between the begin and end markers. Every mutation
//! edits the line buffer directly and re-bases the stored positions in the
//! same call, so the index is always valid between operations.

use std::fmt;
use std::path::{Path, PathBuf};

use sshsync_fs::BackupName;

use crate::case_map::CaseInsensitiveMap;
use crate::diff::{DEFAULT_CONTEXT, DiffRows};
use crate::error::{Error, Result};
use crate::grammar::{self, BEGIN_MARKER, END_MARKER, GENERATED_COMMENT, LineKind};
use crate::template::{ADDRESS_KEYWORD, HostTemplate, RenderOptions};

/// Label used in diffs for documents that don't come from a file
const DETACHED_LABEL: &str = "original";

/// One keyword-value line of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub line: usize,
    /// Unquoted value
    pub value: String,
    pub indent: String,
    pub separator: String,
}

/// A `Host` entry inside the managed region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRecord {
    line: usize,
    /// Headers of later blocks with the same name, merged into this one
    repeats: Vec<usize>,
    params: CaseInsensitiveMap<Vec<Param>>,
}

impl EntryRecord {
    fn new(line: usize) -> Self {
        Self {
            line,
            repeats: Vec::new(),
            params: CaseInsensitiveMap::new(),
        }
    }

    /// Position of the `Host` line.
    pub fn header_line(&self) -> usize {
        self.line
    }

    /// Parameters by keyword, in first-seen casing and order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &[Param])> {
        self.params.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// First occurrence of `keyword`, which is the one ssh honours.
    pub fn param(&self, keyword: &str) -> Option<&Param> {
        self.params.get(keyword).and_then(|v| v.first())
    }

    /// Every value given for `keyword`, in file order.
    pub fn values(&self, keyword: &str) -> Option<Vec<&str>> {
        self.params
            .get(keyword)
            .map(|params| params.iter().map(|p| p.value.as_str()).collect())
    }

    /// The address this entry points at.
    pub fn address(&self) -> Option<&str> {
        self.param(ADDRESS_KEYWORD).map(|p| p.value.as_str())
    }

    /// Header and parameter positions, ascending.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![self.line];
        positions.extend(&self.repeats);
        positions.extend(self.params.values().flatten().map(|p| p.line));
        positions.sort_unstable();
        positions
    }

    fn push_param(&mut self, keyword: &str, param: Param) {
        self.params.entry_or_insert_with(keyword, Vec::new).push(param);
    }

    fn shift(&mut self, f: &impl Fn(usize) -> usize) {
        self.line = f(self.line);
        for line in &mut self.repeats {
            *line = f(*line);
        }
        for param in self.params.values_mut().flatten() {
            param.line = f(param.line);
        }
    }
}

/// What [`ConfigDocument::upsert`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Entry exists and already points at the address
    Unchanged,
    /// Address line rewritten
    Updated,
    /// New entry appended to the region
    Inserted { lines: usize },
}

/// An SSH config file with a managed region
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: Option<PathBuf>,
    lines: Vec<String>,
    original: Vec<String>,
    begin: usize,
    end: usize,
    entries: CaseInsensitiveMap<EntryRecord>,
    dirty: bool,
}

struct Parsed {
    region: Option<(usize, usize)>,
    entries: CaseInsensitiveMap<EntryRecord>,
}

impl ConfigDocument {
    /// Read and parse the file at `path` (`~` is expanded).
    ///
    /// A missing file is treated as empty; it is created on save.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = sshsync_fs::expand_home(path);
        let text = sshsync_fs::io::read_text_or_empty(&path)?;
        tracing::debug!(path = %path.display(), "loaded ssh config");
        Self::from_lines(Some(path), split_lines(&text))
    }

    /// Parse in-memory text. The result can't be saved or backed up.
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::from_lines(None, split_lines(text))
    }

    fn from_lines(path: Option<PathBuf>, lines: Vec<String>) -> Result<Self> {
        let mut doc = Self {
            path,
            original: lines.clone(),
            lines,
            begin: 0,
            end: 0,
            entries: CaseInsensitiveMap::new(),
            dirty: false,
        };
        doc.reparse()?;
        Ok(doc)
    }

    fn reparse(&mut self) -> Result<()> {
        let parsed = parse(&self.lines)?;
        self.entries = parsed.entries;
        match parsed.region {
            Some((begin, end)) => {
                self.begin = begin;
                self.end = end;
            }
            None => self.synthesize_region(),
        }
        Ok(())
    }

    fn synthesize_region(&mut self) {
        if let Some(last) = self.lines.last_mut()
            && !last.ends_with('\n')
        {
            last.push('\n');
        }

        self.lines.push("\n".to_string());
        self.begin = self.lines.len();
        self.lines.push(format!("{BEGIN_MARKER}\n"));
        self.lines
            .extend(GENERATED_COMMENT.iter().map(|c| format!("{c}\n")));
        self.end = self.lines.len();
        self.lines.push(format!("{END_MARKER}\n"));
        self.dirty = true;

        tracing::debug!("no managed region found, appended one at line {}", self.begin + 1);
    }

    /// Update the entry if it exists, insert it otherwise.
    pub fn upsert(
        &mut self,
        name: &str,
        address: &str,
        identifier: &str,
        template: &HostTemplate,
    ) -> Upsert {
        match self.update(name, address) {
            Some(true) => Upsert::Updated,
            Some(false) => Upsert::Unchanged,
            None => Upsert::Inserted {
                lines: self.insert(name, address, identifier, template),
            },
        }
    }

    /// Point an existing entry at `address`.
    ///
    /// Returns `None` for an unknown entry, `Some(false)` when the address
    /// is already current. Only the address line is rewritten, keeping its
    /// indentation, keyword casing and separator. An entry without an
    /// address line gets one right under its header.
    pub fn update(&mut self, name: &str, address: &str) -> Option<bool> {
        let entry = self.entries.get(name)?;

        let Some(param) = entry.param(ADDRESS_KEYWORD) else {
            let header = entry.line;
            let indent = entry
                .params
                .values()
                .flatten()
                .next()
                .map(|p| p.indent.clone())
                .unwrap_or_else(|| RenderOptions::default().indent);
            let param = Param {
                line: header + 1,
                value: address.to_string(),
                indent,
                separator: " ".to_string(),
            };
            let text = grammar::format_line(
                &param.indent,
                ADDRESS_KEYWORD,
                &param.separator,
                &grammar::quote(address, false),
            );

            self.insert_lines_at(header + 1, vec![text]);
            // The new line sits right under the header, ahead of every other param
            if let Some(entry) = self.entries.get_mut(name) {
                entry.params.insert_first(ADDRESS_KEYWORD, vec![param]);
            }
            self.dirty = true;
            return Some(true);
        };

        if param.value == address {
            return Some(false);
        }

        let keyword = entry
            .params
            .original_key(ADDRESS_KEYWORD)
            .unwrap_or(ADDRESS_KEYWORD);
        self.lines[param.line] = grammar::format_line(
            &param.indent,
            keyword,
            &param.separator,
            &grammar::quote(address, false),
        );

        if let Some(param) = self
            .entries
            .get_mut(name)
            .and_then(|e| e.params.get_mut(ADDRESS_KEYWORD))
            .and_then(|params| params.first_mut())
        {
            param.value = address.to_string();
        }
        self.dirty = true;
        Some(true)
    }

    /// Append a new entry rendered from `template` at the end of the region.
    ///
    /// The block is a blank separator line, the `Host` header and the
    /// template's lines with address and host-key alias filled in. An
    /// existing entry of the same name is removed first. Returns the number
    /// of lines added.
    pub fn insert(
        &mut self,
        name: &str,
        address: &str,
        identifier: &str,
        template: &HostTemplate,
    ) -> usize {
        if self.remove(name).is_some() {
            tracing::debug!("replacing existing entry {name}");
        }

        let options = RenderOptions::gce();
        let rendered = template
            .materialize(address, identifier)
            .render_fields(&options);

        let at = self.end;
        let mut block = vec!["\n".to_string(), format!("Host {name}\n")];
        block.extend(rendered.iter().map(|line| line.text.clone()));
        let count = block.len();
        self.insert_lines_at(at, block);

        let mut record = EntryRecord::new(at + 1);
        for (offset, line) in rendered.into_iter().enumerate() {
            record.push_param(
                line.keyword,
                Param {
                    line: at + 2 + offset,
                    value: line.value,
                    indent: options.indent.clone(),
                    separator: options.separator.clone(),
                },
            );
        }
        self.entries.insert(name, record);
        self.dirty = true;
        count
    }

    /// Delete an entry and all of its lines.
    ///
    /// The blank line right above the header goes too when it is inside the
    /// region. Returns the number of lines removed, `None` if the entry is
    /// unknown (nothing changes then).
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let (_, entry) = self.entries.remove(name)?;

        let mut doomed = entry.positions();
        let headers = std::iter::once(entry.line).chain(entry.repeats.iter().copied());
        let separators: Vec<usize> = headers
            .filter_map(|header| header.checked_sub(1))
            .filter(|&above| {
                above > self.begin
                    && !doomed.contains(&above)
                    && matches!(grammar::classify(&self.lines[above]), LineKind::Blank)
            })
            .collect();
        doomed.extend(separators);
        doomed.sort_unstable();
        doomed.dedup();

        for &pos in doomed.iter().rev() {
            self.lines.remove(pos);
        }
        self.shift_positions(&|pos| pos - doomed.partition_point(|&d| d < pos));

        self.dirty = true;
        Some(doomed.len())
    }

    fn insert_lines_at(&mut self, at: usize, new_lines: Vec<String>) {
        let count = new_lines.len();
        self.lines.splice(at..at, new_lines);
        self.shift_positions(&|pos| if pos >= at { pos + count } else { pos });
    }

    fn shift_positions(&mut self, f: &impl Fn(usize) -> usize) {
        self.begin = f(self.begin);
        self.end = f(self.end);
        for entry in self.entries.values_mut() {
            entry.shift(f);
        }
    }

    /// Entries whose name satisfies `predicate`.
    pub fn entries_matching<F>(&self, predicate: F) -> impl Iterator<Item = (&str, &EntryRecord)>
    where
        F: Fn(&str) -> bool,
    {
        self.entries.iter().filter(move |(name, _)| predicate(*name))
    }

    /// Entries named `<instance>.<namespace>` for the given namespace.
    pub fn entries_of_namespace<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a EntryRecord)> {
        self.entries_matching(move |name| namespace_of(name) == Some(namespace))
    }

    /// Differences against the loaded text, two lines of context.
    ///
    /// `None` when nothing changed.
    pub fn diff(&self) -> Option<DiffRows<'_>> {
        self.diff_with_context(DEFAULT_CONTEXT)
    }

    pub fn diff_with_context(&self, context: usize) -> Option<DiffRows<'_>> {
        if !self.dirty {
            return None;
        }
        let from = self
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DETACHED_LABEL.to_string());
        Some(DiffRows::new(&self.original, &self.lines, from, context))
    }

    /// The full text as it would be written.
    pub fn serialize(&self) -> String {
        self.lines.concat()
    }

    /// Copy the file on disk next to itself.
    ///
    /// Returns `None` when there is no file yet.
    pub fn backup(&self, name: &BackupName) -> Result<Option<PathBuf>> {
        let path = self.path.as_deref().ok_or(Error::Detached)?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "nothing to back up");
            return Ok(None);
        }
        Ok(Some(sshsync_fs::create_backup(path, name)?))
    }

    /// Write the document back and start over from the written text.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.path.clone().ok_or(Error::Detached)?;
        sshsync_fs::io::write_text(&path, &self.serialize())?;
        self.rebaseline()?;
        Ok(path)
    }

    /// Treat the current text as freshly loaded.
    pub fn rebaseline(&mut self) -> Result<()> {
        self.original = self.lines.clone();
        self.dirty = false;
        self.reparse()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Position of the begin marker line
    pub fn begin_marker(&self) -> usize {
        self.begin
    }

    /// Position of the end marker line
    pub fn end_marker(&self) -> usize {
        self.end
    }

    pub fn entry(&self, name: &str) -> Option<&EntryRecord> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &EntryRecord)> {
        self.entries.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => writeln!(f, "ConfigDocument at {}\n", path.display())?,
            None => writeln!(f, "ConfigDocument\n")?,
        }
        for (i, line) in self.lines.iter().enumerate() {
            write!(f, "{i:04} | {line}")?;
        }
        Ok(())
    }
}

/// The trailing dotted component of an entry name, if any.
pub fn namespace_of(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, namespace)| namespace)
        .filter(|namespace| !namespace.is_empty())
}

/// The leading dotted component of an entry name.
pub fn instance_of(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

fn parse(lines: &[String]) -> Result<Parsed> {
    let mut begin = None;
    let mut end = None;
    let mut orphan_end = None;
    let mut entries: CaseInsensitiveMap<EntryRecord> = CaseInsensitiveMap::new();
    let mut current: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        let kind = grammar::classify(line);
        match kind {
            LineKind::BeginMarker => {
                if begin.is_some() {
                    return Err(Error::DuplicateBeginMarker { line: i });
                }
                if let Some(end) = orphan_end {
                    return Err(Error::EndBeforeBegin { end, begin: i });
                }
                begin = Some(i);
                continue;
            }
            LineKind::EndMarker => {
                match (begin, end) {
                    (None, _) => {
                        orphan_end.get_or_insert(i);
                    }
                    (Some(_), None) => end = Some(i),
                    (Some(_), Some(first)) => tracing::warn!(
                        "Ignoring extra end marker at line {} (region ends at line {})",
                        i + 1,
                        first + 1
                    ),
                }
                continue;
            }
            LineKind::Blank | LineKind::Comment => continue,
            _ => {}
        }

        if begin.is_none() || end.is_some() {
            continue;
        }

        match kind {
            LineKind::Host { name } => {
                match entries.get_mut(name) {
                    Some(entry) => {
                        tracing::warn!(
                            "Host {name} defined again at line {}, merged with the block at line {}",
                            i + 1,
                            entry.line + 1
                        );
                        entry.repeats.push(i);
                    }
                    None => {
                        entries.insert(name, EntryRecord::new(i));
                    }
                }
                current = Some(name.to_string());
            }
            LineKind::KeywordValue {
                indent,
                keyword,
                separator,
                value,
            } => match current.as_deref().and_then(|name| entries.get_mut(name)) {
                Some(entry) => entry.push_param(
                    keyword,
                    Param {
                        line: i,
                        value: value.to_string(),
                        indent: indent.to_string(),
                        separator: separator.to_string(),
                    },
                ),
                None => tracing::debug!(
                    "Keyword `{keyword}` assignment outside of Host block at line {}",
                    i + 1
                ),
            },
            _ => tracing::debug!(
                "Can't match line #{}: {}",
                i + 1,
                grammar::strip_newline(line)
            ),
        }
    }

    let region = match (begin, end, orphan_end) {
        (Some(begin), Some(end), _) => Some((begin, end)),
        (Some(begin), None, _) => return Err(Error::MissingEndMarker { begin }),
        (None, _, Some(end)) => return Err(Error::MissingBeginMarker { end }),
        (None, _, None) => None,
    };
    Ok(Parsed { region, entries })
}
