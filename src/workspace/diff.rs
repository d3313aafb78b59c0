//! Line-level change tracking between a file's saved and live content.
//!
//! Ranges use 1-based line numbers in the current buffer. `Added` and
//! `Unchanged` ranges tile the current buffer contiguously; a `Removed`
//! range records the line it was removed before and does not advance the
//! numbering, since those lines no longer exist in the buffer.

use similar::{Algorithm, DiffTag, TextDiff};

use super::FileId;
use super::session_state::OpenFile;

pub const DIRTY_LINE_CLASS: &str = "dirty-line-highlight";
pub const DIRTY_GUTTER_CLASS: &str = "dirty-line-gutter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRange {
    pub change: LineChange,
    pub start_line: usize,
    pub line_count: usize,
}

impl LineRange {
    pub fn end_line(&self) -> usize {
        self.start_line + self.line_count.saturating_sub(1)
    }
}

/// Computes the line diff of `original` against `current` using a longest
/// common subsequence. Adjacent ranges of the same kind are merged.
pub fn diff_lines(original: &str, current: &str) -> Vec<LineRange> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_lines(original, current);

    let mut ranges: Vec<LineRange> = Vec::new();
    let mut line = 1;

    let mut push = |change: LineChange, count: usize, line: &mut usize| {
        if count == 0 {
            return;
        }
        let start_line = *line;
        if change != LineChange::Removed {
            *line += count;
        }
        match ranges.last_mut() {
            Some(last) if last.change == change => last.line_count += count,
            _ => ranges.push(LineRange {
                change,
                start_line,
                line_count: count,
            }),
        }
    };

    for op in diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push(LineChange::Unchanged, new.len(), &mut line),
            DiffTag::Delete => push(LineChange::Removed, old.len(), &mut line),
            DiffTag::Insert => push(LineChange::Added, new.len(), &mut line),
            DiffTag::Replace => {
                push(LineChange::Removed, old.len(), &mut line);
                push(LineChange::Added, new.len(), &mut line);
            }
        }
    }

    ranges
}

/// Whole-line highlight applied to the editor for an added range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub start_line: usize,
    pub end_line: usize,
    pub is_whole_line: bool,
    pub class_name: &'static str,
    pub glyph_margin_class_name: &'static str,
}

/// Only added lines are visible in the current buffer, so only they are
/// decorated.
pub fn added_decorations(ranges: &[LineRange]) -> Vec<Decoration> {
    ranges
        .iter()
        .filter(|r| r.change == LineChange::Added)
        .map(|r| Decoration {
            start_line: r.start_line,
            end_line: r.end_line(),
            is_whole_line: true,
            class_name: DIRTY_LINE_CLASS,
            glyph_margin_class_name: DIRTY_GUTTER_CLASS,
        })
        .collect()
}

/// The embedded editor widget, as far as decorations are concerned.
pub trait EditorSurface {
    /// Replaces the decorations identified by `old` with `new`, returning
    /// the identifiers of the new set.
    fn delta_decorations(&mut self, old: &[String], new: &[Decoration]) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    id: FileId,
    original: String,
    current: String,
}

impl Snapshot {
    fn matches(&self, file: &OpenFile) -> bool {
        self.id == file.id
            && self.original == file.original_content
            && self.current == file.current_content
    }
}

/// Reapplies diff decorations whenever either snapshot of the tracked file
/// differs from the last one decorated.
#[derive(Debug, Default)]
pub struct DiffTracker {
    seen: Option<Snapshot>,
    applied: Vec<String>,
}

impl DiffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when decorations were recomputed.
    pub fn refresh(&mut self, file: &OpenFile, editor: &mut dyn EditorSurface) -> bool {
        if self.seen.as_ref().is_some_and(|seen| seen.matches(file)) {
            return false;
        }

        let ranges = diff_lines(&file.original_content, &file.current_content);
        let decorations = added_decorations(&ranges);
        self.applied = editor.delta_decorations(&self.applied, &decorations);
        self.seen = Some(Snapshot {
            id: file.id.clone(),
            original: file.original_content.clone(),
            current: file.current_content.clone(),
        });
        true
    }

    pub fn applied(&self) -> &[String] {
        &self.applied
    }
}
