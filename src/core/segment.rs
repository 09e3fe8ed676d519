// ModSleuth - core/segment.rs
//
// Splits raw log lines into logical entries.
//
// Both segmenters are lazy iterator adapters over any `Iterator<Item = &str>`.
// They hold their parse state (the in-progress block) as plain fields, so
// each call site owns its own state and two segmenters never interfere.
// Cloning a segmenter before iteration gives an independent restart point.

use crate::util::constants;
use regex::Regex;
use std::iter::Enumerate;
use std::sync::OnceLock;

/// A group of consecutive raw lines forming one logical entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBlock<'a> {
    /// 1-based line number of the first line in the block.
    pub line_number: u64,

    /// Raw lines, without line terminators.
    pub lines: Vec<&'a str>,
}

impl<'a> EntryBlock<'a> {
    fn start(line_idx: usize, line: &'a str) -> Self {
        Self {
            line_number: line_idx as u64 + 1,
            lines: vec![line],
        }
    }

    /// Lines joined with `\n` and trimmed.
    pub fn joined(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Returns the compiled timestamp boundary pattern.
fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| {
        // Fixed pattern from util::constants; exercised by the unit tests below.
        Regex::new(constants::TIMESTAMP_BOUNDARY_PATTERN).expect("invalid boundary regex")
    })
}

/// Returns true when `line` starts a new standard-format entry.
pub fn is_boundary_line(line: &str) -> bool {
    boundary_regex().is_match(line)
}

// =============================================================================
// Standard format
// =============================================================================

/// Segmenter for the standard timestamped format.
///
/// An entry runs from one boundary line up to (not including) the next.
/// Untimestamped lines attach to the preceding entry; lines before the
/// first boundary form an entry of their own. The final entry does not
/// need a closing boundary.
#[derive(Debug, Clone)]
pub struct TimestampSegments<'a, I> {
    lines: Enumerate<I>,
    pending: Option<EntryBlock<'a>>,
}

impl<'a, I> TimestampSegments<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.enumerate(),
            pending: None,
        }
    }
}

impl<'a, I> Iterator for TimestampSegments<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = EntryBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            if is_boundary_line(line) {
                if let Some(finished) = self.pending.replace(EntryBlock::start(idx, line)) {
                    return Some(finished);
                }
            } else {
                match self.pending.as_mut() {
                    Some(block) => block.lines.push(line),
                    None => self.pending = Some(EntryBlock::start(idx, line)),
                }
            }
        }
        self.pending.take()
    }
}

/// Segment file content in the standard format.
pub fn timestamp_entries(content: &str) -> TimestampSegments<'_, std::str::Lines<'_>> {
    TimestampSegments::new(content.lines())
}

// =============================================================================
// Redscript format
// =============================================================================

/// Segmenter for the redscript dialect.
///
/// - `[WARN...` opens a block, emitting any block already open.
/// - `[INFO...` is discarded everywhere, even inside an open block.
/// - `^^^...` or a blank line closes the open block; the closing line
///   itself is not part of the block.
/// - Any other line is appended to the open block, or ignored when none is open.
/// - A block still open at end of input is emitted.
#[derive(Debug, Clone)]
pub struct RedscriptBlocks<'a, I> {
    lines: Enumerate<I>,
    open: Option<EntryBlock<'a>>,
}

impl<'a, I> RedscriptBlocks<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.enumerate(),
            open: None,
        }
    }
}

impl<'a, I> Iterator for RedscriptBlocks<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = EntryBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            if line.starts_with(constants::REDSCRIPT_WARN_MARKER) {
                if let Some(finished) = self.open.replace(EntryBlock::start(idx, line)) {
                    return Some(finished);
                }
            } else if line.starts_with(constants::REDSCRIPT_INFO_MARKER) {
                continue;
            } else if let Some(block) = self.open.as_mut() {
                if line.starts_with(constants::REDSCRIPT_CLOSE_MARKER) || line.trim().is_empty() {
                    return self.open.take();
                }
                block.lines.push(line);
            }
        }
        self.open.take()
    }
}

/// Segment file content in the redscript dialect.
pub fn redscript_blocks(content: &str) -> RedscriptBlocks<'_, std::str::Lines<'_>> {
    RedscriptBlocks::new(content.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(blocks: impl Iterator<Item = EntryBlock<'a>>) -> Vec<String> {
        blocks.map(|b| b.joined()).collect()
    }

    #[test]
    fn boundary_requires_bracketed_date_and_time_at_line_start() {
        assert!(is_boundary_line("[2024-01-01 00:00:00] started"));
        assert!(is_boundary_line("[2024-01-01 00:00:00.123] started"));
        assert!(is_boundary_line("[2024-01-01\t00:00:00]"));
        assert!(!is_boundary_line(" [2024-01-01 00:00:00] indented"));
        assert!(!is_boundary_line("2024-01-01 00:00:00 no bracket"));
        assert!(!is_boundary_line("[2024-01-01] date only"));
    }

    #[test]
    fn continuation_lines_attach_to_preceding_entry() {
        let lines = [
            "[2024-01-01 00:00:00] started",
            "  detail line",
            "[2024-01-01 00:00:01] warning: low memory",
        ];
        let blocks: Vec<_> = TimestampSegments::new(lines.iter().copied()).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].joined(), "[2024-01-01 00:00:00] started\n  detail line");
        assert_eq!(blocks[0].line_number, 1);
        assert_eq!(blocks[1].joined(), "[2024-01-01 00:00:01] warning: low memory");
        assert_eq!(blocks[1].line_number, 3);
    }

    #[test]
    fn lines_before_first_boundary_form_their_own_entry() {
        let content = "header\nmore header\n[2024-01-01 00:00:00] first\n";
        let out = texts(timestamp_entries(content));
        assert_eq!(out, vec!["header\nmore header", "[2024-01-01 00:00:00] first"]);
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert_eq!(timestamp_entries("").count(), 0);
        assert_eq!(redscript_blocks("").count(), 0);
    }

    #[test]
    fn segmenter_is_restartable_by_clone() {
        let content = "[2024-01-01 00:00:00] a\n[2024-01-01 00:00:01] b\n";
        let segments = timestamp_entries(content);
        let first_pass: Vec<_> = segments.clone().collect();
        let second_pass: Vec<_> = segments.collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass.len(), 2);
    }

    #[test]
    fn segmenter_is_lazy() {
        let content = "[2024-01-01 00:00:00] a\n[2024-01-01 00:00:01] b\n[2024-01-01 00:00:02] c";
        let mut segments = timestamp_entries(content);
        let first = segments.next().expect("first entry");
        assert_eq!(first.joined(), "[2024-01-01 00:00:00] a");
        assert_eq!(segments.count(), 2);
    }

    #[test]
    fn redscript_blocks_close_on_marker_and_skip_info() {
        let lines = [
            "[WARN] issue A",
            "detail",
            "^^^",
            "[INFO] noise",
            "[WARN] issue B",
        ];
        let out = texts(RedscriptBlocks::new(lines.iter().copied()));
        assert_eq!(out, vec!["[WARN] issue A\ndetail", "[WARN] issue B"]);
    }

    #[test]
    fn redscript_info_inside_open_block_is_dropped_without_closing() {
        let lines = ["[WARN] a", "one", "[INFO] noise", "two", ""];
        let out = texts(RedscriptBlocks::new(lines.iter().copied()));
        assert_eq!(out, vec!["[WARN] a\none\ntwo"]);
    }

    #[test]
    fn redscript_blank_line_closes_block() {
        let lines = ["[WARN] a", "one", "   ", "orphan", "[WARN] b"];
        let out = texts(RedscriptBlocks::new(lines.iter().copied()));
        assert_eq!(out, vec!["[WARN] a\none", "[WARN] b"]);
    }

    #[test]
    fn redscript_new_warn_flushes_open_block() {
        let lines = ["[WARN] a", "one", "[WARN] b", "two"];
        let blocks: Vec<_> = RedscriptBlocks::new(lines.iter().copied()).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].joined(), "[WARN] a\none");
        assert_eq!(blocks[1].joined(), "[WARN] b\ntwo");
        assert_eq!(blocks[1].line_number, 3);
    }

    #[test]
    fn redscript_lines_outside_blocks_are_ignored() {
        let lines = ["compiling...", "done", "[ERROR] not a warn marker"];
        assert_eq!(RedscriptBlocks::new(lines.iter().copied()).count(), 0);
    }
}
