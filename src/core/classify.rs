// ModSleuth - core/classify.rs
//
// Entry classification for both log formats.
// Core layer: accepts file content as a string, never touches the filesystem.
//
// Standard format precedence (first match wins):
//   1. case-sensitive substring "warn"/"warning"        -> Warning
//   2. case-insensitive, word-bounded exception keyword -> Error
//   3. otherwise                                        -> Clean
// The substring/word-boundary asymmetry is intentional and must be kept:
// "Warning:" (capital W) misses rule 1 but hits rule 2 via the "warning"
// keyword, which is how existing reports have always counted it.

use crate::core::model::{FileClassification, LogEntry, LogFormat, Verdict};
use crate::core::segment::{self, EntryBlock};
use crate::util::constants;
use crate::util::logging::preview;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Returns the compiled exception pattern: `(?i)\b(?:kw1|kw2|...)\b`.
fn exception_regex() -> &'static Regex {
    static EXCEPTION: OnceLock<Regex> = OnceLock::new();
    EXCEPTION.get_or_init(|| {
        let mut keywords: Vec<&str> = constants::EXCEPTION_KEYWORDS.to_vec();
        // Longest first so the leftmost match is the most specific keyword.
        keywords.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\b(?:{alternation})\b");
        // Built from fixed constants; exercised by the unit tests below.
        Regex::new(&pattern).expect("invalid exception regex")
    })
}

/// Normalise a standard-format block: join, trim, escape `|` for tables.
pub fn normalize_entry_text(lines: &[&str]) -> String {
    lines.join("\n").trim().replace('|', r"\|")
}

/// Classify one normalised entry text.
pub fn classify_text(text: &str) -> Verdict {
    if constants::WARNING_SUBSTRINGS
        .iter()
        .any(|needle| text.contains(needle))
    {
        Verdict::Warning
    } else if exception_regex().is_match(text) {
        Verdict::Error
    } else {
        Verdict::Clean
    }
}

/// Classify one standard-format block from `source_file`.
pub fn classify_block(block: &EntryBlock<'_>, source_file: &Path) -> LogEntry {
    let text = normalize_entry_text(&block.lines);
    let verdict = classify_text(&text);
    LogEntry {
        source_file: source_file.to_path_buf(),
        line_number: block.line_number,
        text,
        verdict,
    }
}

/// Classify every entry in standard-format content.
///
/// Returns an iterator so callers that only need counts never hold the
/// full entry list.
pub fn classify_standard<'a>(
    content: &'a str,
    source_file: &'a Path,
) -> impl Iterator<Item = LogEntry> + 'a {
    segment::timestamp_entries(content).map(move |block| classify_block(&block, source_file))
}

/// Classify every block in redscript content.
///
/// Every block is a warning; the dialect never reports errors through
/// this path and no keyword filtering is applied.
pub fn classify_redscript<'a>(
    content: &'a str,
    source_file: &'a Path,
) -> impl Iterator<Item = LogEntry> + 'a {
    segment::redscript_blocks(content).map(move |block| LogEntry {
        source_file: source_file.to_path_buf(),
        line_number: block.line_number,
        text: block.joined(),
        verdict: Verdict::Warning,
    })
}

/// Classify a whole file, selecting the classifier by `format`.
pub fn classify_file(content: &str, path: &Path, format: LogFormat) -> FileClassification {
    let entries: Box<dyn Iterator<Item = LogEntry> + '_> = match format {
        LogFormat::Standard => Box::new(classify_standard(content, path)),
        LogFormat::Redscript => Box::new(classify_redscript(content, path)),
    };

    let mut result = FileClassification {
        path: path.to_path_buf(),
        format,
        entry_count: 0,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    for entry in entries {
        result.entry_count += 1;
        match entry.verdict {
            Verdict::Warning => {
                tracing::trace!(
                    file = %path.display(),
                    line = entry.line_number,
                    text = preview(&entry.text),
                    "Warning entry"
                );
                result.warnings.push(entry.into());
            }
            Verdict::Error => {
                tracing::trace!(
                    file = %path.display(),
                    line = entry.line_number,
                    text = preview(&entry.text),
                    "Error entry"
                );
                result.errors.push(entry.into());
            }
            Verdict::Clean => {}
        }
    }

    tracing::debug!(
        file = %path.display(),
        format = ?format,
        entries = result.entry_count,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Classification complete"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_substring_wins_over_error_keyword() {
        assert_eq!(classify_text("error: warning state detected"), Verdict::Warning);
    }

    #[test]
    fn warning_substring_is_not_word_bounded() {
        assert_eq!(classify_text("forewarned is forearmed"), Verdict::Warning);
    }

    #[test]
    fn warning_substring_is_case_sensitive() {
        // "WARN" misses the substring rule but is an exception keyword.
        assert_eq!(classify_text("[WARN] texture missing"), Verdict::Error);
        assert_eq!(classify_text("Warning: capital W"), Verdict::Error);
    }

    #[test]
    fn error_keywords_are_case_insensitive() {
        assert_eq!(classify_text("FAILED to load plugin"), Verdict::Error);
        assert_eq!(classify_text("Stack Trace follows"), Verdict::Error);
        assert_eq!(classify_text("file does not exist"), Verdict::Error);
        assert_eq!(classify_text("attempt to index a nil value"), Verdict::Error);
        assert_eq!(classify_text("path doesn't exist"), Verdict::Error);
    }

    #[test]
    fn error_keywords_are_word_bounded() {
        assert_eq!(classify_text("terrorist mode enabled"), Verdict::Clean);
        assert_eq!(classify_text("unfailedness"), Verdict::Clean);
        assert_eq!(classify_text("3 errors found"), Verdict::Error);
    }

    #[test]
    fn plain_text_is_clean() {
        assert_eq!(classify_text("[2024-01-01 00:00:00] started"), Verdict::Clean);
        assert_eq!(classify_text(""), Verdict::Clean);
    }

    #[test]
    fn pipes_are_escaped_and_text_trimmed() {
        let text = normalize_entry_text(&["  a | b", "c|d  "]);
        assert_eq!(text, "a \\| b\nc\\|d");
    }

    #[test]
    fn classify_file_counts_each_entry_once() {
        let content = "\
[2024-01-01 00:00:00] started
  detail line
[2024-01-01 00:00:01] warning: low memory
[2024-01-01 00:00:02] Failed to open archive
[2024-01-01 00:00:03] ok
";
        let result = classify_file(content, Path::new("game.log"), LogFormat::Standard);
        assert_eq!(result.entry_count, 4);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.warnings[0].text,
            "[2024-01-01 00:00:01] warning: low memory"
        );
        assert_eq!(
            result.errors[0].text,
            "[2024-01-01 00:00:02] Failed to open archive"
        );
        assert!(!result.is_clean());
    }

    #[test]
    fn redscript_blocks_are_all_warnings_without_keyword_checks() {
        let content = "[WARN - x] harmless text\n  at line 1\n^^^\n[INFO] compiled\n";
        let result = classify_file(
            content,
            Path::new("redscript_rCURRENT.log"),
            LogFormat::Redscript,
        );
        assert_eq!(result.entry_count, 1);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].text, "[WARN - x] harmless text\n  at line 1");
    }

    #[test]
    fn redscript_text_keeps_pipes_unescaped() {
        let content = "[WARN] a | b\n";
        let entries: Vec<_> = classify_redscript(content, Path::new("r.log")).collect();
        assert_eq!(entries[0].text, "[WARN] a | b");
    }

    #[test]
    fn every_entry_gets_exactly_one_verdict() {
        let content = "\
no timestamp prefix
[2024-01-01 00:00:00] warn
[2024-01-01 00:00:01] error
[2024-01-01 00:00:02] fine
";
        let verdicts: Vec<Verdict> = classify_standard(content, Path::new("x.log"))
            .map(|e| e.verdict)
            .collect();
        assert_eq!(
            verdicts,
            vec![Verdict::Clean, Verdict::Warning, Verdict::Error, Verdict::Clean]
        );
    }
}
