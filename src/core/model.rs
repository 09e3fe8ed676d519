// ModSleuth - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Verdict
// =============================================================================

/// Classification outcome for a single log entry. Exactly one per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Warning,
    Error,
    Clean,
}

impl Verdict {
    /// Returns all variants in report order.
    pub fn all() -> &'static [Verdict] {
        &[Verdict::Error, Verdict::Warning, Verdict::Clean]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Warning => "Warning",
            Verdict::Error => "Error",
            Verdict::Clean => "Clean",
        }
    }

    /// Short label for compact display (e.g. table columns).
    pub fn short_label(&self) -> &'static str {
        match self {
            Verdict::Warning => "WARN",
            Verdict::Error => "ERR",
            Verdict::Clean => "OK",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Log format
// =============================================================================

/// Which segmenter/classifier pair handles a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Entries start at `[YYYY-MM-DD HH:MM:SS` lines; classified by keyword.
    Standard,

    /// `[WARN` blocks closed by `^^^` or a blank line; every block is a warning.
    Redscript,
}

impl LogFormat {
    /// Select the format for a file by its name alone.
    pub fn for_file_name(file_name: &str) -> Self {
        if file_name == crate::util::constants::REDSCRIPT_LOG_NAME {
            LogFormat::Redscript
        } else {
            LogFormat::Standard
        }
    }
}

// =============================================================================
// Log entries
// =============================================================================

/// A single logical log entry after classification.
///
/// Created by the classifier from one segmented block and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Path to the source log file.
    pub source_file: PathBuf,

    /// 1-based line number where the entry begins.
    pub line_number: u64,

    /// Lines joined with `\n`, trimmed, and (standard format only)
    /// with `|` escaped for tabular rendering.
    pub text: String,

    pub verdict: Verdict,
}

/// One warning or error as reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    pub source_file: PathBuf,
    pub text: String,
}

impl From<LogEntry> for ClassifiedRecord {
    fn from(entry: LogEntry) -> Self {
        Self {
            source_file: entry.source_file,
            text: entry.text,
        }
    }
}

// =============================================================================
// Per-file classification
// =============================================================================

/// Classification result for one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileClassification {
    pub path: PathBuf,
    pub format: LogFormat,

    /// Number of entries the segmenter produced (all verdicts).
    pub entry_count: usize,

    pub errors: Vec<ClassifiedRecord>,
    pub warnings: Vec<ClassifiedRecord>,
}

impl FileClassification {
    /// A file is clean when it produced neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Outcome of processing one log file: classified, or soft-failed.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Classified(FileClassification),

    /// The file could not be located or opened. Excluded from all counts
    /// except the missing list.
    Missing { path: PathBuf, reason: String },
}

// =============================================================================
// Analysis report
// =============================================================================

/// A file that produced no warnings or errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanFile {
    pub name: String,
    pub path: PathBuf,
}

/// Aggregate totals and per-category records for an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Files that were opened and classified (missing files excluded).
    pub total_files: usize,

    pub error_count: usize,
    pub warning_count: usize,

    /// Files with zero errors and zero warnings.
    pub clean_count: usize,

    pub errors: Vec<ClassifiedRecord>,
    pub warnings: Vec<ClassifiedRecord>,
    pub clean_files: Vec<CleanFile>,
    pub missing: Vec<PathBuf>,
}

// =============================================================================
// Discovered file (output of discovery phase)
// =============================================================================

/// Metadata about a file found during directory scanning, before reading.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp.
    pub modified: Option<DateTime<Utc>>,

    /// Whether this file exceeds the large file threshold.
    pub is_large: bool,
}

// =============================================================================
// Load order
// =============================================================================

/// "Place `dependents` immediately before `target`", in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRule {
    pub target: String,
    pub dependents: Vec<String>,
}

/// Result of applying a rule set to a load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Final load order; every input name appears exactly once.
    pub order: Vec<String>,

    /// Number of dependents relocated by rules in this pass.
    pub overridden: usize,

    /// Targets of rules skipped because the target or a dependent is not
    /// installed.
    pub dropped_rules: Vec<String>,
}

impl Resolution {
    /// Number of positions whose name differs from `input` at the same index.
    ///
    /// Zero means the resolver left `input` exactly as it was.
    pub fn displaced(&self, input: &[String]) -> usize {
        let common = self
            .order
            .iter()
            .zip(input)
            .filter(|(a, b)| a != b)
            .count();
        common + self.order.len().abs_diff(input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_selected_by_exact_file_name() {
        assert_eq!(
            LogFormat::for_file_name("redscript_rCURRENT.log"),
            LogFormat::Redscript
        );
        assert_eq!(
            LogFormat::for_file_name("redscript_rCURRENT.log.old"),
            LogFormat::Standard
        );
        assert_eq!(LogFormat::for_file_name("cet.log"), LogFormat::Standard);
    }

    #[test]
    fn report_order_lists_errors_first() {
        assert_eq!(
            Verdict::all(),
            &[Verdict::Error, Verdict::Warning, Verdict::Clean]
        );
        assert_eq!(Verdict::Warning.short_label(), "WARN");
    }

    #[test]
    fn displaced_counts_changed_positions() {
        let input: Vec<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        let resolution = Resolution {
            order: ["a", "b", "c"].iter().map(|s| s.to_string()).collect(),
            overridden: 0,
            dropped_rules: Vec::new(),
        };
        assert_eq!(resolution.displaced(&input), 2);
        assert_eq!(resolution.displaced(&resolution.order.clone()), 0);
    }

    #[test]
    fn file_without_records_is_clean() {
        let file = FileClassification {
            path: PathBuf::from("a.log"),
            format: LogFormat::Standard,
            entry_count: 3,
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        assert!(file.is_clean());
    }
}
