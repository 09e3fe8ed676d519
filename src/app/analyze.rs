// ModSleuth - app/analyze.rs
//
// Analysis run orchestration: discovery, reading, classification, and
// aggregation.
//
// Pipeline:
//   1. discover logs under the game directory (if one is given), then
//      append explicitly listed files
//   2. read + classify every file on the rayon pool; each file is
//      independent, so classification order does not matter
//   3. fold outcomes through the Aggregator in input order so record
//      order in the report is deterministic
//
// Per-file failures are non-fatal: a file that cannot be read becomes a
// `FileOutcome::Missing` and the run continues. Only an invalid game
// directory fails the run.

use crate::core::aggregate;
use crate::core::classify;
use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::model::{AnalysisReport, FileOutcome, LogFormat};
use crate::platform::fs;
use crate::util::error::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What to analyse.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Directory searched recursively for logs.
    pub root: Option<PathBuf>,

    /// Individual log files analysed in addition to (or instead of) `root`.
    pub files: Vec<PathBuf>,

    pub discovery: DiscoveryConfig,
}

/// Result of a completed analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub report: AnalysisReport,

    /// Non-fatal discovery warnings (inaccessible entries, truncation).
    pub warnings: Vec<String>,

    pub duration: Duration,
}

/// One file queued for classification.
#[derive(Debug)]
struct QueuedFile {
    path: PathBuf,
    is_large: bool,
}

/// Run a full analysis.
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisRun> {
    let started = Instant::now();
    let mut queue: Vec<QueuedFile> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(root) = &request.root {
        tracing::info!(root = %root.display(), "Discovering log files");
        let (discovered, discovery_warnings) =
            discovery::discover_files(root, &request.discovery, |file, count| {
                tracing::trace!(
                    file = %file.path.display(),
                    size = file.size,
                    modified = %file.modified.map(|m| m.to_rfc3339()).unwrap_or_default(),
                    count,
                    "File discovered"
                );
            })?;
        warnings.extend(discovery_warnings);
        queue.extend(discovered.into_iter().map(|f| QueuedFile {
            path: f.path,
            is_large: f.is_large,
        }));
    }

    let mut seen: HashSet<PathBuf> = queue.iter().map(|f| f.path.clone()).collect();
    for path in &request.files {
        if !seen.insert(path.clone()) {
            tracing::debug!(file = %path.display(), "Listed file already discovered");
            continue;
        }
        let is_large = std::fs::metadata(path)
            .map(|m| m.len() >= request.discovery.large_file_threshold)
            .unwrap_or(false);
        queue.push(QueuedFile {
            path: path.clone(),
            is_large,
        });
    }

    tracing::info!(files = queue.len(), "Classifying log files");

    let outcomes: Vec<FileOutcome> = queue
        .par_iter()
        .map(|file| process_file(&file.path, file.is_large))
        .collect();

    let report = aggregate::aggregate(outcomes);
    let duration = started.elapsed();

    tracing::info!(
        files = report.total_files,
        errors = report.error_count,
        warnings = report.warning_count,
        clean = report.clean_count,
        missing = report.missing.len(),
        elapsed_ms = duration.as_millis() as u64,
        "Analysis complete"
    );

    Ok(AnalysisRun {
        report,
        warnings,
        duration,
    })
}

/// Read and classify a single file. Never fails.
fn process_file(path: &Path, is_large: bool) -> FileOutcome {
    let content = match fs::read_log_lossy(path, is_large) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Log file could not be read");
            return aggregate::missing(path.to_path_buf(), e.to_string());
        }
    };

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let format = LogFormat::for_file_name(file_name);
    FileOutcome::Classified(classify::classify_file(&content, path, format))
}
