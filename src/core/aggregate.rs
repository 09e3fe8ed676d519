// ModSleuth - core/aggregate.rs
//
// Folds per-file classification outcomes into an `AnalysisReport`.
//
// Accumulation is commutative for all counts and set-equal for category
// membership, so files may be classified in any order (or in parallel)
// and merged afterwards. Record order follows the order outcomes are
// recorded; callers that want a stable report record in input order.

use crate::core::model::{AnalysisReport, CleanFile, FileClassification, FileOutcome};
use std::path::PathBuf;

/// Accumulates file outcomes into report totals.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    report: AnalysisReport,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single file outcome.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Classified(file) => self.record_classified(file),
            FileOutcome::Missing { path, reason } => {
                tracing::debug!(file = %path.display(), reason = %reason, "Log file missing");
                self.report.missing.push(path);
            }
        }
    }

    fn record_classified(&mut self, file: FileClassification) {
        let report = &mut self.report;
        report.total_files += 1;

        if file.is_clean() {
            report.clean_count += 1;
            report.clean_files.push(CleanFile {
                name: file_name(&file.path),
                path: file.path,
            });
            return;
        }

        report.error_count += file.errors.len();
        report.warning_count += file.warnings.len();
        report.errors.extend(file.errors);
        report.warnings.extend(file.warnings);
    }

    /// Combine two partial aggregations. `other`'s records follow `self`'s.
    pub fn merge(mut self, other: Aggregator) -> Aggregator {
        let report = &mut self.report;
        let other = other.report;
        report.total_files += other.total_files;
        report.error_count += other.error_count;
        report.warning_count += other.warning_count;
        report.clean_count += other.clean_count;
        report.errors.extend(other.errors);
        report.warnings.extend(other.warnings);
        report.clean_files.extend(other.clean_files);
        report.missing.extend(other.missing);
        self
    }

    /// Finish aggregation and return the report.
    pub fn finish(self) -> AnalysisReport {
        self.report
    }
}

impl FromIterator<FileOutcome> for Aggregator {
    fn from_iter<T: IntoIterator<Item = FileOutcome>>(iter: T) -> Self {
        let mut aggregator = Aggregator::new();
        for outcome in iter {
            aggregator.record(outcome);
        }
        aggregator
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convenience: aggregate outcomes in order.
pub fn aggregate<I>(outcomes: I) -> AnalysisReport
where
    I: IntoIterator<Item = FileOutcome>,
{
    outcomes.into_iter().collect::<Aggregator>().finish()
}

/// Convenience for callers that only know a path could not be opened.
pub fn missing(path: PathBuf, reason: impl Into<String>) -> FileOutcome {
    FileOutcome::Missing {
        path,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ClassifiedRecord, LogFormat};

    fn record(path: &str, text: &str) -> ClassifiedRecord {
        ClassifiedRecord {
            source_file: PathBuf::from(path),
            text: text.to_string(),
        }
    }

    fn classified(path: &str, errors: &[&str], warnings: &[&str]) -> FileOutcome {
        FileOutcome::Classified(FileClassification {
            path: PathBuf::from(path),
            format: LogFormat::Standard,
            entry_count: errors.len() + warnings.len() + 1,
            errors: errors.iter().map(|t| record(path, t)).collect(),
            warnings: warnings.iter().map(|t| record(path, t)).collect(),
        })
    }

    fn sample_outcomes() -> Vec<FileOutcome> {
        vec![
            classified("logs/a.log", &["e1", "e2"], &["w1"]),
            classified("logs/b.log", &[], &[]),
            missing(PathBuf::from("logs/gone.log"), "not found"),
            classified("logs/c.log", &[], &["w2", "w3"]),
        ]
    }

    #[test]
    fn totals_and_categories() {
        let report = aggregate(sample_outcomes());
        assert_eq!(report.total_files, 3, "missing files are not processed files");
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 3);
        assert_eq!(report.clean_count, 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(
            report.clean_files,
            vec![CleanFile {
                name: "b.log".to_string(),
                path: PathBuf::from("logs/b.log"),
            }]
        );
        assert_eq!(report.missing, vec![PathBuf::from("logs/gone.log")]);
    }

    #[test]
    fn merge_matches_sequential_accumulation_regardless_of_split_order() {
        let sequential = aggregate(sample_outcomes());

        let mut outcomes = sample_outcomes();
        let tail = outcomes.split_off(2);
        let head: Aggregator = outcomes.into_iter().collect();
        let tail: Aggregator = tail.into_iter().collect();

        let forward = head.clone().merge(tail.clone()).finish();
        let reversed = tail.merge(head).finish();

        assert_eq!(forward, sequential);
        for report in [&forward, &reversed] {
            assert_eq!(report.total_files, sequential.total_files);
            assert_eq!(report.error_count, sequential.error_count);
            assert_eq!(report.warning_count, sequential.warning_count);
            assert_eq!(report.clean_count, sequential.clean_count);
        }
        let mut a = reversed.warnings.clone();
        let mut b = sequential.warnings.clone();
        a.sort_by(|x, y| x.text.cmp(&y.text));
        b.sort_by(|x, y| x.text.cmp(&y.text));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let report = aggregate(Vec::new());
        assert_eq!(report, AnalysisReport::default());
    }
}
