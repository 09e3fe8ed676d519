// ModSleuth - core/export.rs
//
// CSV and JSON export of an analysis report.
// Core layer: writes to any Write trait object.

use crate::core::model::{AnalysisReport, ClassifiedRecord, Verdict};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Export every error and warning record to CSV.
///
/// Writes: verdict, source_file, text. Errors first, then warnings,
/// each in report order. Clean files are not rows. Returns the row count.
pub fn export_csv<W: Write>(
    report: &AnalysisReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["verdict", "source_file", "text"])
        .map_err(csv_err)?;

    let mut count = 0;
    for verdict in Verdict::all() {
        for record in records_for(report, *verdict) {
            csv_writer
                .write_record([
                    verdict.short_label(),
                    &record.source_file.display().to_string(),
                    &record.text,
                ])
                .map_err(csv_err)?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), rows = count, "CSV export written");
    Ok(count)
}

/// Export the whole report as pretty-printed JSON. Returns the number of
/// error and warning records it contains.
pub fn export_json<W: Write>(
    report: &AnalysisReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, report).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(report.errors.len() + report.warnings.len())
}

fn records_for(report: &AnalysisReport, verdict: Verdict) -> &[ClassifiedRecord] {
    match verdict {
        Verdict::Error => &report.errors,
        Verdict::Warning => &report.warnings,
        Verdict::Clean => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CleanFile;
    use std::path::PathBuf;

    fn record(file: &str, text: &str) -> ClassifiedRecord {
        ClassifiedRecord {
            source_file: PathBuf::from(file),
            text: text.to_string(),
        }
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            total_files: 2,
            error_count: 1,
            warning_count: 2,
            clean_count: 1,
            errors: vec![record("game.log", "Failed to load, code 3")],
            warnings: vec![
                record("game.log", "warn: low vram"),
                record("redscript_rCURRENT.log", "[WARN] a\n  at b"),
            ],
            clean_files: vec![CleanFile {
                name: "ok.log".to_string(),
                path: PathBuf::from("ok.log"),
            }],
            missing: Vec::new(),
        }
    }

    #[test]
    fn csv_has_one_row_per_record_errors_first() {
        let mut buf = Vec::new();
        let count = export_csv(&sample_report(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 3);

        let output = String::from_utf8(buf).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "ERR");
        assert_eq!(&rows[0][2], "Failed to load, code 3");
        assert_eq!(&rows[2][0], "WARN");
        assert_eq!(&rows[2][2], "[WARN] a\n  at b", "multi-line text must survive quoting");
    }

    #[test]
    fn json_contains_totals_and_records() {
        let mut buf = Vec::new();
        let count = export_json(&sample_report(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 3);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error_count"], 1);
        assert_eq!(value["warning_count"], 2);
        assert_eq!(value["clean_files"][0]["name"], "ok.log");
        assert_eq!(value["warnings"][0]["text"], "warn: low vram");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("r.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("r.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("report")), ExportFormat::Csv);
    }
}
