// ModSleuth - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Dispatch to the analyze / sort runs
// 4. Console reporting and export

use clap::{Parser, Subcommand, ValueEnum};
use modsleuth::app::analyze::{self, AnalysisRequest, AnalysisRun};
use modsleuth::app::session::{self, SessionData};
use modsleuth::app::sort::{self, SortOutcome, SortRequest};
use modsleuth::core::discovery::DiscoveryConfig;
use modsleuth::core::export::{self, ExportFormat};
use modsleuth::core::model::{AnalysisReport, Verdict};
use modsleuth::platform::config::{self, AppConfig, PlatformPaths};
use modsleuth::util::{self, constants};
use modsleuth::util::error::{ExportError, MissingInput, ModSleuthError};
use std::path::{Path, PathBuf};

/// ModSleuth - game log analyser and mod load-order sorter.
///
/// `analyze` scans a game directory for .log files and reports every
/// warning and error. `sort` reorders a modlist so archives that must load
/// first come immediately before the archives that depend on them.
#[derive(Parser, Debug)]
#[command(name = "modsleuth", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory holding config.toml and session.json (overrides the platform default).
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse game logs for warnings and errors.
    Analyze {
        /// Game directory to scan (defaults to config, then the last session).
        dir: Option<PathBuf>,

        /// Analyse this log file too. May be repeated.
        #[arg(short = 'f', long = "file")]
        files: Vec<PathBuf>,

        /// Print every warning and error, not just the totals.
        #[arg(long)]
        details: bool,

        /// Write the report to this file.
        #[arg(short = 'o', long = "export")]
        export: Option<PathBuf>,

        /// Export format (defaults to the export file's extension).
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Sort a modlist by load-order rules.
    Sort {
        /// Modlist file (defaults to config, then the last session).
        modlist: Option<PathBuf>,

        /// Rules TOML file (defaults to config, then the built-in rules).
        #[arg(short = 'r', long = "rules")]
        rules: Option<PathBuf>,

        /// Report the new order without rewriting the modlist.
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Print the final load order.
        #[arg(long)]
        print: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let paths = match &cli.config_dir {
        Some(dir) => PlatformPaths::with_root(dir),
        None => PlatformPaths::resolve(),
    };

    // Config first: it carries the log level and log file.
    let (app_config, config_problems) = config::load_config(&paths.config_dir);
    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config_dir = %paths.config_dir.display(),
        "ModSleuth starting"
    );

    for problem in &config_problems {
        tracing::warn!(error = %problem, "Config problem; default used");
    }

    let session_file = session::session_path(&paths.data_dir);
    let last_session = session::load(&session_file).unwrap_or_default();

    let result = match cli.command {
        Command::Analyze {
            dir,
            files,
            details,
            export,
            format,
        } => run_analyze(
            &app_config,
            &last_session,
            &session_file,
            dir,
            files,
            details,
            export.map(|path| {
                let format = format
                    .map(ExportFormat::from)
                    .unwrap_or_else(|| ExportFormat::from_path(&path));
                (path, format)
            }),
        ),
        Command::Sort {
            modlist,
            rules,
            dry_run,
            print,
        } => run_sort(
            &app_config,
            &last_session,
            &session_file,
            modlist,
            rules,
            dry_run,
            print,
        ),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// =============================================================================
// analyze
// =============================================================================

fn run_analyze(
    app_config: &AppConfig,
    last_session: &SessionData,
    session_file: &Path,
    dir: Option<PathBuf>,
    files: Vec<PathBuf>,
    details: bool,
    export: Option<(PathBuf, ExportFormat)>,
) -> Result<(), ModSleuthError> {
    // An explicit file list without a directory analyses just those files.
    let root = dir.or_else(|| {
        if files.is_empty() {
            app_config
                .game_directory
                .clone()
                .or_else(|| last_session.game_directory.clone())
        } else {
            None
        }
    });

    if root.is_none() && files.is_empty() {
        return Err(MissingInput::GameDirectory.into());
    }

    let request = AnalysisRequest {
        root: root.clone(),
        files,
        discovery: DiscoveryConfig {
            max_depth: app_config.max_depth,
            max_files: app_config.max_files,
            include_patterns: app_config.include_patterns.clone(),
            exclude_patterns: app_config.exclude_patterns.clone(),
            ..Default::default()
        },
    };

    let run = analyze::run_analysis(&request)?;

    if let Some(root) = root {
        session::update(session_file, |s| s.game_directory = Some(root));
    }

    for warning in &run.warnings {
        eprintln!("warning: {warning}");
    }

    print_summary(&run);
    if details {
        print_breakdown(&run.report);
    }

    if let Some((path, format)) = export {
        let rows = write_export(&run.report, &path, format)?;
        println!("Exported {rows} records to {}", path.display());
    }

    Ok(())
}

fn print_summary(run: &AnalysisRun) {
    let report = &run.report;
    println!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
    println!();
    println!("  Logs processed  {:>6}", report.total_files);
    println!("  Clean           {:>6}", report.clean_count);
    println!("  Warnings        {:>6}", report.warning_count);
    println!("  Errors          {:>6}", report.error_count);
    if !report.missing.is_empty() {
        println!("  Missing         {:>6}", report.missing.len());
    }
    println!();
    println!("Time elapsed: {:.2} seconds", run.duration.as_secs_f64());
}

fn print_breakdown(report: &AnalysisReport) {
    for verdict in Verdict::all() {
        match verdict {
            Verdict::Error | Verdict::Warning => {
                let records = if *verdict == Verdict::Error {
                    &report.errors
                } else {
                    &report.warnings
                };
                if records.is_empty() {
                    continue;
                }
                println!();
                println!("{verdict} breakdown ({}):", records.len());
                for record in records {
                    println!(
                        "  [{}] {}  ({})",
                        verdict.short_label(),
                        record.text,
                        record.source_file.display()
                    );
                }
            }
            Verdict::Clean => {
                if report.clean_files.is_empty() {
                    continue;
                }
                println!();
                println!("Clean logs ({}):", report.clean_files.len());
                for file in &report.clean_files {
                    println!(
                        "  [{}] {}  ({})",
                        verdict.short_label(),
                        file.name,
                        file.path.display()
                    );
                }
            }
        }
    }

    if !report.missing.is_empty() {
        println!();
        println!("Missing logs ({}):", report.missing.len());
        for path in &report.missing {
            println!("  {}", path.display());
        }
    }
}

fn write_export(
    report: &AnalysisReport,
    path: &Path,
    format: ExportFormat,
) -> Result<usize, ModSleuthError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let writer = std::io::BufWriter::new(file);
    let rows = match format {
        ExportFormat::Csv => export::export_csv(report, writer, path)?,
        ExportFormat::Json => export::export_json(report, writer, path)?,
    };
    tracing::info!(path = %path.display(), rows, format = ?format, "Report exported");
    Ok(rows)
}

// =============================================================================
// sort
// =============================================================================

fn run_sort(
    app_config: &AppConfig,
    last_session: &SessionData,
    session_file: &Path,
    modlist: Option<PathBuf>,
    rules: Option<PathBuf>,
    dry_run: bool,
    print: bool,
) -> Result<(), ModSleuthError> {
    let modlist = modlist
        .or_else(|| app_config.modlist_path.clone())
        .or_else(|| last_session.modlist_path.clone())
        .ok_or(MissingInput::Modlist)?;

    let request = SortRequest {
        modlist: modlist.clone(),
        rules_path: rules.or_else(|| app_config.rules_file.clone()),
        dry_run,
    };

    let outcome = sort::run_sort(&request)?;
    session::update(session_file, |s| s.modlist_path = Some(modlist.clone()));

    print_sort_outcome(&outcome, &modlist, dry_run, print);
    Ok(())
}

fn print_sort_outcome(outcome: &SortOutcome, modlist: &Path, dry_run: bool, print: bool) {
    println!("Archives sorted:     {}", outcome.order.len());
    println!("Mods overridden:     {}", outcome.overridden);
    println!("Positions changed:   {}", outcome.displaced);
    if !outcome.dropped_rules.is_empty() {
        println!(
            "Rules not applied:   {} (archives not installed)",
            outcome.dropped_rules.len()
        );
    }

    if outcome.written {
        println!("Updated {}", modlist.display());
    } else if dry_run {
        println!("Dry run: {} not modified", modlist.display());
    } else {
        println!("{} is already in order", modlist.display());
    }

    if print {
        println!();
        for (index, name) in outcome.order.iter().enumerate() {
            println!("{:>4}  {name}", index + 1);
        }
    }
}
