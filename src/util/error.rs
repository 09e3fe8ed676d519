// ModSleuth - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant carries the path or
// name that caused it and exposes the underlying cause through `source()`.
//
// Soft, per-item failures (a missing log file, a rule referencing an
// archive that is not installed) are NOT errors; they are reported as
// values by the engines. The types below are for failures that stop an
// operation.

use crate::util::constants;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ModSleuth operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ModSleuthError {
    /// Log file discovery failed.
    Discovery(DiscoveryError),

    /// Load-order rules could not be loaded or failed validation.
    Rules(RuleError),

    /// The load order file could not be read or written.
    LoadOrder(LoadOrderError),

    /// Report export failed.
    Export(ExportError),

    /// No input path on the command line, in config.toml, or in the last
    /// session.
    MissingInput(MissingInput),
}

impl fmt::Display for ModSleuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Rules(e) => write!(f, "Rules error: {e}"),
            Self::LoadOrder(e) => write!(f, "Load order error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::MissingInput(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ModSleuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Rules(e) => Some(e),
            Self::LoadOrder(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::MissingInput(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to log file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root scan path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Scan path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for ModSleuthError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Rule errors
// ---------------------------------------------------------------------------

/// Errors related to load-order rule loading and validation.
#[derive(Debug)]
pub enum RuleError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Rules file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A target or dependent name is empty (or whitespace only).
    EmptyName { rule_index: usize },

    /// Two rules share the same target. Later rules would otherwise
    /// silently replace earlier ones.
    DuplicateTarget { target: String },

    /// A rule lists its own target among the archives to place before it.
    SelfReference { target: String },

    /// The same dependent appears twice within a single rule.
    DuplicateDependent { target: String, dependent: String },

    /// The rules contradict each other. `targets` lists the archives in
    /// "loads before" order; the last one would have to load before the first.
    Cycle { targets: Vec<String> },

    /// Maximum number of rules exceeded.
    TooManyRules { count: usize, max: usize },

    /// I/O error reading a rules file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse rules '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Rules file '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::EmptyName { rule_index } => {
                write!(f, "Rule #{rule_index}: archive names must not be empty")
            }
            Self::DuplicateTarget { target } => write!(
                f,
                "Target '{target}' is declared by more than one rule; \
                 merge its dependents into a single rule"
            ),
            Self::SelfReference { target } => {
                write!(f, "Rule for '{target}' lists '{target}' as its own dependent")
            }
            Self::DuplicateDependent { target, dependent } => write!(
                f,
                "Rule for '{target}' lists dependent '{dependent}' more than once"
            ),
            Self::Cycle { targets } => write!(
                f,
                "Rules form a cycle: {} -> {}",
                targets.join(" -> "),
                targets.first().map(String::as_str).unwrap_or_default()
            ),
            Self::TooManyRules { count, max } => {
                write!(f, "Too many rules ({count}), maximum is {max}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading rules '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RuleError> for ModSleuthError {
    fn from(e: RuleError) -> Self {
        Self::Rules(e)
    }
}

// ---------------------------------------------------------------------------
// Load order errors
// ---------------------------------------------------------------------------

/// Errors related to reading and writing the load order file.
#[derive(Debug)]
pub enum LoadOrderError {
    /// The load order file could not be read.
    Read { path: PathBuf, source: io::Error },

    /// The load order file could not be written.
    Write { path: PathBuf, source: io::Error },

    /// The load order file contains no archive names.
    EmptyLoadOrder { path: PathBuf },
}

impl fmt::Display for LoadOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "Cannot read load order '{}': {source}", path.display())
            }
            Self::Write { path, source } => write!(
                f,
                "Cannot write load order '{}': {source}. Ensure write permissions are granted.",
                path.display()
            ),
            Self::EmptyLoadOrder { path } => write!(
                f,
                "Load order '{}' is empty; nothing to sort",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadOrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::EmptyLoadOrder { .. } => None,
        }
    }
}

impl From<LoadOrderError> for ModSleuthError {
    fn from(e: LoadOrderError) -> Self {
        Self::LoadOrder(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for ModSleuthError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Missing input
// ---------------------------------------------------------------------------

/// The run has nothing to work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// `analyze` got neither a game directory nor any log file.
    GameDirectory,

    /// `sort` got no modlist path.
    Modlist,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameDirectory => write!(
                f,
                "No game directory given. Pass one as an argument or set \
                 [analysis] game_directory in {}",
                constants::CONFIG_FILE_NAME
            ),
            Self::Modlist => write!(
                f,
                "No modlist given. Pass one as an argument or set \
                 [load_order] modlist_path in {} (usually {})",
                constants::CONFIG_FILE_NAME,
                constants::MODLIST_FILE_NAME
            ),
        }
    }
}

impl std::error::Error for MissingInput {}

impl From<MissingInput> for ModSleuthError {
    fn from(e: MissingInput) -> Self {
        Self::MissingInput(e)
    }
}

/// Convenience type alias for ModSleuth results.
pub type Result<T> = std::result::Result<T, ModSleuthError>;
