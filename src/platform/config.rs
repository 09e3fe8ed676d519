// ModSleuth - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ModSleuth data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/modsleuth/ or %APPDATA%\ModSleuth\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Use one explicit directory for both config and session data
    /// (`--config-dir`).
    pub fn with_root(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub analysis: AnalysisSection,
    pub load_order: LoadOrderSection,
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Game installation directory scanned for logs.
    pub game_directory: Option<String>,
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum log files analysed per run.
    pub max_files: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[load_order]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoadOrderSection {
    /// Path to the modlist file.
    pub modlist_path: Option<String>,
    /// Path to a rules TOML file (empty = built-in rules).
    pub rules_file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Analysis --
    pub game_directory: Option<PathBuf>,
    pub max_depth: usize,
    pub max_files: usize,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    // -- Load order --
    pub modlist_path: Option<PathBuf>,
    pub rules_file: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_directory: None,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: to_strings(constants::DEFAULT_INCLUDE_PATTERNS),
            exclude_patterns: to_strings(constants::DEFAULT_EXCLUDE_PATTERNS),
            modlist_path: None,
            rules_file: None,
            log_level: None,
            log_file: None,
        }
    }
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Treat empty strings in the config as "not set".
fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

fn first_invalid_glob(patterns: &[String]) -> Option<String> {
    patterns
        .iter()
        .find(|p| glob::Pattern::new(p).is_err())
        .cloned()
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// If the file does not exist, returns defaults with no problems (first run).
/// If the file is unreadable or unparseable, returns defaults plus the error.
///
/// Called before logging is initialised (the file carries the log level),
/// so problems are returned for the caller to report rather than logged.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut problems: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), problems);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            problems.push(ConfigError::Io {
                path: config_path,
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            problems.push(ConfigError::TomlParse {
                path: config_path,
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    let config = validate(raw, &mut problems);
    (config, problems)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, problems: &mut Vec<ConfigError>) -> AppConfig {
    let mut config = AppConfig::default();
    let mut out_of_range = |field: &str, value: String, expected: String| {
        problems.push(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        });
    };

    // -- Analysis --
    config.game_directory = non_empty_path(raw.analysis.game_directory);

    if let Some(depth) = raw.analysis.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            out_of_range(
                "analysis.max_depth",
                depth.to_string(),
                format!(
                    "1-{} (using default {})",
                    constants::ABSOLUTE_MAX_DEPTH,
                    constants::DEFAULT_MAX_DEPTH
                ),
            );
        }
    }

    if let Some(files) = raw.analysis.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            out_of_range(
                "analysis.max_files",
                files.to_string(),
                format!(
                    "{}-{} (using default {})",
                    constants::MIN_MAX_FILES,
                    constants::ABSOLUTE_MAX_FILES,
                    constants::DEFAULT_MAX_FILES
                ),
            );
        }
    }

    if let Some(patterns) = raw.analysis.include_patterns {
        match first_invalid_glob(&patterns) {
            Some(bad) => out_of_range(
                "analysis.include_patterns",
                bad,
                "valid glob patterns (using default)".to_string(),
            ),
            None => config.include_patterns = patterns,
        }
    }

    if let Some(patterns) = raw.analysis.exclude_patterns {
        match first_invalid_glob(&patterns) {
            Some(bad) => out_of_range(
                "analysis.exclude_patterns",
                bad,
                "valid glob patterns (using default)".to_string(),
            ),
            None => config.exclude_patterns = patterns,
        }
    }

    // -- Load order --
    config.modlist_path = non_empty_path(raw.load_order.modlist_path);
    config.rules_file = non_empty_path(raw.load_order.rules_file);

    // -- Logging --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            out_of_range(
                "logging.level",
                level,
                format!(
                    "one of {} (using default {})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_LOG_LEVEL
                ),
            );
        }
    }

    config.log_file = raw.logging.file.filter(|f| !f.trim().is_empty());

    config
}
