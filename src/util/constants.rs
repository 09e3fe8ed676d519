// ModSleuth - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Classification keywords and boundary patterns live here so the engines
// in `core` never embed magic strings of their own.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ModSleuth";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ModSleuth";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log classification
// =============================================================================

/// Regex matched against the start of a line to detect an entry boundary in
/// the standard log format: `[YYYY-MM-DD HH:MM:SS...`.
pub const TIMESTAMP_BOUNDARY_PATTERN: &str = r"^\[\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}";

/// Case-sensitive substrings that mark an entry as a warning.
///
/// Matched as plain substrings (not word-bounded) and checked before the
/// exception pattern, so "warning" inside an error message still wins.
pub const WARNING_SUBSTRINGS: &[&str] = &["warn", "warning"];

/// Keywords compiled into the case-insensitive, word-bounded exception
/// pattern. An entry matching any of them (and no warning substring) is an
/// error.
pub const EXCEPTION_KEYWORDS: &[&str] = &[
    "WARN",
    "warning",
    "error",
    "errors",
    "failed",
    "skipped",
    "nil value",
    "null value",
    "stack trace",
    "non-existent",
    "doesn't exist",
    "does not exist",
    "stack traceback:",
    "attempt to index",
    "attempted to index",
    "cannot be determined",
];

/// File name of the one log that uses the redscript dialect.
pub const REDSCRIPT_LOG_NAME: &str = "redscript_rCURRENT.log";

/// Line prefix that opens a redscript warning block.
pub const REDSCRIPT_WARN_MARKER: &str = "[WARN";

/// Line prefix of redscript info lines, which are always discarded.
pub const REDSCRIPT_INFO_MARKER: &str = "[INFO";

/// Line prefix that closes a redscript warning block.
pub const REDSCRIPT_CLOSE_MARKER: &str = "^^^";

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 64;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of log files analysed in a single run.
pub const DEFAULT_MAX_FILES: usize = 2_000;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 50_000;

/// File size threshold in bytes above which a log is memory-mapped
/// instead of read into a heap buffer.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 32 * 1024 * 1024; // 32 MB

/// Default include glob patterns for log file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log"];

/// Default exclude glob patterns for log file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.gz", "*.zip", "*.bak", ".git"];

/// Retry limits for transient I/O errors while reading log files.
pub const READ_MAX_RETRIES: u32 = 3;

/// Backoff delay between attempts, in milliseconds.
pub const READ_RETRY_DELAYS_MS: [u64; READ_MAX_RETRIES as usize - 1] = [50, 100];

// =============================================================================
// Load order
// =============================================================================

/// Default load order file name.
pub const MODLIST_FILE_NAME: &str = "modlist.txt";

/// Maximum size of a rules TOML file in bytes.
pub const MAX_RULES_FILE_SIZE: u64 = 256 * 1024; // 256 KB

/// Maximum number of rules accepted in a single rule set.
pub const MAX_RULES: usize = 10_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of entry text included in debug output.
pub const DEBUG_MAX_TEXT_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
