// ModSleuth - app/rules_mgr.rs
//
// Selects and loads the load-order rule set: a user rules file when one is
// configured, the built-in set otherwise. Unlike log files, a configured
// rules file that cannot be used is a hard error; silently falling back to
// the built-in set would reorder the user's mods by rules they did not ask for.

use crate::core::rules::{self, RuleSet};
use crate::util::constants;
use crate::util::error::RuleError;
use std::path::Path;

/// Load the rule set from `rules_file`, or the built-in set when `None`.
pub fn load_rules(rules_file: Option<&Path>) -> Result<RuleSet, RuleError> {
    let rule_set = match rules_file {
        Some(path) => load_rules_file(path)?,
        None => {
            let builtin = rules::builtin_rules()?;
            tracing::info!(count = builtin.len(), "Using built-in load-order rules");
            builtin
        }
    };
    Ok(rule_set)
}

/// Read, size-check, parse, and validate a user rules file.
fn load_rules_file(path: &Path) -> Result<RuleSet, RuleError> {
    let metadata = std::fs::metadata(path).map_err(|e| RuleError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_RULES_FILE_SIZE {
        return Err(RuleError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_RULES_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| RuleError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rule_set = rules::parse_rules_toml(&content, path)?;
    tracing::info!(
        path = %path.display(),
        count = rule_set.len(),
        "Loaded load-order rules file"
    );
    Ok(rule_set)
}
