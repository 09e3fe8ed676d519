// ModSleuth - app/sort.rs
//
// Sort run orchestration: read the modlist, load rules, resolve, and write
// the new order back.
//
// The modlist is rewritten only when the order actually changed, and never
// in dry-run mode. The write goes through a temp file + rename so the
// original list survives an interrupted run.

use crate::app::rules_mgr;
use crate::core::load_order;
use crate::platform::fs;
use crate::util::error::{LoadOrderError, Result};
use std::path::PathBuf;

/// What to sort.
#[derive(Debug, Clone)]
pub struct SortRequest {
    /// Modlist file: one archive name per line.
    pub modlist: PathBuf,

    /// Rules TOML file; `None` selects the built-in rules.
    pub rules_path: Option<PathBuf>,

    /// Resolve and report without touching the modlist.
    pub dry_run: bool,
}

/// Result of a completed sort run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Final load order.
    pub order: Vec<String>,

    /// Dependents relocated by rules.
    pub overridden: usize,

    /// Positions whose archive differs from the modlist as read.
    pub displaced: usize,

    /// Targets of rules skipped because an archive is not installed.
    pub dropped_rules: Vec<String>,

    /// Whether the modlist file was rewritten.
    pub written: bool,
}

/// Run a full sort.
pub fn run_sort(request: &SortRequest) -> Result<SortOutcome> {
    let modlist = &request.modlist;

    let artifacts = fs::read_lines(modlist).map_err(|e| LoadOrderError::Read {
        path: modlist.clone(),
        source: e,
    })?;

    if artifacts.is_empty() {
        return Err(LoadOrderError::EmptyLoadOrder {
            path: modlist.clone(),
        }
        .into());
    }

    let rules = rules_mgr::load_rules(request.rules_path.as_deref())?;

    tracing::info!(
        modlist = %modlist.display(),
        archives = artifacts.len(),
        rules = rules.len(),
        "Sorting load order"
    );

    let resolution = load_order::resolve(&artifacts, &rules);
    let displaced = resolution.displaced(&artifacts);

    for target in &resolution.dropped_rules {
        tracing::debug!(target_archive = %target, "Rule not applied");
    }

    let written = if request.dry_run {
        tracing::info!("Dry run; modlist left unchanged");
        false
    } else if displaced == 0 {
        tracing::info!("Load order already sorted; modlist left unchanged");
        false
    } else {
        fs::write_lines_atomic(modlist, &resolution.order).map_err(|e| {
            LoadOrderError::Write {
                path: modlist.clone(),
                source: e,
            }
        })?;
        tracing::info!(modlist = %modlist.display(), displaced, "Modlist rewritten");
        true
    };

    Ok(SortOutcome {
        order: resolution.order,
        overridden: resolution.overridden,
        displaced,
        dropped_rules: resolution.dropped_rules,
        written,
    })
}
