// ModSleuth - core/load_order.rs
//
// Load-order resolution: apply "must precede" rules to a list of archives.
// Core layer: pure function over in-memory data.
//
// Algorithm:
//   1. working set = all archive names
//   2. keep only rules whose target and every dependent are installed
//   3. each kept rule, in order, claims its dependents still in the set
//      (a dependent shared by two rules belongs to the first)
//   4. sort the remaining names ordinally (byte order)
//   5. each kept rule, in order, inserts its claimed dependents right
//      before its target, or at the end if the target is not in the list
//
// The output depends only on the *set* of input names and the rules, so
// resolving a previous result again reproduces it exactly.

use crate::core::model::{OrderRule, Resolution};
use crate::core::rules::RuleSet;
use std::collections::BTreeSet;

/// Resolve the final load order for `artifacts` under `rules`.
///
/// Input duplicates collapse to a single entry. Never fails: rules that
/// reference archives not present are skipped and listed in
/// `Resolution::dropped_rules`.
pub fn resolve(artifacts: &[String], rules: &RuleSet) -> Resolution {
    // BTreeSet<&str> iterates in byte order, which is the ordinal sort.
    let mut working: BTreeSet<&str> = artifacts.iter().map(String::as_str).collect();

    let (active, dropped): (Vec<&OrderRule>, Vec<&OrderRule>) = rules.iter().partition(|rule| {
        working.contains(rule.target.as_str())
            && rule.dependents.iter().all(|d| working.contains(d.as_str()))
    });

    for rule in &dropped {
        tracing::debug!(target_archive = %rule.target, "Rule skipped: archive not installed");
    }

    let mut overridden = 0usize;
    let claimed: Vec<Vec<&str>> = active
        .iter()
        .map(|rule| {
            rule.dependents
                .iter()
                .map(String::as_str)
                .filter(|dep| working.remove(dep))
                .inspect(|_| overridden += 1)
                .collect()
        })
        .collect();

    let mut order: Vec<String> = working.into_iter().map(str::to_string).collect();

    for (rule, dependents) in active.iter().zip(&claimed) {
        let index = order
            .iter()
            .position(|name| *name == rule.target)
            .unwrap_or(order.len());
        order.splice(index..index, dependents.iter().map(|d| d.to_string()));
    }

    tracing::debug!(
        archives = order.len(),
        rules_applied = active.len(),
        rules_dropped = dropped.len(),
        overridden,
        "Load order resolved"
    );

    Resolution {
        order,
        overridden,
        dropped_rules: dropped.into_iter().map(|r| r.target.clone()).collect(),
    }
}
