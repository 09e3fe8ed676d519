// ModSleuth - core/rules.rs
//
// Load-order rule parsing and validation.
// Core layer: accepts TOML strings, never touches the filesystem.
// File I/O is handled by app::rules_mgr which feeds content here.
//
// A rules file is an ordered array of tables:
//
//   [[rule]]
//   target = "HD Reworked Project.archive"
//   before = ["TreesVegetations.archive"]
//
// Declaration order matters: it decides which rule claims a dependent
// shared by several rules and the order in which insertions happen.

use crate::core::model::OrderRule;
use crate::util::constants;
use crate::util::error::RuleError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML rules definition as deserialized from a .toml file.
#[derive(Debug, Deserialize)]
pub struct RulesDefinition {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize)]
pub struct RuleDef {
    pub target: String,
    #[serde(default)]
    pub before: Vec<String>,
}

// =============================================================================
// Validated rule set
// =============================================================================

/// An ordered, validated collection of load-order rules.
///
/// Guarantees: targets are unique, no rule lists its own target as a
/// dependent, no rule lists a dependent twice, no name is empty, and the
/// "loads before" edges of all rules together form no cycle. A target may
/// still appear as another rule's dependent; the resolver handles such
/// chains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<OrderRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after validating it against the rules already present.
    pub fn push(&mut self, rule: OrderRule) -> Result<(), RuleError> {
        let rule_index = self.rules.len() + 1;

        if self.rules.len() >= constants::MAX_RULES {
            return Err(RuleError::TooManyRules {
                count: rule_index,
                max: constants::MAX_RULES,
            });
        }

        if rule.target.trim().is_empty() || rule.dependents.iter().any(|d| d.trim().is_empty()) {
            return Err(RuleError::EmptyName { rule_index });
        }

        if self.rules.iter().any(|r| r.target == rule.target) {
            return Err(RuleError::DuplicateTarget {
                target: rule.target,
            });
        }

        let mut seen = HashSet::new();
        for dependent in &rule.dependents {
            if *dependent == rule.target {
                return Err(RuleError::SelfReference {
                    target: rule.target.clone(),
                });
            }
            if !seen.insert(dependent.as_str()) {
                return Err(RuleError::DuplicateDependent {
                    target: rule.target.clone(),
                    dependent: dependent.clone(),
                });
            }
        }

        // The new rule puts each dependent before the target. If the target
        // already loads before one of them, the rules contradict each other.
        if let Some(path) = self.loads_before_path(&rule.target, &rule.dependents) {
            return Err(RuleError::Cycle { targets: path });
        }

        self.rules.push(rule);
        Ok(())
    }

    /// Breadth-first walk of "loads before" edges (dependent -> target)
    /// from `start`. Returns the first path ending at one of `goals`,
    /// `start` included.
    fn loads_before_path<'a>(&'a self, start: &'a str, goals: &[String]) -> Option<Vec<String>> {
        let mut parent: HashMap<&'a str, &'a str> = HashMap::new();
        let mut visited: HashSet<&'a str> = HashSet::from([start]);
        let mut queue: VecDeque<&'a str> = VecDeque::from([start]);

        while let Some(name) = queue.pop_front() {
            if goals.iter().any(|g| g == name) {
                let mut path = vec![name.to_string()];
                let mut cursor = name;
                while let Some(prev) = parent.get(cursor) {
                    path.push((*prev).to_string());
                    cursor = *prev;
                }
                path.reverse();
                return Some(path);
            }

            let successors = self
                .rules
                .iter()
                .filter(|r| r.dependents.iter().any(|d| d == name))
                .map(|r| r.target.as_str());
            for next in successors {
                if visited.insert(next) {
                    parent.insert(next, name);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Build a rule set from rules in declaration order.
    pub fn from_rules<I>(rules: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = OrderRule>,
    {
        let mut set = RuleSet::new();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up the rule for `target`.
    pub fn get(&self, target: &str) -> Option<&OrderRule> {
        self.rules.iter().find(|r| r.target == target)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a OrderRule;
    type IntoIter = std::slice::Iter<'a, OrderRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse and validate a rules TOML string.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_rules_toml(toml_content: &str, source_path: &Path) -> Result<RuleSet, RuleError> {
    let def: RulesDefinition =
        toml::from_str(toml_content).map_err(|e| RuleError::TomlParse {
            path: source_path.to_path_buf(),
            source: e,
        })?;

    let rule_set = RuleSet::from_rules(def.rules.into_iter().map(|r| OrderRule {
        target: r.target,
        dependents: r.before,
    }))?;

    let chained = rule_set
        .iter()
        .filter(|r| rule_set.iter().any(|o| o.dependents.contains(&r.target)))
        .count();

    tracing::debug!(
        source = %source_path.display(),
        rules = rule_set.len(),
        chained_targets = chained,
        "Rules parsed"
    );

    Ok(rule_set)
}

// =============================================================================
// Built-in rules (embedded at compile time)
// =============================================================================

/// Embedded TOML content of the built-in rule set.
pub const BUILTIN_RULES_SOURCE: &str = include_str!("../../rules/default_rules.toml");

/// Parse the built-in rule set.
pub fn builtin_rules() -> Result<RuleSet, RuleError> {
    parse_rules_toml(BUILTIN_RULES_SOURCE, Path::new("<built-in>/default_rules.toml"))
}
