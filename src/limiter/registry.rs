//! Published limiter configurations.
//!
//! The registry is swapped as a whole on every reload; readers never observe
//! a half-applied rule set or a configuration mutated in place.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::LimiterConfig;
use super::rule::RuleKey;
use super::rules::LimiterRules;

/// Outcome of applying a rule set to a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Rules that were not published before
    pub added: Vec<RuleKey>,
    /// Rules whose effective policy changed
    pub changed: Vec<RuleKey>,
    /// Rules no longer present
    pub removed: Vec<RuleKey>,
    /// Rules carried over as-is
    pub unchanged: usize,
}

impl ReloadSummary {
    /// Whether any limiter needs to be built or torn down.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty())
    }
}

/// Thread-safe registry of the currently published limiter configurations.
#[derive(Debug, Default)]
pub struct LimiterRegistry {
    configs: RwLock<HashMap<RuleKey, Arc<LimiterConfig>>>,
}

impl LimiterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry already holding a rule set.
    pub fn with_rules(rules: LimiterRules) -> Self {
        let registry = Self::new();
        registry.reload(rules);
        registry
    }

    /// Get the published configuration for a rule.
    pub fn get(&self, key: &RuleKey) -> Option<Arc<LimiterConfig>> {
        self.configs.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }

    /// Published rule keys, sorted.
    pub fn keys(&self) -> Vec<RuleKey> {
        let mut keys: Vec<RuleKey> = self.configs.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Replace the published rule set.
    ///
    /// A rule whose configuration compares equal to the published one keeps
    /// its existing `Arc`, so limiters built from it can be reused.
    pub fn reload(&self, rules: LimiterRules) -> ReloadSummary {
        let mut summary = ReloadSummary::default();
        let mut current = self.configs.write();
        let mut next = HashMap::with_capacity(rules.len());

        for (key, config) in rules.into_inner() {
            if config.enabled_axes().is_empty() {
                warn!(rule = %key, "Limiter rule enables no axis");
            }

            match current.get(&key) {
                Some(existing) if **existing == config => {
                    summary.unchanged += 1;
                    next.insert(key, Arc::clone(existing));
                }
                Some(_) => {
                    debug!(rule = %key, "Limiter rule changed");
                    summary.changed.push(key.clone());
                    next.insert(key, Arc::new(config));
                }
                None => {
                    debug!(rule = %key, "Limiter rule added");
                    summary.added.push(key.clone());
                    next.insert(key, Arc::new(config));
                }
            }
        }

        summary.removed = current
            .keys()
            .filter(|key| !next.contains_key(*key))
            .cloned()
            .collect();

        summary.added.sort();
        summary.changed.sort();
        summary.removed.sort();

        *current = next;
        drop(current);

        info!(
            added = summary.added.len(),
            changed = summary.changed.len(),
            removed = summary.removed.len(),
            unchanged = summary.unchanged,
            "Limiter rules reloaded"
        );

        summary
    }
}
