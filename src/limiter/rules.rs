//! Limiter rule documents.
//!
//! A document lists limiter configurations, each carrying its rule identity:
//!
//! ```yaml
//! limiters:
//!   - application: shop
//!     group: order
//!     resource: create
//!     rate: 100
//!     unit: SEC
//!     strategy: EXCEPTION
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::config::{LimiterConfig, RawLimiterConfig};
use super::rule::RuleKey;
use crate::error::{LimiterError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesDocument {
    #[serde(default)]
    limiters: Vec<RawLimiterConfig>,
}

/// A validated set of limiter configurations indexed by rule identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimiterRules {
    rules: HashMap<RuleKey, LimiterConfig>,
}

impl LimiterRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set, rejecting duplicate identities.
    pub fn from_configs<I>(configs: I) -> Result<Self>
    where
        I: IntoIterator<Item = LimiterConfig>,
    {
        let mut rules = HashMap::new();
        for config in configs {
            let key = config.key();
            if rules.contains_key(&key) {
                return Err(LimiterError::DuplicateRule(key.to_string()));
            }
            rules.insert(key, config);
        }
        Ok(Self { rules })
    }

    /// Load rules from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading limiter rules");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load rules from a YAML string.
    ///
    /// Any invalid entry fails the whole document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: RulesDocument = serde_yaml::from_str(yaml)
            .map_err(|e| LimiterError::Config(format!("Failed to parse limiter rules: {}", e)))?;
        let configs = document
            .limiters
            .into_iter()
            .map(LimiterConfig::try_from)
            .collect::<Result<Vec<_>>>()?;
        let rules = Self::from_configs(configs)?;
        debug!(count = rules.len(), "Parsed limiter rules");
        Ok(rules)
    }

    pub fn get(&self, key: &RuleKey) -> Option<&LimiterConfig> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the configurations, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &LimiterConfig)> {
        self.rules.iter()
    }

    pub(crate) fn into_inner(self) -> HashMap<RuleKey, LimiterConfig> {
        self.rules
    }
}
