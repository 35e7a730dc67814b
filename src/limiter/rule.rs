//! Base rule identity shared by every kind of rule.
//!
//! A limiter configuration does not own its identity; it embeds the rule
//! that the rule-management layer hands it and delegates to it.

use serde::{Deserialize, Serialize};

/// Identity, enablement and scope of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Application the rule belongs to
    #[serde(default = "default_scope")]
    pub application: String,
    /// Group within the application
    #[serde(default = "default_scope")]
    pub group: String,
    /// The protected resource
    #[serde(default)]
    pub resource: String,
    /// Whether the rule is switched on
    #[serde(default = "default_enable")]
    pub enable: bool,
    /// Free-form remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            application: default_scope(),
            group: default_scope(),
            resource: String::new(),
            enable: default_enable(),
            remarks: None,
        }
    }
}

fn default_scope() -> String {
    "default".to_string()
}

fn default_enable() -> bool {
    true
}

impl RuleConfig {
    /// Create an enabled rule for a resource.
    pub fn new(application: &str, group: &str, resource: &str) -> Self {
        Self {
            application: application.to_string(),
            group: group.to_string(),
            resource: resource.to_string(),
            ..Self::default()
        }
    }

    /// Get the identity of this rule.
    pub fn key(&self) -> RuleKey {
        RuleKey {
            application: self.application.clone(),
            group: self.group.clone(),
            resource: self.resource.clone(),
        }
    }
}

/// Identity of a rule, used to index rule sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    pub application: String,
    pub group: String,
    pub resource: String,
}

impl RuleKey {
    /// Create a new rule key.
    pub fn new(application: &str, group: &str, resource: &str) -> Self {
        Self {
            application: application.to_string(),
            group: group.to_string(),
            resource: resource.to_string(),
        }
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.application, self.group, self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule = RuleConfig::default();
        assert_eq!(rule.application, "default");
        assert_eq!(rule.group, "default");
        assert_eq!(rule.resource, "");
        assert!(rule.enable);
        assert!(rule.remarks.is_none());
    }

    #[test]
    fn test_rule_key_display() {
        let rule = RuleConfig::new("shop", "order", "create");
        assert_eq!(rule.key().to_string(), "shop:order:create");
        assert_eq!(rule.key(), RuleKey::new("shop", "order", "create"));
    }

    #[test]
    fn test_rule_deserialize_defaults() {
        let rule: RuleConfig = serde_yaml::from_str("resource: pay").unwrap();
        assert_eq!(rule.application, "default");
        assert_eq!(rule.resource, "pay");
        assert!(rule.enable);
    }
}
