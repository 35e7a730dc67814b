//! Limiter configuration model, rule documents and the published rule registry.

mod config;
mod registry;
mod rule;
mod rules;
mod strategy;
mod unit;
mod watch;

pub use config::{Axis, LimiterConfig, LimiterConfigBuilder, RawLimiterConfig};
pub use registry::{LimiterRegistry, ReloadSummary};
pub use rule::{RuleConfig, RuleKey};
pub use rules::LimiterRules;
pub use strategy::Strategy;
pub use unit::Unit;
pub use watch::watch_rules;
