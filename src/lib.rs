//! Neural Limiter - limiter configuration model
//!
//! This crate defines the policy a limiter instance enforces: a rate axis,
//! a concurrency axis and a request-volume axis, plus the overflow strategy
//! applied when any enabled axis rejects a call. Configurations are validated
//! eagerly at construction and are read-only afterwards, so limiter engines
//! can share them freely.

pub mod config;
pub mod error;
pub mod limiter;

pub use error::{LimiterError, Result};
pub use limiter::{
    Axis, LimiterConfig, LimiterConfigBuilder, LimiterRegistry, LimiterRules, RawLimiterConfig,
    ReloadSummary, RuleConfig, RuleKey, Strategy, Unit, watch_rules,
};
