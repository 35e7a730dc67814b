//! Limiter configuration: the policy a limiter instance enforces.
//!
//! A configuration carries three independent axes:
//! - rate: `rate` events per window of `granularity` x `unit`
//! - concurrency: at most `max_concurrent` operations in flight
//! - request volume: `max_permit_request` requests per `request_interval`
//!
//! A bound of 0 disables its axis. Every axis has its own acquire timeout in
//! milliseconds, and `strategy` decides what happens when any enabled axis
//! overflows. How enabled axes compose is up to the limiter engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::rule::{RuleConfig, RuleKey};
use super::strategy::Strategy;
use super::unit::Unit;
use crate::error::{LimiterError, Result};

/// Default window multiplier.
const DEFAULT_GRANULARITY: u64 = 1;

/// Largest value any numeric field may hold; documents carry signed 64-bit integers.
const MAX_FIELD_VALUE: u64 = i64::MAX as u64;

/// One of the independent limiting dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Events per time window
    Rate,
    /// Operations in flight
    Concurrency,
    /// Requests per request interval
    Request,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Rate, Axis::Concurrency, Axis::Request];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Rate => "rate",
            Axis::Concurrency => "concurrency",
            Axis::Request => "request",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, read-only limiter configuration.
///
/// Values are produced by [`LimiterConfig::default`], by
/// [`LimiterConfigBuilder::build`], or by deserialization through
/// [`RawLimiterConfig`]. All three paths enforce the same invariants, so a
/// value of this type is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLimiterConfig")]
pub struct LimiterConfig {
    #[serde(flatten)]
    rule: RuleConfig,
    rate: u64,
    rate_timeout: u64,
    granularity: u64,
    unit: Unit,
    max_concurrent: u64,
    concurrent_timeout: u64,
    max_permit_request: u64,
    request_timeout: u64,
    request_interval: u64,
    strategy: Strategy,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            rule: RuleConfig::default(),
            rate: 0,
            rate_timeout: 0,
            granularity: DEFAULT_GRANULARITY,
            unit: Unit::default(),
            max_concurrent: 0,
            concurrent_timeout: 0,
            max_permit_request: 0,
            request_timeout: 0,
            request_interval: 0,
            strategy: Strategy::default(),
        }
    }
}

impl LimiterConfig {
    /// Start building a configuration for a rule. Unset fields take their defaults.
    pub fn builder(rule: RuleConfig) -> LimiterConfigBuilder {
        LimiterConfigBuilder {
            config: LimiterConfig {
                rule,
                ..LimiterConfig::default()
            },
        }
    }

    /// Start a builder from this configuration, for overriding some fields.
    pub fn to_builder(&self) -> LimiterConfigBuilder {
        LimiterConfigBuilder {
            config: self.clone(),
        }
    }

    /// Get the base rule this configuration belongs to.
    pub fn rule(&self) -> &RuleConfig {
        &self.rule
    }

    pub fn key(&self) -> RuleKey {
        self.rule.key()
    }

    pub fn application(&self) -> &str {
        &self.rule.application
    }

    pub fn group(&self) -> &str {
        &self.rule.group
    }

    pub fn resource(&self) -> &str {
        &self.rule.resource
    }

    pub fn enabled(&self) -> bool {
        self.rule.enable
    }

    /// Permitted events per rate window. 0 disables the rate axis.
    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn rate_timeout_ms(&self) -> u64 {
        self.rate_timeout
    }

    /// Maximum wait for a rate permit.
    pub fn rate_timeout(&self) -> Duration {
        Duration::from_millis(self.rate_timeout)
    }

    /// Number of units in one rate window. Always at least 1.
    pub fn granularity(&self) -> u64 {
        self.granularity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Rate window length in milliseconds: `granularity * unit`.
    pub fn window_ms(&self) -> u64 {
        self.unit.window_millis(self.granularity)
    }

    /// Rate window length.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms())
    }

    /// Maximum operations in flight. 0 disables the concurrency axis.
    pub fn max_concurrent(&self) -> u64 {
        self.max_concurrent
    }

    pub fn concurrent_timeout_ms(&self) -> u64 {
        self.concurrent_timeout
    }

    /// Maximum wait for a concurrency slot.
    pub fn concurrent_timeout(&self) -> Duration {
        Duration::from_millis(self.concurrent_timeout)
    }

    /// Maximum requests per request interval. 0 disables the request axis.
    pub fn max_permit_request(&self) -> u64 {
        self.max_permit_request
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout
    }

    /// Maximum wait for a request permit.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn request_interval_ms(&self) -> u64 {
        self.request_interval
    }

    /// Window length of the request axis.
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Check whether an axis is enforced.
    pub fn is_enabled(&self, axis: Axis) -> bool {
        match axis {
            Axis::Rate => self.rate > 0,
            Axis::Concurrency => self.max_concurrent > 0,
            Axis::Request => self.max_permit_request > 0,
        }
    }

    /// The enforced axes, in [`Axis::ALL`] order.
    pub fn enabled_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|axis| self.is_enabled(*axis))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("rate", self.rate),
            ("rate_timeout", self.rate_timeout),
            ("granularity", self.granularity),
            ("max_concurrent", self.max_concurrent),
            ("concurrent_timeout", self.concurrent_timeout),
            ("max_permit_request", self.max_permit_request),
            ("request_timeout", self.request_timeout),
            ("request_interval", self.request_interval),
        ];
        for (field, value) in fields {
            if value > MAX_FIELD_VALUE {
                return Err(LimiterError::InvalidConfiguration {
                    field,
                    value: value.into(),
                });
            }
        }

        if self.granularity == 0 {
            return Err(LimiterError::InvalidConfiguration {
                field: "granularity",
                value: 0,
            });
        }
        Ok(())
    }
}

/// Builder for [`LimiterConfig`].
///
/// Numeric setters take unsigned values; `build` rejects a zero granularity
/// and any value above `i64::MAX`.
#[derive(Debug, Clone)]
pub struct LimiterConfigBuilder {
    config: LimiterConfig,
}

impl LimiterConfigBuilder {
    pub fn rule(mut self, rule: RuleConfig) -> Self {
        self.config.rule = rule;
        self
    }

    pub fn rate(mut self, rate: u64) -> Self {
        self.config.rate = rate;
        self
    }

    /// Builder-style: set the rate acquire timeout in milliseconds
    pub fn rate_timeout_ms(mut self, millis: u64) -> Self {
        self.config.rate_timeout = millis;
        self
    }

    pub fn granularity(mut self, granularity: u64) -> Self {
        self.config.granularity = granularity;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.config.unit = unit;
        self
    }

    pub fn max_concurrent(mut self, max_concurrent: u64) -> Self {
        self.config.max_concurrent = max_concurrent;
        self
    }

    /// Builder-style: set the concurrency acquire timeout in milliseconds
    pub fn concurrent_timeout_ms(mut self, millis: u64) -> Self {
        self.config.concurrent_timeout = millis;
        self
    }

    pub fn max_permit_request(mut self, max_permit_request: u64) -> Self {
        self.config.max_permit_request = max_permit_request;
        self
    }

    /// Builder-style: set the request acquire timeout in milliseconds
    pub fn request_timeout_ms(mut self, millis: u64) -> Self {
        self.config.request_timeout = millis;
        self
    }

    /// Builder-style: set the request window in milliseconds
    pub fn request_interval_ms(mut self, millis: u64) -> Self {
        self.config.request_interval = millis;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<LimiterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Unvalidated limiter configuration as it arrives from a document.
///
/// Numeric fields are signed so that a negative input is reported as an
/// invalid field rather than as a generic decode failure. Missing fields
/// take their defaults. The camelCase names (`maxConcurrent`, ...) are
/// accepted as aliases; any other key is kept in `unknown` and rejected by
/// the conversion to [`LimiterConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLimiterConfig {
    #[serde(flatten)]
    pub rule: RuleConfig,
    pub rate: i64,
    #[serde(alias = "rateTimeout")]
    pub rate_timeout: i64,
    pub granularity: i64,
    pub unit: Unit,
    #[serde(alias = "maxConcurrent")]
    pub max_concurrent: i64,
    #[serde(alias = "concurrentTimeout")]
    pub concurrent_timeout: i64,
    #[serde(alias = "maxPermitRequest")]
    pub max_permit_request: i64,
    #[serde(alias = "requestTimeout")]
    pub request_timeout: i64,
    #[serde(alias = "requestInterval")]
    pub request_interval: i64,
    pub strategy: Strategy,
    /// Keys matching neither a limiter field nor the base rule
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl Default for RawLimiterConfig {
    fn default() -> Self {
        Self {
            rule: RuleConfig::default(),
            rate: 0,
            rate_timeout: 0,
            granularity: DEFAULT_GRANULARITY as i64,
            unit: Unit::default(),
            max_concurrent: 0,
            concurrent_timeout: 0,
            max_permit_request: 0,
            request_timeout: 0,
            request_interval: 0,
            strategy: Strategy::default(),
            unknown: BTreeMap::new(),
        }
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| LimiterError::InvalidConfiguration {
        field,
        value: value.into(),
    })
}

impl TryFrom<RawLimiterConfig> for LimiterConfig {
    type Error = LimiterError;

    fn try_from(raw: RawLimiterConfig) -> Result<Self> {
        if let Some(key) = raw.unknown.keys().next() {
            return Err(LimiterError::UnknownField(key.clone()));
        }

        let config = LimiterConfig {
            rule: raw.rule,
            rate: non_negative("rate", raw.rate)?,
            rate_timeout: non_negative("rate_timeout", raw.rate_timeout)?,
            granularity: non_negative("granularity", raw.granularity)?,
            unit: raw.unit,
            max_concurrent: non_negative("max_concurrent", raw.max_concurrent)?,
            concurrent_timeout: non_negative("concurrent_timeout", raw.concurrent_timeout)?,
            max_permit_request: non_negative("max_permit_request", raw.max_permit_request)?,
            request_timeout: non_negative("request_timeout", raw.request_timeout)?,
            request_interval: non_negative("request_interval", raw.request_interval)?,
            strategy: raw.strategy,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<LimiterConfig> for RawLimiterConfig {
    fn from(config: LimiterConfig) -> Self {
        // validate() keeps every field at or below i64::MAX.
        let signed = |v: u64| v as i64;
        Self {
            rule: config.rule,
            rate: signed(config.rate),
            rate_timeout: signed(config.rate_timeout),
            granularity: signed(config.granularity),
            unit: config.unit,
            max_concurrent: signed(config.max_concurrent),
            concurrent_timeout: signed(config.concurrent_timeout),
            max_permit_request: signed(config.max_permit_request),
            request_timeout: signed(config.request_timeout),
            request_interval: signed(config.request_interval),
            strategy: config.strategy,
            unknown: BTreeMap::new(),
        }
    }
}
