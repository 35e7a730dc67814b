//! Behaviour of limiter configurations through the public API.

use std::time::Duration;

use neural_limiter::{
    Axis, LimiterConfig, LimiterError, LimiterRules, RawLimiterConfig, RuleConfig, RuleKey,
    Strategy, Unit,
};

fn rule() -> RuleConfig {
    RuleConfig::new("shop", "order", "create")
}

#[test]
fn default_configuration() {
    let config = LimiterConfig::default();
    assert_eq!(config.rate(), 0);
    assert_eq!(config.rate_timeout_ms(), 0);
    assert_eq!(config.granularity(), 1);
    assert_eq!(config.unit(), Unit::Sec);
    assert_eq!(config.max_concurrent(), 0);
    assert_eq!(config.concurrent_timeout_ms(), 0);
    assert_eq!(config.max_permit_request(), 0);
    assert_eq!(config.request_timeout_ms(), 0);
    assert_eq!(config.request_interval_ms(), 0);
    assert_eq!(config.strategy(), Strategy::Non);
    assert_eq!(config.window(), Duration::from_secs(1));
}

#[test]
fn exception_strategy_per_second_window() {
    let config = LimiterConfig::builder(rule())
        .rate(100)
        .granularity(1)
        .unit(Unit::Sec)
        .strategy(Strategy::Exception)
        .build()
        .unwrap();

    assert_eq!(config.window_ms(), 1000);
    assert_eq!(config.rate(), 100);
    assert_eq!(config.strategy(), Strategy::Exception);
    assert_eq!(config.enabled_axes(), vec![Axis::Rate]);
    assert_eq!(config.resource(), "create");
}

#[test]
fn zero_granularity_always_rejected() {
    for unit in Unit::ALL {
        for strategy in Strategy::ALL {
            let result = LimiterConfig::builder(rule())
                .rate(10)
                .max_concurrent(3)
                .unit(unit)
                .strategy(strategy)
                .granularity(0)
                .build();
            assert_eq!(result.unwrap_err().field(), Some("granularity"));
        }
    }
}

#[test]
fn negative_values_rejected_from_documents() {
    let fields = [
        "rate",
        "rate_timeout",
        "granularity",
        "max_concurrent",
        "concurrent_timeout",
        "max_permit_request",
        "request_timeout",
        "request_interval",
    ];

    for field in fields {
        let yaml = format!("limiters:\n  - resource: create\n    {}: -3\n", field);
        match LimiterRules::from_yaml(&yaml).unwrap_err() {
            LimiterError::InvalidConfiguration { field: f, value } => {
                assert_eq!(f, field);
                assert_eq!(value, -3);
            }
            other => panic!("unexpected error for {}: {}", field, other),
        }
    }
}

#[test]
fn window_is_exact_for_large_granularity() {
    let config = LimiterConfig::builder(rule())
        .granularity(1_000_000)
        .unit(Unit::Day)
        .build()
        .unwrap();
    assert_eq!(config.window_ms(), 86_400_000_000_000);
}

#[test]
fn unknown_tokens_never_default() {
    assert!("BOGUS".parse::<Strategy>().is_err());
    assert!("BOGUS".parse::<Unit>().is_err());

    let json = r#"{"resource": "create", "unit": "BOGUS"}"#;
    assert!(serde_json::from_str::<RawLimiterConfig>(json).is_err());
}

#[test]
fn documents_round_trip_all_fields() {
    let yaml = r#"
limiters:
  - application: shop
    group: order
    resource: create
    enable: false
    remarks: checkout path
    rate: 100
    rate_timeout: 10
    granularity: 5
    unit: MIN
    max_concurrent: 8
    concurrent_timeout: 20
    max_permit_request: 500
    request_timeout: 30
    request_interval: 60000
    strategy: FALLBACK
"#;
    let rules = LimiterRules::from_yaml(yaml).unwrap();
    let config = rules.get(&RuleKey::new("shop", "order", "create")).unwrap();

    let mut expected_rule = rule();
    expected_rule.enable = false;
    expected_rule.remarks = Some("checkout path".to_string());

    let expected = LimiterConfig::builder(expected_rule)
        .rate(100)
        .rate_timeout_ms(10)
        .granularity(5)
        .unit(Unit::Min)
        .max_concurrent(8)
        .concurrent_timeout_ms(20)
        .max_permit_request(500)
        .request_timeout_ms(30)
        .request_interval_ms(60_000)
        .strategy(Strategy::Fallback)
        .build()
        .unwrap();

    assert_eq!(config, &expected);
    assert!(!config.enabled());
    assert_eq!(config.window(), Duration::from_secs(300));
}
