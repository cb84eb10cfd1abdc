use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PAGELENS_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.fetch_timeout_secs, 30);
    assert_eq!(cfg.probe_timeout_secs, 30);
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.cache_max_entries, 100);
    assert_eq!(cfg.keyword_top_n, 15);
    assert_eq!(cfg.readability_method, ReadabilityMethod::Standard);
    assert_eq!(cfg.failure_policy, FailurePolicy::AbortRemaining);
    assert_eq!(cfg.rate_limit_per_minute, 60);
}

#[test]
fn build_app_config_matches_default_impl() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let default = AppConfig::default();
    assert_eq!(format!("{cfg:?}"), format!("{default:?}"));
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_BIND_ADDR"),
        "expected InvalidEnvVar(PAGELENS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn fetch_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_FETCH_TIMEOUT_SECS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_timeout_secs, 10);
    assert_eq!(cfg.fetch_timeout(), std::time::Duration::from_secs(10));
}

#[test]
fn fetch_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_FETCH_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PAGELENS_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn cache_ttl_invalid_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_CACHE_TTL_SECS", "an hour");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_CACHE_TTL_SECS"),
        "expected InvalidEnvVar(PAGELENS_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn cache_capacity_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_CACHE_MAX_ENTRIES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_CACHE_MAX_ENTRIES"),
        "expected InvalidEnvVar(PAGELENS_CACHE_MAX_ENTRIES), got: {result:?}"
    );
}

#[test]
fn keyword_top_n_zero_is_allowed() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_KEYWORD_TOP_N", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.keyword_top_n, 0);
}

#[test]
fn readability_method_basic_override() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_READABILITY_METHOD", "Basic");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.readability_method, ReadabilityMethod::Basic);
}

#[test]
fn readability_method_unknown_fails() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_READABILITY_METHOD", "textstat");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_READABILITY_METHOD"),
        "expected InvalidEnvVar(PAGELENS_READABILITY_METHOD), got: {result:?}"
    );
}

#[test]
fn failure_policy_isolate_override() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_FAILURE_POLICY", "isolate");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.failure_policy, FailurePolicy::IsolateStages);
}

#[test]
fn failure_policy_unknown_fails() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_FAILURE_POLICY", "retry");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGELENS_FAILURE_POLICY"),
        "expected InvalidEnvVar(PAGELENS_FAILURE_POLICY), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("PAGELENS_USER_AGENT", "pagelens-test/0.1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "pagelens-test/0.1");
}

#[test]
fn strategy_enums_serialize_lowercase() {
    assert_eq!(
        serde_json::to_string(&ReadabilityMethod::Basic).unwrap(),
        "\"basic\""
    );
    assert_eq!(
        serde_json::to_string(&FailurePolicy::IsolateStages).unwrap(),
        "\"isolate_stages\""
    );
}
