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

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.page_size, 10);
    assert_eq!(cfg.live_update_interval, Duration::from_secs(30));
    assert_eq!(cfg.refresh_latency, Duration::from_millis(1500));
    assert_eq!(cfg.campaign_count, 100);
    assert_eq!(cfg.chart_days, 30);
    assert_eq!(cfg.top_campaigns, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_ENV", "production");
    map.insert("INSIGHTS_BIND_ADDR", "127.0.0.1:8080");
    map.insert("INSIGHTS_PAGE_SIZE", "25");
    map.insert("INSIGHTS_LIVE_UPDATE_INTERVAL_SECS", "5");
    map.insert("INSIGHTS_REFRESH_LATENCY_MS", "0");
    map.insert("INSIGHTS_CAMPAIGN_COUNT", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.page_size, 25);
    assert_eq!(cfg.live_update_interval, Duration::from_secs(5));
    assert_eq!(cfg.refresh_latency, Duration::ZERO);
    assert_eq!(cfg.campaign_count, 0);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_BIND_ADDR", "not-a-socket-addr");
    assert_invalid(&map, "INSIGHTS_BIND_ADDR");
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_PAGE_SIZE", "0");
    assert_invalid(&map, "INSIGHTS_PAGE_SIZE");
}

#[test]
fn build_app_config_rejects_non_numeric_page_size() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_PAGE_SIZE", "ten");
    assert_invalid(&map, "INSIGHTS_PAGE_SIZE");
}

#[test]
fn build_app_config_rejects_zero_live_update_interval() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_LIVE_UPDATE_INTERVAL_SECS", "0");
    assert_invalid(&map, "INSIGHTS_LIVE_UPDATE_INTERVAL_SECS");
}

#[test]
fn build_app_config_rejects_negative_refresh_latency() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_REFRESH_LATENCY_MS", "-1");
    assert_invalid(&map, "INSIGHTS_REFRESH_LATENCY_MS");
}

#[test]
fn build_app_config_rejects_zero_top_campaigns() {
    let mut map = HashMap::new();
    map.insert("INSIGHTS_TOP_CAMPAIGNS", "0");
    assert_invalid(&map, "INSIGHTS_TOP_CAMPAIGNS");
}
