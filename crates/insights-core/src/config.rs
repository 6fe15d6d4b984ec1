use std::time::Duration;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every option has a default; only malformed or out-of-range values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let defaults = AppConfig::default();

    let or_default = |var: &str, default: String| -> String { lookup(var).unwrap_or(default) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let raw = or_default(var, default.to_string());
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be at least 1".to_string())),
            n => Ok(n),
        }
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, default.to_string());
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match parse_usize(var, default)? {
            0 => Err(invalid(var, "must be at least 1".to_string())),
            n => Ok(n),
        }
    };

    let env = parse_environment(&or_default("INSIGHTS_ENV", defaults.env.to_string()));

    let bind_addr = or_default("INSIGHTS_BIND_ADDR", defaults.bind_addr.to_string())
        .parse::<SocketAddr>()
        .map_err(|e| invalid("INSIGHTS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("INSIGHTS_LOG_LEVEL", defaults.log_level);

    let page_size = parse_positive_usize("INSIGHTS_PAGE_SIZE", defaults.page_size)?;
    let live_update_interval_secs = parse_positive_u64(
        "INSIGHTS_LIVE_UPDATE_INTERVAL_SECS",
        defaults.live_update_interval.as_secs(),
    )?;
    let refresh_latency_ms = parse_u64(
        "INSIGHTS_REFRESH_LATENCY_MS",
        u64::try_from(defaults.refresh_latency.as_millis()).unwrap_or(u64::MAX),
    )?;
    let campaign_count = parse_usize("INSIGHTS_CAMPAIGN_COUNT", defaults.campaign_count)?;
    let chart_days = parse_usize("INSIGHTS_CHART_DAYS", defaults.chart_days)?;
    let top_campaigns = parse_positive_usize("INSIGHTS_TOP_CAMPAIGNS", defaults.top_campaigns)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        page_size,
        live_update_interval: Duration::from_secs(live_update_interval_secs),
        refresh_latency: Duration::from_millis(refresh_latency_ms),
        campaign_count,
        chart_days,
        top_campaigns,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
