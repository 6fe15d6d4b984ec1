use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Rows per table page.
    pub page_size: usize,
    /// Cadence of the simulated live feed.
    pub live_update_interval: Duration,
    /// Simulated latency of an explicit refresh.
    pub refresh_latency: Duration,
    pub campaign_count: usize,
    pub chart_days: usize,
    /// Row count of the "top performing campaigns" view.
    pub top_campaigns: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            page_size: 10,
            live_update_interval: Duration::from_secs(30),
            refresh_latency: Duration::from_millis(1500),
            campaign_count: 100,
            chart_days: 30,
            top_campaigns: 10,
        }
    }
}
