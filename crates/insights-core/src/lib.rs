//! Shared domain types and configuration for the campaign insights dashboard.

pub mod app_config;
pub mod campaigns;
pub mod config;
pub mod error;

pub use app_config::{AppConfig, Environment};
pub use campaigns::{
    AggregateMetrics, CampaignRecord, CampaignStatus, ChannelShare, ChartPoint, ParseStatusError,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
