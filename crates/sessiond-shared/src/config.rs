//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

/// Inactivity-timeout tunables. The actual timeout value comes from the
/// policy table at runtime; these only control defaults and refresh cadence.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub default_timeout_hours: f64,
    pub refresh_interval_hours: f64,
    pub policy_max_age_hours: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_timeout_hours: constants::DEFAULT_TIMEOUT_HOURS,
            refresh_interval_hours: constants::DEFAULT_REFRESH_INTERVAL_HOURS,
            policy_max_age_hours: constants::DEFAULT_POLICY_MAX_AGE_HOURS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "sessiond-server")?
            .set_default("database.max_connections", 5)?
            .set_default("session.default_timeout_hours", constants::DEFAULT_TIMEOUT_HOURS)?
            .set_default(
                "session.refresh_interval_hours",
                constants::DEFAULT_REFRESH_INTERVAL_HOURS,
            )?
            .set_default(
                "session.policy_max_age_hours",
                constants::DEFAULT_POLICY_MAX_AGE_HOURS,
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}
