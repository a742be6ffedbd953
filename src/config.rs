use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_MAX_PHOTOS: usize = 10;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
const DEFAULT_NOTIFICATION_BUFFER_SIZE: usize = 32;
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Deployment environment name ("development", "production", ...)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level filter ("trace" through "error")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-session cap on captured photos
    #[validate(range(min = 1))]
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,

    /// Buffer size of the domain event channel
    #[validate(range(min = 1))]
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Buffer size of the notification (toast) channel
    #[validate(range(min = 1))]
    #[serde(default = "default_notification_buffer_size")]
    pub notification_buffer_size: usize,
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_max_photos() -> usize {
    DEFAULT_MAX_PHOTOS
}

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

fn default_notification_buffer_size() -> usize {
    DEFAULT_NOTIFICATION_BUFFER_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            max_photos: default_max_photos(),
            event_buffer_size: default_event_buffer_size(),
            notification_buffer_size: default_notification_buffer_size(),
        }
    }
}

/// Loads configuration from `config/<env>.toml` (if present) and
/// `VALVETRACK_*` environment variables, falling back to defaults.
pub fn load() -> Result<AppConfig, ConfigError> {
    let environment = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("environment", environment.clone())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("max_photos", DEFAULT_MAX_PHOTOS as i64)?
        .set_default("event_buffer_size", DEFAULT_EVENT_BUFFER_SIZE as i64)?
        .set_default(
            "notification_buffer_size",
            DEFAULT_NOTIFICATION_BUFFER_SIZE as i64,
        )?;

    let config_file = Path::new(CONFIG_DIR).join(format!("{}.toml", environment));
    if config_file.exists() {
        builder = builder.add_source(File::from(config_file));
    }

    let config = builder
        .add_source(Environment::with_prefix("VALVETRACK").try_parsing(true))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config
        .validate()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_capture_ui() {
        let config = AppConfig::default();
        assert_eq!(config.max_photos, 10);
        assert_eq!(config.environment, "development");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_max_photos_fails_validation() {
        let config = AppConfig {
            max_photos: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_honors_environment_overrides() {
        env::set_var("VALVETRACK_MAX_PHOTOS", "25");
        env::set_var("VALVETRACK_LOG_LEVEL", "debug");

        let config = load().unwrap();
        assert_eq!(config.max_photos, 25);
        assert_eq!(config.log_level, "debug");
        // Untouched keys keep their defaults.
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);

        env::remove_var("VALVETRACK_MAX_PHOTOS");
        env::remove_var("VALVETRACK_LOG_LEVEL");
    }
}
