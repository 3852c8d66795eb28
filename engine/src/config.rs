//! # Config
//!
//! Define and implement config options for the field report engine

use crate::acquire::AccuracyPolicy;
use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

/// struct holding configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// sampling window of a position acquisition, in milliseconds
    pub acquire_timeout_ms: u64,

    /// accuracy requested from the location sensor, in meters
    pub desired_accuracy_meters: f64,

    /// timeout of the single-shot fallback request, in milliseconds
    pub fallback_timeout_ms: u64,

    /// interval between published countdown states, in milliseconds
    pub progress_interval_ms: u64,

    /// radius used when retrieving an attached report, in meters
    pub retrieve_radius_meters: f64,

    /// how the desired accuracy is applied (`advisory` or `accept_when_met`)
    pub accuracy_policy: AccuracyPolicy,

    /// path to log configuration YAML file
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        log::warn!("(default) Creating Config object with default values.");
        Self::new()
    }
}

impl Config {
    /// Default values for Config
    pub fn new() -> Self {
        Config {
            acquire_timeout_ms: 15_000,
            desired_accuracy_meters: 20.0,
            fallback_timeout_ms: 10_000,
            progress_interval_ms: 1_000,
            retrieve_radius_meters: crate::proximity::DEFAULT_RETRIEVE_RADIUS_METERS,
            accuracy_policy: AccuracyPolicy::Advisory,
            log_config: String::from("log4rs.yaml"),
        }
    }

    /// Create a new `Config` object using environment variables
    pub fn try_from_env() -> Result<Self, ConfigError> {
        // read .env file if present
        dotenv().ok();
        let default_config = Config::default();

        config::Config::builder()
            .set_default("acquire_timeout_ms", default_config.acquire_timeout_ms)?
            .set_default(
                "desired_accuracy_meters",
                default_config.desired_accuracy_meters,
            )?
            .set_default("fallback_timeout_ms", default_config.fallback_timeout_ms)?
            .set_default("progress_interval_ms", default_config.progress_interval_ms)?
            .set_default(
                "retrieve_radius_meters",
                default_config.retrieve_radius_meters,
            )?
            .set_default("accuracy_policy", "advisory")?
            .set_default("log_config", default_config.log_config)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use crate::acquire::AccuracyPolicy;
    use crate::Config;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "ACQUIRE_TIMEOUT_MS",
        "DESIRED_ACCURACY_METERS",
        "FALLBACK_TIMEOUT_MS",
        "PROGRESS_INTERVAL_MS",
        "RETRIEVE_RADIUS_METERS",
        "ACCURACY_POLICY",
        "LOG_CONFIG",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_config_from_default() {
        crate::get_log_handle().await;
        ut_info!("(test_config_from_default) Start.");

        let config = Config::default();

        assert_eq!(config.acquire_timeout_ms, 15_000);
        assert_eq!(config.desired_accuracy_meters, 20.0);
        assert_eq!(config.fallback_timeout_ms, 10_000);
        assert_eq!(config.progress_interval_ms, 1_000);
        assert_eq!(config.retrieve_radius_meters, 50.0);
        assert_eq!(config.accuracy_policy, AccuracyPolicy::Advisory);
        assert_eq!(config.log_config, String::from("log4rs.yaml"));

        ut_info!("(test_config_from_default) Success.");
    }

    #[tokio::test]
    #[serial]
    async fn test_config_defaults_without_env() {
        crate::get_log_handle().await;
        ut_info!("(test_config_defaults_without_env) Start.");

        clear_env();
        let config = Config::try_from_env().unwrap();

        assert_eq!(config.acquire_timeout_ms, 15_000);
        assert_eq!(config.accuracy_policy, AccuracyPolicy::Advisory);

        ut_info!("(test_config_defaults_without_env) Success.");
    }

    #[tokio::test]
    #[serial]
    async fn test_config_from_env() {
        crate::get_log_handle().await;
        ut_info!("(test_config_from_env) Start.");

        std::env::set_var("ACQUIRE_TIMEOUT_MS", "30000");
        std::env::set_var("DESIRED_ACCURACY_METERS", "5.5");
        std::env::set_var("FALLBACK_TIMEOUT_MS", "2500");
        std::env::set_var("PROGRESS_INTERVAL_MS", "250");
        std::env::set_var("RETRIEVE_RADIUS_METERS", "75");
        std::env::set_var("ACCURACY_POLICY", "accept_when_met");
        std::env::set_var("LOG_CONFIG", "config_file.yaml");

        let config = Config::try_from_env();
        clear_env();
        assert!(config.is_ok());
        let config = config.unwrap();

        assert_eq!(config.acquire_timeout_ms, 30_000);
        assert_eq!(config.desired_accuracy_meters, 5.5);
        assert_eq!(config.fallback_timeout_ms, 2_500);
        assert_eq!(config.progress_interval_ms, 250);
        assert_eq!(config.retrieve_radius_meters, 75.0);
        assert_eq!(config.accuracy_policy, AccuracyPolicy::AcceptWhenMet);
        assert_eq!(config.log_config, String::from("config_file.yaml"));

        ut_info!("(test_config_from_env) Success.");
    }
}
