//! Configuration loading from the environment.

use std::env;

use crate::config::schema::CaptureConfig;

const ENV_BIND_ADDRESS: &str = "HEP_BIND_ADDRESS";
const ENV_DB_HOST: &str = "DB_HOST";
const ENV_DB_NAME: &str = "DB_NAME";
const ENV_DB_USER: &str = "DB_USER";
const ENV_DB_PASS: &str = "DB_PASS";
const ENV_DEBUG: &str = "DEBUG";
const ENV_METRICS_ADDRESS: &str = "HEP_METRICS_ADDRESS";

impl CaptureConfig {
    /// Build the configuration from environment variables, falling back to
    /// the defaults for anything unset or empty.
    ///
    /// Setting `HEP_METRICS_ADDRESS` also enables the metrics endpoint.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(addr) = env_value(ENV_BIND_ADDRESS) {
            config.listener.bind_address = addr;
        }
        if let Some(host) = env_value(ENV_DB_HOST) {
            config.database.host = host;
        }
        if let Some(name) = env_value(ENV_DB_NAME) {
            config.database.name = name;
        }
        if let Some(user) = env_value(ENV_DB_USER) {
            config.database.user = user;
        }
        if let Some(pass) = env_value(ENV_DB_PASS) {
            config.database.password = pass;
        }
        if let Some(debug) = env_value(ENV_DEBUG) {
            config.debug = debug.eq_ignore_ascii_case("true");
        }
        if let Some(addr) = env_value(ENV_METRICS_ADDRESS) {
            config.observability.metrics_address = addr;
            config.observability.metrics_enabled = true;
        }

        config
    }
}

/// Read an environment variable, treating unset and empty as absent.
fn env_value(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so environment mutation cannot race a parallel test in
    // this process.
    #[test]
    fn from_env_overrides_and_defaults() {
        for key in [
            ENV_BIND_ADDRESS,
            ENV_DB_HOST,
            ENV_DB_NAME,
            ENV_DB_USER,
            ENV_DB_PASS,
            ENV_DEBUG,
            ENV_METRICS_ADDRESS,
        ] {
            env::remove_var(key);
        }

        let config = CaptureConfig::from_env();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database.host, "localhost:3306");
        assert!(!config.debug);
        assert!(!config.observability.metrics_enabled);

        env::set_var(ENV_BIND_ADDRESS, "127.0.0.1:9060");
        env::set_var(ENV_DB_HOST, "db.internal:3306");
        env::set_var(ENV_DB_NAME, "captures");
        env::set_var(ENV_DB_USER, "hep");
        env::set_var(ENV_DB_PASS, "secret");
        env::set_var(ENV_DEBUG, "TRUE");
        env::set_var(ENV_METRICS_ADDRESS, "127.0.0.1:9091");

        let config = CaptureConfig::from_env();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9060");
        assert_eq!(config.database.host, "db.internal:3306");
        assert_eq!(config.database.name, "captures");
        assert_eq!(config.database.user, "hep");
        assert_eq!(config.database.password, "secret");
        assert!(config.debug);
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9091");

        // Empty values fall back to defaults rather than overriding.
        env::set_var(ENV_DB_HOST, "");
        env::set_var(ENV_DEBUG, "false");
        let config = CaptureConfig::from_env();
        assert_eq!(config.database.host, "localhost:3306");
        assert!(!config.debug);

        for key in [
            ENV_BIND_ADDRESS,
            ENV_DB_HOST,
            ENV_DB_NAME,
            ENV_DB_USER,
            ENV_DB_PASS,
            ENV_DEBUG,
            ENV_METRICS_ADDRESS,
        ] {
            env::remove_var(key);
        }
    }
}
