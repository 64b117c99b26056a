// backend/src/config.rs

use std::{env, str::FromStr, time::Duration};

pub const DEFAULT_TAIL_NUMBER: &str = "N593EH";
pub const DEFAULT_FLIGHTAWARE_URL: &str = "https://aeroapi.flightaware.com/aeroapi";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub flightaware: FlightAwareConfig,
    pub default_tail_number: String,
    pub refresh_window_days: i64,
}

#[derive(Clone, Debug)]
pub struct FlightAwareConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            database_max_connections: 10,
            flightaware: FlightAwareConfig {
                api_key: None,
                base_url: DEFAULT_FLIGHTAWARE_URL.to_string(),
                timeout: Duration::from_secs(30),
            },
            default_tail_number: DEFAULT_TAIL_NUMBER.to_string(),
            refresh_window_days: 90,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset and blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let refresh_window_days = parsed(&get, "REFRESH_WINDOW_DAYS", defaults.refresh_window_days)?;
        if refresh_window_days <= 0 {
            return Err(ConfigError::InvalidValue {
                var: "REFRESH_WINDOW_DAYS",
                value: refresh_window_days.to_string(),
            });
        }

        Ok(Config {
            port: parsed(&get, "PORT", defaults.port)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parsed(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            flightaware: FlightAwareConfig {
                api_key: get("FLIGHTAWARE_API_KEY"),
                base_url: get("FLIGHTAWARE_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.flightaware.base_url),
                timeout: Duration::from_secs(parsed(
                    &get,
                    "FLIGHTAWARE_TIMEOUT_SECS",
                    defaults.flightaware.timeout.as_secs(),
                )?),
            },
            default_tail_number: get("DEFAULT_TAIL_NUMBER").unwrap_or(defaults.default_tail_number),
            refresh_window_days,
        })
    }
}

fn parsed<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_tail_number, "N593EH");
        assert_eq!(config.refresh_window_days, 90);
        assert!(config.database_url.is_none());
        assert!(config.flightaware.api_key.is_none());
        assert_eq!(config.flightaware.timeout, Duration::from_secs(30));
    }

    #[test]
    fn values_override_defaults() {
        let config = from(&[
            ("PORT", "5000"),
            ("DATABASE_URL", "postgres://localhost/airlogger"),
            ("FLIGHTAWARE_API_KEY", "secret"),
            ("FLIGHTAWARE_BASE_URL", "http://127.0.0.1:9000/aeroapi/"),
            ("DEFAULT_TAIL_NUMBER", "N12345"),
            ("REFRESH_WINDOW_DAYS", "30"),
        ])
        .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.flightaware.base_url, "http://127.0.0.1:9000/aeroapi");
        assert_eq!(config.default_tail_number, "N12345");
        assert_eq!(config.refresh_window_days, 30);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(from(&[("REFRESH_WINDOW_DAYS", "0")]).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = from(&[("FLIGHTAWARE_API_KEY", "  ")]).unwrap();
        assert!(config.flightaware.api_key.is_none());
    }
}
