//! Runtime configuration: API credentials, endpoints, and timeouts.
//!
//! Credentials are never compiled in. Use [`Config::from_env`] in binaries or
//! [`Config::new`] when wiring the library by hand.

use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

pub const ENV_STATS_KEY: &str = "COVID_RAPIDAPI_KEY";
pub const ENV_STATS_HOST: &str = "COVID_RAPIDAPI_HOST";
pub const ENV_STATS_BASE_URL: &str = "COVID_STATS_BASE_URL";
pub const ENV_GEOCODE_KEY: &str = "OPENCAGE_API_KEY";
pub const ENV_GEOCODE_BASE_URL: &str = "OPENCAGE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "COVID_REPORT_TIMEOUT_SECS";
pub const ENV_COUNTRY_TTL_SECS: &str = "COVID_REPORT_COUNTRY_TTL_SECS";

pub const DEFAULT_STATS_HOST: &str = "covid-19-data.p.rapidapi.com";
pub const DEFAULT_STATS_BASE_URL: &str = "https://covid-19-data.p.rapidapi.com";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Country list refresh interval (6 hours).
pub const DEFAULT_COUNTRY_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Clone)]
pub struct Config {
    pub stats_api_key: String,
    pub stats_api_host: String,
    pub stats_base_url: String,
    pub geocode_api_key: String,
    pub geocode_base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub country_ttl: Duration,
}

impl Config {
    /// Build a config with the given keys and default endpoints.
    pub fn new(stats_api_key: impl Into<String>, geocode_api_key: impl Into<String>) -> Self {
        Self {
            stats_api_key: stats_api_key.into(),
            stats_api_host: DEFAULT_STATS_HOST.into(),
            stats_base_url: DEFAULT_STATS_BASE_URL.into(),
            geocode_api_key: geocode_api_key.into(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            country_ttl: DEFAULT_COUNTRY_TTL,
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup (the environment, a map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let secs = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match get(name) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::Invalid {
                        var: name,
                        value: raw,
                    }),
            }
        };

        let mut cfg = Self::new(required(ENV_STATS_KEY)?, required(ENV_GEOCODE_KEY)?);
        if let Some(host) = get(ENV_STATS_HOST) {
            cfg.stats_api_host = host;
        }
        if let Some(url) = get(ENV_STATS_BASE_URL) {
            cfg.stats_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get(ENV_GEOCODE_BASE_URL) {
            cfg.geocode_base_url = url.trim_end_matches('/').to_string();
        }
        cfg.timeout = secs(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT)?;
        // A zero timeout fails every request.
        if cfg.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                value: "0".into(),
            });
        }
        cfg.country_ttl = secs(ENV_COUNTRY_TTL_SECS, DEFAULT_COUNTRY_TTL)?;
        Ok(cfg)
    }
}

// Keys stay out of logs and panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("stats_api_key", &"<redacted>")
            .field("stats_api_host", &self.stats_api_host)
            .field("stats_base_url", &self.stats_base_url)
            .field("geocode_api_key", &"<redacted>")
            .field("geocode_base_url", &self.geocode_base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("country_ttl", &self.country_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_keys_given() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_STATS_KEY, "stats-secret"),
            (ENV_GEOCODE_KEY, "geo-secret"),
        ]))
        .unwrap();
        assert_eq!(cfg.stats_api_key, "stats-secret");
        assert_eq!(cfg.geocode_api_key, "geo-secret");
        assert_eq!(cfg.stats_api_host, DEFAULT_STATS_HOST);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.country_ttl, DEFAULT_COUNTRY_TTL);
    }

    #[test]
    fn missing_or_blank_key_is_reported() {
        let err = Config::from_lookup(lookup(&[(ENV_STATS_KEY, "x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_GEOCODE_KEY));

        let err = Config::from_lookup(lookup(&[(ENV_STATS_KEY, "  "), (ENV_GEOCODE_KEY, "y")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_STATS_KEY));
    }

    #[test]
    fn overrides_and_invalid_numbers() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_STATS_KEY, "a"),
            (ENV_GEOCODE_KEY, "b"),
            (ENV_STATS_BASE_URL, "http://localhost:9000/"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.stats_base_url, "http://localhost:9000");
        assert_eq!(cfg.timeout, Duration::from_secs(5));

        let err = Config::from_lookup(lookup(&[
            (ENV_STATS_KEY, "a"),
            (ENV_GEOCODE_KEY, "b"),
            (ENV_COUNTRY_TTL_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == ENV_COUNTRY_TTL_SECS));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (ENV_STATS_KEY, "a"),
            (ENV_GEOCODE_KEY, "b"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                value: "0".into()
            }
        );
    }

    #[test]
    fn debug_output_redacts_keys() {
        let cfg = Config::new("stats-secret", "geo-secret");
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("stats-secret"));
        assert!(!dbg.contains("geo-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
