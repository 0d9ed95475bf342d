use std::env;
use std::time::Duration;

use reqwest::Url;
use smart_default::SmartDefault;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("Blog origin '{0}' is not an http(s) URL")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, PartialEq, Eq, SmartDefault)]
pub struct Config {
    /// Blog whose feeds and label pages the shortcodes point at.
    #[default(String::from("http://localhost"))]
    pub origin: String,

    #[default(Duration::from_secs(5 * 60))]
    pub cache_ttl: Duration,

    #[default(Duration::from_secs(10))]
    pub fetch_timeout: Duration,

    #[default(1_000)]
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(origin) = lookup("SHORTCODE_ORIGIN") {
            config.origin = origin;
        }
        if let Some(secs) = read_u64(&lookup, "SHORTCODE_CACHE_TTL_SECS")? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = read_u64(&lookup, "SHORTCODE_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(capacity) = read_u64(&lookup, "SHORTCODE_CACHE_CAPACITY")? {
            config.cache_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Result<Self, ConfigError> {
        self.origin = origin.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.origin) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidOrigin(self.origin.clone())),
        }
    }
}

fn read_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    lookup(name)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                name,
                value: value.clone(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SHORTCODE_ORIGIN", "https://travel.blogspot.com"),
            ("SHORTCODE_CACHE_TTL_SECS", "60"),
            ("SHORTCODE_FETCH_TIMEOUT_SECS", " 3 "),
            ("SHORTCODE_CACHE_CAPACITY", "50"),
        ]))
        .unwrap();

        assert_eq!(config.origin, "https://travel.blogspot.com");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.cache_capacity, 50);
    }

    #[test]
    fn test_invalid_number() {
        let err =
            Config::from_lookup(lookup(&[("SHORTCODE_CACHE_TTL_SECS", "five")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SHORTCODE_CACHE_TTL_SECS",
                value: "five".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_origin() {
        assert!(matches!(
            Config::default().with_origin("ftp://blog.example"),
            Err(ConfigError::InvalidOrigin(_))
        ));
        assert!(Config::default().with_origin("not a url").is_err());
        assert!(Config::default().with_origin("https://blog.example").is_ok());
    }
}
