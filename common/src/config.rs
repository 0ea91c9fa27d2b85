use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub server_url: String,
    pub allowed_origin: String,
    pub http_workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            server_url: "http://127.0.0.1:8080".to_string(),
            allowed_origin: "*".to_string(),
            http_workers: None,
        }
    }
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_workers = match lookup("HTTP_WORKERS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "HTTP_WORKERS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            server_url: lookup("SERVER_URL").unwrap_or(defaults.server_url),
            allowed_origin: lookup("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            http_workers,
        })
    }
}
