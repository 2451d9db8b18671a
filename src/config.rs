//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::services::belonio::{ClientOptions, Credentials};

/// Default resource API host.
pub const DEFAULT_API_HOST: &str = "https://sls.beeline.cloud";
/// Default token endpoint host.
pub const DEFAULT_AUTH_HOST: &str = "https://auth.belonio.app";

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// Belonio account login
    pub username: String,
    /// Belonio account password
    pub password: String,
    /// Resource API base URL (no trailing slash)
    pub api_host: String,
    /// Token endpoint base URL (no trailing slash)
    pub auth_host: String,
    /// Retries allowed per authenticated request after the first attempt
    pub retry_budget: u32,
    /// Retries allowed per token request on transport failure
    pub token_retries: u32,
    /// Per-attempt timeout for resource requests
    pub request_timeout: Duration,
    /// Per-attempt timeout for token requests
    pub token_timeout: Duration,
    /// How often the refresh loop runs
    pub refresh_interval: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            username: "test_user".to_string(),
            password: "test_password".to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            auth_host: DEFAULT_AUTH_HOST.to_string(),
            retry_budget: 3,
            token_retries: 3,
            request_timeout: Duration::from_secs(10),
            token_timeout: Duration::from_secs(30),
            refresh_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("auth_host", &self.auth_host)
            .field("retry_budget", &self.retry_budget)
            .field("token_retries", &self.token_retries)
            .field("request_timeout", &self.request_timeout)
            .field("token_timeout", &self.token_timeout)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            username: env::var("BELONIO_USERNAME")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BELONIO_USERNAME"))?,
            password: env::var("BELONIO_PASSWORD")
                .map_err(|_| ConfigError::Missing("BELONIO_PASSWORD"))?,
            api_host: host_var("BELONIO_API_HOST", DEFAULT_API_HOST),
            auth_host: host_var("BELONIO_AUTH_HOST", DEFAULT_AUTH_HOST),
            retry_budget: parse_var("BELONIO_RETRY_BUDGET", 3)?,
            token_retries: parse_var("BELONIO_TOKEN_RETRIES", 3)?,
            request_timeout: secs_var("BELONIO_REQUEST_TIMEOUT_SECS", 10)?,
            token_timeout: secs_var("BELONIO_TOKEN_TIMEOUT_SECS", 30)?,
            refresh_interval: secs_var("BELONIO_REFRESH_INTERVAL_SECS", 60 * 60)?,
        })
    }

    /// Account credentials for the client.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// Endpoint, retry and timeout settings for the client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_host: self.api_host.clone(),
            auth_host: self.auth_host.clone(),
            retry_budget: self.retry_budget,
            token_retries: self.token_retries,
            request_timeout: self.request_timeout,
            token_timeout: self.token_timeout,
        }
    }
}

fn host_var(name: &'static str, default: &str) -> String {
    env::var(name)
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// A whole number of seconds, which must be non-zero.
fn secs_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid(name, raw)),
        },
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
