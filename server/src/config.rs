//! Server configuration parsed from environment variables.

use threads::permissions::AccessRole;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CHAT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),

    #[error("invalid CHAT_ROLE: {0} (expected 'admin' or 'member')")]
    InvalidRole(String),

    #[error("invalid {var}: {value} (expected an http:// or https:// URL)")]
    InvalidUrl { var: &'static str, value: String },

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL of the assistant service (`/chat`).
    pub chat_api_url: String,
    /// Base URL of the database setup service (`/connect-db`).
    pub connect_api_url: String,
    pub role: AccessRole,
    pub upstream_timeout_secs: u64,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CHAT_API_URL`: default `http://127.0.0.1:8000`
    /// - `CONNECT_API_URL`: defaults to `CHAT_API_URL`
    /// - `CHAT_ROLE`: `member` (default) or `admin`
    /// - `UPSTREAM_TIMEOUT_SECS`: default 120
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let chat_api_url = parse_url(
            "CHAT_API_URL",
            non_empty(lookup("CHAT_API_URL")).unwrap_or_else(|| DEFAULT_CHAT_API_URL.to_owned()),
        )?;
        let connect_api_url = match non_empty(lookup("CONNECT_API_URL")) {
            Some(raw) => parse_url("CONNECT_API_URL", raw)?,
            None => chat_api_url.clone(),
        };

        let role = match non_empty(lookup("CHAT_ROLE")) {
            Some(raw) => AccessRole::parse(&raw).ok_or(ConfigError::InvalidRole(raw))?,
            None => AccessRole::default(),
        };

        let upstream_timeout_secs = non_empty(lookup("UPSTREAM_TIMEOUT_SECS"))
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Ok(Self { port, chat_api_url, connect_api_url, role, upstream_timeout_secs })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_url(var: &'static str, raw: String) -> Result<String, ConfigError> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Ok(raw.trim_end_matches('/').to_owned())
    } else {
        Err(ConfigError::InvalidUrl { var, value: raw })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
