//! Configuration module
//!
//! Client configuration: backend location, where the session is persisted,
//! HTTP timeout and the timings of the progress tracker. Values come from
//! `CHAPTERCRAFT_*` environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    COMPLETION_REDIRECT_DELAY_MS, DEFAULT_API_URL, MAX_UPLOAD_MB, PROGRESS_POLL_INTERVAL_MS,
};

const HTTP_TIMEOUT_SECS: u64 = 60;
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration shared by the API client, the session store and the views.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub redirect_delay_ms: u64,
    pub max_upload_mb: u64,
    pub environment: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: default_session_file(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            poll_interval_ms: PROGRESS_POLL_INTERVAL_MS,
            redirect_delay_ms: COMPLETION_REDIRECT_DELAY_MS,
            max_upload_mb: MAX_UPLOAD_MB,
            environment: "development".to_string(),
        }
    }
}

/// `$HOME/.chaptercraft/session.json`, or the working directory when HOME is unset.
fn default_session_file() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chaptercraft")
        .join(SESSION_FILE_NAME)
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let defaults = Self::default();

        let config = Self {
            api_url: env::var("CHAPTERCRAFT_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or(defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            session_file: env::var("CHAPTERCRAFT_SESSION_FILE")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            http_timeout_secs: env::var("CHAPTERCRAFT_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            poll_interval_ms: env::var("CHAPTERCRAFT_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| PROGRESS_POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(PROGRESS_POLL_INTERVAL_MS),
            redirect_delay_ms: env::var("CHAPTERCRAFT_REDIRECT_DELAY_MS")
                .unwrap_or_else(|_| COMPLETION_REDIRECT_DELAY_MS.to_string())
                .parse()
                .unwrap_or(COMPLETION_REDIRECT_DELAY_MS),
            max_upload_mb: env::var("CHAPTERCRAFT_MAX_UPLOAD_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_MB.to_string())
                .parse()
                .unwrap_or(MAX_UPLOAD_MB),
            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment)
                .to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "CHAPTERCRAFT_API_URL must start with http:// or https://"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CHAPTERCRAFT_HTTP_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!(
                "CHAPTERCRAFT_POLL_INTERVAL_MS must be greater than 0"
            ));
        }

        if self.max_upload_mb == 0 {
            return Err(anyhow::anyhow!(
                "CHAPTERCRAFT_MAX_UPLOAD_MB must be greater than 0"
            ));
        }

        Ok(())
    }

    /// Check if the client is running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production" || self.environment == "prod"
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tracker_timings() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.redirect_delay(), Duration::from_secs(2));
        assert_eq!(config.max_upload_bytes(), 25 * 1024 * 1024);
        assert!(config.session_file.ends_with(".chaptercraft/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig {
            api_url: "localhost:8001".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL"));
    }

    #[test]
    fn test_is_production() {
        let config = ClientConfig {
            environment: "prod".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.is_production());
        assert!(!ClientConfig::default().is_production());
    }
}
