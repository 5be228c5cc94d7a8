use std::time::Duration;

use reqwest::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub prefetch_csrf: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = Url::parse(&env_or("TRACKER_BASE_URL", "http://127.0.0.1:5000"))
            .map_err(|e| format!("Invalid TRACKER_BASE_URL: {e}"))?;

        let debounce_ms: u64 = env_or("TRACKER_SEARCH_DEBOUNCE_MS", "300")
            .parse()
            .map_err(|e| format!("Invalid TRACKER_SEARCH_DEBOUNCE_MS: {e}"))?;

        let timeout_secs: u64 = env_or("TRACKER_REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid TRACKER_REQUEST_TIMEOUT_SECS: {e}"))?;

        let prefetch_csrf = match env_or("TRACKER_PREFETCH_CSRF", "true").as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("Invalid TRACKER_PREFETCH_CSRF: {other}")),
        };

        let log_level = env_or("TRACKER_LOG_LEVEL", "info");

        Ok(Config {
            base_url,
            search_debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            prefetch_csrf,
            log_level,
        })
    }

    /// Defaults pointed at a specific backend.
    pub fn for_base_url(base_url: Url) -> Self {
        Config {
            base_url,
            search_debounce: Duration::from_millis(300),
            request_timeout: Duration::from_secs(30),
            prefetch_csrf: true,
            log_level: "info".to_string(),
        }
    }
}
