use std::time::Duration;

use eduhub_client::ClientConfig;

use crate::error::ConsoleError;

/// Console configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend origin (default: `http://localhost:8080`).
    pub api_base_url: String,
    /// Realtime websocket URL. Derived from the API origin when unset.
    pub realtime_url: String,
    /// Token database (default: `sqlite://eduhub-console.db`).
    pub token_db_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Search box debounce in milliseconds (default: `300`).
    pub search_debounce_ms: u64,
    /// Route published when the session ends (default: `/login`).
    pub login_route: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let api_base_url = "http://localhost:8080".to_string();
        Self {
            realtime_url: derive_realtime_url(&api_base_url),
            api_base_url,
            token_db_url: "sqlite://eduhub-console.db".to_string(),
            request_timeout_secs: 30,
            search_debounce_ms: 300,
            login_route: "/login".to_string(),
        }
    }
}

/// `http(s)://host` becomes `ws(s)://host/ws`.
fn derive_realtime_url(api_base_url: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    let ws = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws}/ws")
}

fn parse_var(name: &str, default: u64) -> Result<u64, ConsoleError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| {
                ConsoleError::Config(format!(
                    "{name} must be a non-negative integer, got {raw:?}"
                ))
            }),
        Err(_) => Ok(default),
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                           |
    /// |------------------------|-----------------------------------|
    /// | `API_BASE_URL`         | `http://localhost:8080`           |
    /// | `REALTIME_URL`         | `API_BASE_URL` as `ws://…/ws`     |
    /// | `TOKEN_DB_URL`         | `sqlite://eduhub-console.db`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                              |
    /// | `SEARCH_DEBOUNCE_MS`   | `300`                             |
    /// | `LOGIN_ROUTE`          | `/login`                          |
    pub fn from_env() -> Result<Self, ConsoleError> {
        let defaults = Self::default();

        let api_base_url = std::env::var("API_BASE_URL").unwrap_or(defaults.api_base_url);
        let realtime_url = std::env::var("REALTIME_URL")
            .unwrap_or_else(|_| derive_realtime_url(&api_base_url));

        Ok(Self {
            realtime_url,
            api_base_url,
            token_db_url: std::env::var("TOKEN_DB_URL").unwrap_or(defaults.token_db_url),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            search_debounce_ms: parse_var("SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms)?,
            login_route: std::env::var("LOGIN_ROUTE").unwrap_or(defaults.login_route),
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            login_route: self.login_route.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_url_follows_api_scheme() {
        assert_eq!(derive_realtime_url("http://localhost:8080"), "ws://localhost:8080/ws");
        assert_eq!(derive_realtime_url("https://api.eduhub.vn/"), "wss://api.eduhub.vn/ws");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ConsoleConfig::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.client_config().timeout, Duration::from_secs(30));
        assert_eq!(config.login_route, "/login");
    }
}
