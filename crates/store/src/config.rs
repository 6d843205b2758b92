use std::fmt;
use std::time::Duration;

/// `STORE_URL` value selecting the in-memory backend instead of Postgres.
pub const MEMORY_STORE_URL: &str = "memory://";

/// Default per-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default Postgres pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Store connection settings.
#[derive(Clone)]
pub struct StoreConfig {
    /// Postgres connection URL, or [`MEMORY_STORE_URL`].
    pub url: String,
    /// Public API key clients must present with every request.
    pub api_key: String,
    /// Upper bound on every access-layer call.
    pub call_timeout: Duration,
    /// Postgres pool size.
    pub max_connections: u32,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("call_timeout", &self.call_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `STORE_URL`             | **yes**  | --      |
    /// | `STORE_API_KEY`         | **yes**  | --      |
    /// | `STORE_TIMEOUT_SECS`    | no       | `10`    |
    /// | `STORE_MAX_CONNECTIONS` | no       | `20`    |
    ///
    /// A missing required value is a fatal startup condition for the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let url = required("STORE_URL")?;
        let api_key = required("STORE_API_KEY")?;

        let timeout_secs: u64 = match lookup("STORE_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: "STORE_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: raw,
                })?,
        };

        let max_connections: u32 = match lookup("STORE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    var: "STORE_MAX_CONNECTIONS",
                    expected: "a positive integer",
                    value: raw,
                })?,
        };

        Ok(Self {
            url,
            api_key,
            call_timeout: Duration::from_secs(timeout_secs),
            max_connections,
        })
    }

    /// Whether `url` selects the in-memory backend.
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_STORE_URL
    }
}
