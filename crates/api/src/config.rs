use std::str::FromStr;

use mechgraph_store::StoreConfig;

use crate::auth::jwt::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything the server binary needs to start.
///
/// `HOST`, `PORT`, `CORS_ORIGINS` (comma-separated) and
/// `REQUEST_TIMEOUT_SECS` are optional. The session and store sections have
/// their own loaders.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// On a malformed value or a missing required store variable.
    pub fn from_env() -> Self {
        let store = StoreConfig::from_env().unwrap_or_else(|e| panic!("{e}"));

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parsed_env("PORT", DEFAULT_PORT),
            cors_origins: split_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            jwt: JwtConfig::from_env(),
            store,
        }
    }
}

fn parsed_env<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} is not valid ({raw:?}): {e}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
