use axum::http::{HeaderValue, Method};
use std::env;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const DEFAULT_VALID_INTERVALS: &str = "1min,5min,15min,30min,60min";
const WILDCARD_ORIGIN: &str = "*";

/// Front-end origins allowed when `ALLOWED_ORIGINS` is not set.
const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:4000",
    "http://localhost:3500",
    "https://marketmind-ezjx.onrender.com",
    "https://getmarketmind.com",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be an integer, got '{0}'")]
    InvalidPort(String),
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Upstream credential. Every upstream call fails while this is unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub valid_intervals: Vec<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source, `from_env` minus the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = match lookup("ALLOWED_ORIGINS").filter(|v| !v.is_empty()) {
            Some(raw) => split_list(&raw)
                .into_iter()
                .filter(|origin| origin != WILDCARD_ORIGIN)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            debug: lookup("DEBUG").is_some_and(|d| d.to_lowercase() == "true"),
            api_key: lookup("API_KEY").filter(|k| !k.is_empty()),
            base_url: lookup("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            valid_intervals: split_list(
                &lookup("VALID_INTERVALS").unwrap_or_else(|| DEFAULT_VALID_INTERVALS.to_string()),
            ),
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_valid_interval(&self, interval: &str) -> bool {
        self.valid_intervals.iter().any(|i| i == interval)
    }

    /// CORS policy restricted to the configured origin allow-list.
    /// A wildcard entry is skipped; only named origins are ever allowed.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter(|origin| {
                let wildcard = origin.as_str() == WILDCARD_ORIGIN;
                if wildcard {
                    warn!("Ignoring wildcard allowed origin");
                }
                !wildcard
            })
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring malformed allowed origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
