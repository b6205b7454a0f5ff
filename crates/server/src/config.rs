//! Process configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::error::ServerError;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] =
    ["https://cultural-zodiac.netlify.app", "http://localhost:3000"];
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_QLOO_BASE_URL: &str = "https://hackathon.api.qloo.com";
pub const DEFAULT_HTTP_PORT: u16 = 8000;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_TAGGER_TIMEOUT_SECS: u64 = 8;
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Settings {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Tagging is skipped entirely when this is `None`
    pub qloo_api_key: Option<String>,
    pub qloo_base_url: String,
    pub allowed_origins: Vec<String>,
    pub http_port: u16,
    pub connect_timeout: Duration,
    pub tagger_timeout: Duration,
    pub generator_timeout: Duration,
    /// Use this catalog file instead of the embedded one
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini_api_key =
            get("GEMINI_API_KEY").ok_or(ServerError::MissingCredential("GEMINI_API_KEY"))?;

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let settings = Settings {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            qloo_api_key: get("QLOO_API_KEY"),
            qloo_base_url: get("QLOO_BASE_URL").unwrap_or_else(|| DEFAULT_QLOO_BASE_URL.to_string()),
            allowed_origins,
            http_port: parse_or("HTTP_PORT", get("HTTP_PORT"), DEFAULT_HTTP_PORT)?,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            tagger_timeout: Duration::from_secs(parse_or(
                "TAGGER_TIMEOUT_SECS",
                get("TAGGER_TIMEOUT_SECS"),
                DEFAULT_TAGGER_TIMEOUT_SECS,
            )?),
            generator_timeout: Duration::from_secs(parse_or(
                "GENERATOR_TIMEOUT_SECS",
                get("GENERATOR_TIMEOUT_SECS"),
                DEFAULT_GENERATOR_TIMEOUT_SECS,
            )?),
            catalog_path: get("ZODIAC_CATALOG_PATH").map(PathBuf::from),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(ServerError::MissingCredential("GEMINI_API_KEY"));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(ServerError::Config("Model name cannot be empty".into()));
        }
        if self.http_port == 0 {
            return Err(ServerError::Config("Port cannot be 0".into()));
        }
        if self.tagger_timeout.is_zero() || self.generator_timeout.is_zero() {
            return Err(ServerError::Config("Timeouts must be at least 1 second".into()));
        }
        if self.allowed_origins.is_empty() {
            return Err(ServerError::Config("At least one allowed origin is required".into()));
        }
        self.origin_headers()?;
        Ok(())
    }

    /// Allowed origins as header values for the CORS layer.
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, ServerError> {
        // Credentialed CORS cannot answer with a wildcard origin
        if self.allowed_origins.iter().any(|origin| origin == "*") {
            return Err(ServerError::Config(
                "Wildcard origin is not allowed with credentials".into(),
            ));
        }
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ServerError::Config(format!("Invalid allowed origin: {origin}")))
            })
            .collect()
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.qloo_api_key.is_some()
    }
}

/// Credentials never reach logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &"***")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("qloo_api_key", &self.qloo_api_key.as_ref().map(|_| "***"))
            .field("qloo_base_url", &self.qloo_base_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("http_port", &self.http_port)
            .field("tagger_timeout", &self.tagger_timeout)
            .field("generator_timeout", &self.generator_timeout)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ServerError> {
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ServerError::Config(format!("Invalid value for {name}: {raw}"))),
        None => Ok(default),
    }
}
