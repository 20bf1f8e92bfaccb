use crate::components::analyzer::prompt::DEFAULT_MAX_CONTENT_CHARS;
use crate::components::google_calendar::{OAuthClientConfig, OAuthToken};
use crate::error::{config_error, env_error, AppResult, Error};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Gemini model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
/// Time zone attached to created events
pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";
/// Calendar alias events are inserted into
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
/// Secrets file read when `SECRETS_FILE` is not set
pub const DEFAULT_SECRETS_FILE: &str = "config/secrets.toml";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
/// 10MB upload limit
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Credentials loaded from the secret store
#[derive(Clone)]
pub struct Secrets {
    /// Gemini API key
    pub gemini_api_key: String,
    /// Stored OAuth token record
    pub google_token: OAuthToken,
    /// OAuth client configuration, needed for refresh and re-authorization
    pub google_client: OAuthClientConfig,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &"<redacted>")
            .field("google_token", &"<redacted>")
            .field("google_client", &"<redacted>")
            .finish()
    }
}

/// Main configuration structure for the assistant
#[derive(Debug, Clone)]
pub struct Config {
    pub secrets: Secrets,
    /// Gemini model name
    pub gemini_model: String,
    /// Time zone for the prompt clock and created events
    pub timezone: Tz,
    /// Calendar ID to insert events into
    pub calendar_id: String,
    pub calendar_api_base: String,
    /// Characters of submitted text sent to the model
    pub max_content_chars: usize,
    /// UI locale
    pub locale: String,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the environment and the secrets file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let secrets_path =
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        let file = read_secrets_file(Path::new(&secrets_path))?;

        // Environment wins over the file
        Self::from_lookup(|key| {
            env::var(key)
                .ok()
                .or_else(|| file.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
    }

    /// Build configuration from a key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| env_error(key))
        };

        let secrets = Secrets {
            gemini_api_key: required("GEMINI_API_KEY")?,
            google_token: OAuthToken::from_json(&required("GOOGLE_TOKEN_JSON")?)?,
            google_client: OAuthClientConfig::from_json(&required("GOOGLE_CLIENT_JSON")?)?,
        };

        let timezone_name = lookup("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown time zone: {}", timezone_name)))?;

        let config = Config {
            secrets,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timezone,
            calendar_id: lookup("GOOGLE_CALENDAR_ID")
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            calendar_api_base: lookup("GOOGLE_CALENDAR_API_BASE")
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_BASE.to_string()),
            max_content_chars: parse_or(&lookup, "MAX_CONTENT_CHARS", DEFAULT_MAX_CONTENT_CHARS)?,
            locale: lookup("UI_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };

        if config.max_content_chars == 0 {
            return Err(config_error("MAX_CONTENT_CHARS must be greater than zero"));
        }

        info!(
            "Configuration loaded: model={}, timezone={}, calendar={}",
            config.gemini_model, config.timezone, config.calendar_id
        );
        Ok(config)
    }
}

/// Read the TOML secrets file; a missing file is an empty store
fn read_secrets_file(path: &Path) -> AppResult<toml::Table> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!("Reading secrets from {}", path.display());
            content.parse::<toml::Table>().map_err(|e| {
                Error::Config(format!("Malformed secrets file {}: {}", path.display(), e))
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(toml::Table::new()),
        Err(e) => Err(e.into()),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Environment(format!("Invalid {} format: {}", key, raw))),
        None => Ok(default),
    }
}
