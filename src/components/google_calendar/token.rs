use crate::error::{AppResult, Error};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Read/write access to the user's calendars
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Google's OAuth token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to their expiry are treated as expired
const EXPIRY_SKEW_SECONDS: i64 = 10;

/// Stored OAuth token record, in Google's authorized-user JSON layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OAuthToken {
    /// Current access token
    #[serde(default, alias = "access_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Long-lived refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Granted scopes
    #[serde(default, alias = "scope", deserialize_with = "deserialize_scopes")]
    pub scopes: Vec<String>,
    /// When the access token expires (UTC)
    #[serde(default, deserialize_with = "deserialize_expiry", skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Parse a token blob from the secret store
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Malformed OAuth token JSON: {}", e)))
    }

    /// Whether the expiry has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| now + Duration::seconds(EXPIRY_SKEW_SECONDS) >= expiry)
    }

    /// Whether the access token can be used as-is
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        let has_token = self.token.as_deref().is_some_and(|t| !t.is_empty());
        has_token && !self.is_expired(now)
    }

    fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeList {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_scopes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ScopeList>::deserialize(deserializer)? {
        Some(ScopeList::List(scopes)) => scopes,
        Some(ScopeList::Joined(joined)) => joined.split_whitespace().map(str::to_string).collect(),
        None => Vec::new(),
    })
}

fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_expiry(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Parse an expiry timestamp: RFC 3339, or naive ISO-8601 taken as UTC
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid expiry '{}': {}", raw, e))
}

/// One client entry of Google's OAuth client JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// OAuth client configuration (`installed` or `web` application)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OAuthClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<OAuthClientSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<OAuthClientSecret>,
}

impl OAuthClientConfig {
    /// Parse a client-config blob from the secret store
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Malformed OAuth client JSON: {}", e)))
    }

    /// The configured client, preferring the installed-app entry
    pub fn secret(&self) -> Option<&OAuthClientSecret> {
        self.installed.as_ref().or(self.web.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
    scope: Option<String>,
}

/// Holds the in-memory token record and refreshes it when it expires
#[derive(Clone)]
pub struct TokenManager {
    token: Arc<RwLock<OAuthToken>>,
    client_config: Arc<OAuthClientConfig>,
    client: Client,
}

impl TokenManager {
    pub fn new(token: OAuthToken, client_config: OAuthClientConfig) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
            client_config: Arc::new(client_config),
            client: Client::new(),
        }
    }

    /// Snapshot of the current token record
    pub async fn current(&self) -> OAuthToken {
        self.token.read().await.clone()
    }

    /// Get a usable access token, refreshing it if it has expired
    pub async fn access_token(&self) -> AppResult<String> {
        let token = self.current().await;
        let now = Utc::now();

        if !token.scopes.is_empty() && !token.has_scope(CALENDAR_SCOPE) {
            warn!("Stored token does not list the calendar scope; inserts may be rejected");
        }

        if token.is_valid(now) {
            debug!("Using stored access token");
            return Ok(token.token.unwrap_or_default());
        }

        if token.is_expired(now) && token.refresh_token().is_some() {
            info!("Access token expired, refreshing");
            let refreshed = self.refresh(&token).await?;
            let access_token = refreshed.token.clone().unwrap_or_default();
            *self.token.write().await = refreshed;
            return Ok(access_token);
        }

        Err(Error::CredentialMissing(
            "no valid access token and no way to refresh it".to_string(),
        ))
    }

    /// Refresh an expired token
    async fn refresh(&self, token: &OAuthToken) -> AppResult<OAuthToken> {
        let refresh_token = token
            .refresh_token()
            .ok_or_else(|| Error::CredentialRefresh("No refresh token in token data".to_string()))?;

        let secret = self.client_config.secret();
        let client_id = token
            .client_id
            .clone()
            .or_else(|| secret.map(|s| s.client_id.clone()))
            .ok_or_else(|| Error::CredentialRefresh("No client id available".to_string()))?;
        let client_secret = token
            .client_secret
            .clone()
            .or_else(|| secret.map(|s| s.client_secret.clone()))
            .ok_or_else(|| Error::CredentialRefresh("No client secret available".to_string()))?;
        let token_uri = token
            .token_uri
            .clone()
            .or_else(|| secret.and_then(|s| s.token_uri.clone()))
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        let params = [
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("scope", CALENDAR_SCOPE),
        ];

        let response = self
            .client
            .post(&token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::CredentialRefresh(format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(Error::CredentialRefresh(format!(
                "HTTP {} - {}",
                status, error_body
            )));
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            Error::CredentialRefresh(format!("Failed to parse token response: {}", e))
        })?;

        let expires_in = refreshed.expires_in.unwrap_or(3600);
        let mut updated = token.clone();
        updated.token = Some(refreshed.access_token);
        updated.expiry = Some(Utc::now() + Duration::seconds(expires_in));
        if let Some(scope) = refreshed.scope {
            updated.scopes = scope.split_whitespace().map(str::to_string).collect();
        }

        info!("Access token refreshed, valid for {} seconds", expires_in);
        Ok(updated)
    }
}
