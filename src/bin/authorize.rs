//! Run Google's consent flow once and print a token blob for the secret store.

use chrono::{Duration, Utc};
use schedule_assistant::components::google_calendar::{OAuthClientConfig, OAuthToken, CALENDAR_SCOPE};
use schedule_assistant::components::google_calendar::token::{OAuthClientSecret, DEFAULT_TOKEN_URI};
use schedule_assistant::error::{config_error, env_error, other_error, AppResult};
use serde::Deserialize;
use std::env;
use url::Url;

const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_REDIRECT_PORT: u16 = 8080;

#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

/// Check the callback's state and pull out the authorization code
fn authorization_code(callback: &Url, expected_state: &str) -> AppResult<String> {
    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(expected_state) {
        return Err(other_error("State mismatch in authorization callback"));
    }
    param("code").ok_or_else(|| {
        let reason = param("error").unwrap_or_else(|| "no authorization code".to_string());
        other_error(&format!("Authorization failed: {}", reason))
    })
}

/// Trade the authorization code for an authorized-user token record
async fn exchange_code(
    secret: &OAuthClientSecret,
    code: &str,
    redirect_uri: &str,
) -> AppResult<OAuthToken> {
    let token_uri = secret
        .token_uri
        .clone()
        .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

    let response = reqwest::Client::new()
        .post(&token_uri)
        .form(&[
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| other_error(&format!("Failed to exchange code: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let exchanged: CodeExchangeResponse = response
        .json()
        .await
        .map_err(|e| other_error(&format!("Failed to parse token response: {}", e)))?;

    Ok(OAuthToken {
        token: Some(exchanged.access_token),
        refresh_token: exchanged.refresh_token,
        token_uri: Some(token_uri),
        client_id: Some(secret.client_id.clone()),
        client_secret: Some(secret.client_secret.clone()),
        scopes: exchanged
            .scope
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| vec![CALENDAR_SCOPE.to_string()]),
        expiry: Some(Utc::now() + Duration::seconds(exchanged.expires_in.unwrap_or(3600))),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    run().await?;
    Ok(())
}

async fn run() -> AppResult<()> {
    dotenvy::dotenv().ok();

    let client_json = env::var("GOOGLE_CLIENT_JSON").map_err(|_| env_error("GOOGLE_CLIENT_JSON"))?;
    let client_config = OAuthClientConfig::from_json(&client_json)?;
    let secret = client_config
        .secret()
        .ok_or_else(|| config_error("GOOGLE_CLIENT_JSON has no installed or web client"))?;

    let port = env::var("REDIRECT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_REDIRECT_PORT);
    let redirect_uri = format!("http://localhost:{}", port);

    // Random state guards against forged callbacks
    let state = uuid::Uuid::new_v4().to_string();

    let auth_url = Url::parse_with_params(
        secret.auth_uri.as_deref().unwrap_or(AUTH_URI),
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", CALENDAR_SCOPE),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))?;

    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(("127.0.0.1", port))
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback on {}...", redirect_uri);

    let request = server.recv()?;
    let outcome = match Url::parse(&format!("{}{}", redirect_uri, request.url())) {
        Ok(callback) => match authorization_code(&callback, &state) {
            Ok(code) => exchange_code(secret, &code, &redirect_uri).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(other_error(&format!("Invalid callback URL: {}", e))),
    };

    // Answer the browser either way before reporting
    let response = match &outcome {
        Ok(_) => tiny_http::Response::from_string(
            "Authorization successful! You can close this window.",
        ),
        Err(e) => tiny_http::Response::from_string(format!(
            "Authorization failed: {}. You can close this window.",
            e
        ))
        .with_status_code(tiny_http::StatusCode(400)),
    };
    request.respond(response)?;
    let token = outcome?;

    let token_json = serde_json::to_string(&token)?;
    println!("\nStore this value as GOOGLE_TOKEN_JSON in the secret store:\n");
    println!("{}", token_json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback(query: &str) -> Url {
        Url::parse(&format!("http://localhost:8080/?{}", query)).unwrap()
    }

    #[test]
    fn test_code_is_returned_for_matching_state() {
        let code = authorization_code(&callback("state=abc&code=4%2F0Ab"), "abc").unwrap();
        assert_eq!(code, "4/0Ab");
    }

    #[test]
    fn test_state_mismatch_is_rejected() {
        assert!(authorization_code(&callback("state=forged&code=x"), "abc").is_err());
        assert!(authorization_code(&callback("code=x"), "abc").is_err());
    }

    #[test]
    fn test_denied_consent_reports_reason() {
        let err = authorization_code(&callback("state=abc&error=access_denied"), "abc").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }
}
