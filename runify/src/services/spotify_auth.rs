//! OAuth 2.0 session acquisition
//!
//! Authorization-code flow against the Spotify accounts service. Tokens live
//! only for the duration of a run; nothing is written to disk.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use url::Url;

use crate::error::{Result, RunifyError};

pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Application credentials registered with the accounts service
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Tokens issued by the accounts service
#[derive(Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

impl From<TokenResponse> for OAuthTokens {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
            scope: response.scope,
        }
    }
}

/// Accounts service client
pub struct SpotifyAuth {
    client: Client,
    accounts_base_url: String,
    credentials: OAuthCredentials,
}

impl SpotifyAuth {
    pub fn new(
        credentials: OAuthCredentials,
        accounts_base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(runify_common::config::get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| RunifyError::Auth(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            accounts_base_url: accounts_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// URL the user visits to grant access
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.accounts_base_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&self.credentials.scopes.join(" ")),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];
        self.request_token(&params, "authorization code exchange").await
    }

    /// Obtain a fresh access token from a refresh token
    ///
    /// The accounts service may omit a new refresh token; the old one is kept.
    pub async fn refresh(&self, refresh_token: &str) -> Result<OAuthTokens> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];
        let mut tokens = self.request_token(&params, "token refresh").await?;
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }

    async fn request_token(&self, params: &[(&str, &str)], action: &str) -> Result<OAuthTokens> {
        let url = format!("{}/api/token", self.accounts_base_url);

        let response = self
            .client
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| RunifyError::Auth(format!("{} request failed: {}", action, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RunifyError::Auth(format!(
                "{} failed ({}): {}",
                action, status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| RunifyError::Auth(format!("{} response unreadable: {}", action, e)))?;

        Ok(token_response.into())
    }

    /// Interactive flow: print the authorize URL, read back the redirected URL
    async fn authorize_interactively(&self) -> Result<OAuthTokens> {
        let state = uuid::Uuid::new_v4().simple().to_string();

        eprintln!("Open this URL in a browser and grant access:\n\n    {}\n", self.authorize_url(&state));
        eprintln!("Then paste the URL you were redirected to:");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| RunifyError::Auth(format!("Failed to read redirect URL: {}", e)))?;

        let code = code_from_redirect(line.trim(), &state)?;
        self.exchange_code(&code).await
    }
}

/// Extract the authorization code from the URL the accounts service redirected to
pub fn code_from_redirect(redirected_url: &str, expected_state: &str) -> Result<String> {
    let url = Url::parse(redirected_url)
        .map_err(|e| RunifyError::Auth(format!("Redirect URL is not a valid URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(RunifyError::Auth(format!("Authorization denied: {}", value)));
            }
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(RunifyError::Auth(
            "Redirect state does not match the authorization request".to_string(),
        ));
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| RunifyError::Auth("Redirect URL carries no authorization code".to_string()))
}

/// Establish a session
///
/// **Priority:** configured access token → refresh token → interactive authorization
pub async fn obtain_tokens(
    auth: &SpotifyAuth,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> Result<OAuthTokens> {
    if let Some(token) = access_token {
        info!("Using access token from environment");
        return Ok(OAuthTokens {
            access_token: token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: None,
            scope: None,
        });
    }

    if let Some(token) = refresh_token {
        info!("Refreshing access token");
        return auth.refresh(token).await;
    }

    info!("No stored credentials, starting interactive authorization");
    auth.authorize_interactively().await
}
