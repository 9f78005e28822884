//! Bearer-token lifecycle for the Speshits API

use chrono::{DateTime, Duration, Utc};
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// Seconds subtracted from the server-reported token lifetime.
/// Keeps a token from being used right at the boundary of expiry while a
/// request is in flight or clocks disagree.
const TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

/// Wire shape of the token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// The bearer credential currently held. Never mutated in place; a refresh
/// replaces it wholesale.
#[derive(Debug, Clone)]
struct Credential {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Exchanges username/password for a bearer token and tracks its expiry.
///
/// Refresh is lazy: the check happens at the start of every call that needs
/// a credential, with no background task. The credential sits behind a
/// mutex held across the exchange, so concurrent callers that both observe
/// an expired token wait on a single refresh instead of racing.
pub(crate) struct TokenManager {
    username: String,
    password: String,
    token_url: String,
    credential: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub(crate) fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token_url: format!("{base_url}/v1/token"),
            credential: Mutex::new(None),
        }
    }

    /// Return a valid access token, exchanging credentials first if none is
    /// held or the held one has expired.
    pub(crate) async fn bearer_token(&self, http: &HttpClient) -> Result<String> {
        let mut slot = self.credential.lock().await;
        if let Some(credential) = slot.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.access_token.clone());
            }
            debug!("held token expired at {}", credential.expires_at);
        }

        let credential = self.exchange(http).await?;
        let token = credential.access_token.clone();
        *slot = Some(credential);
        Ok(token)
    }

    /// Perform the password-grant exchange at the token endpoint.
    async fn exchange(&self, http: &HttpClient) -> Result<Credential> {
        debug!("exchanging credentials at {}", self.token_url);
        let response = http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::authentication(status, body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("failed to parse token response: {e}")))?;

        Ok(Credential {
            access_token: token.access_token,
            expires_at: expiry_from(Utc::now(), token.expires_in),
        })
    }
}

/// Compute the local expiry for a token issued now with the given lifetime.
fn expiry_from(issued_at: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    issued_at + Duration::seconds(expires_in - TOKEN_SAFETY_MARGIN_SECS)
}
