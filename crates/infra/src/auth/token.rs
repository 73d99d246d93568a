//! Minted-token bookkeeping shared by the OAuth2 token sources

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use mailroute_domain::{MailrouteError, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

/// Refresh tokens this many seconds before they expire.
pub(crate) const EXPIRY_THRESHOLD_SECS: i64 = 300;

/// Token endpoint response body.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Clone)]
pub(crate) struct CachedToken {
    pub(crate) access_token: String,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// An `expires_in` that is not positive or overflows the clock leaves
    /// the token without an expiry.
    pub(crate) fn new(access_token: String, expires_in: Option<i64>) -> Self {
        let expires_at = expires_in
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        Self { access_token, expires_at }
    }

    /// A token without an expiry is treated as never expiring.
    pub(crate) fn is_expired(&self, threshold_seconds: i64) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        TimeDelta::try_seconds(threshold_seconds)
            .and_then(|threshold| Utc::now().checked_add_signed(threshold))
            .map_or(true, |deadline| deadline >= expires_at)
    }
}

/// In-memory slot for the most recently minted token.
#[derive(Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Return the cached token, minting a new one when the slot is empty or
    /// the token is about to expire.
    ///
    /// The lock is held while minting so concurrent callers share one
    /// exchange.
    pub(crate) async fn get_or_mint<F, Fut>(&self, mint: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedToken>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if !cached.is_expired(EXPIRY_THRESHOLD_SECS) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = mint().await?;
        let token = fresh.access_token.clone();
        *slot = Some(fresh);
        Ok(token)
    }
}

/// POST a form-encoded grant to `token_uri` and read the token out of the
/// JSON answer.
pub(crate) async fn exchange(
    client: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<CachedToken> {
    let grant_type = form.iter().find(|(k, _)| *k == "grant_type").map_or("", |(_, v)| *v);
    debug!(token_uri, grant_type, "exchanging credential for access token");

    let response = client.post(token_uri).form(form).send().await.map_err(|e| {
        MailrouteError::Credential(format!("token request to {token_uri} failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let message = match response.text().await {
            Ok(body) => format!("token endpoint returned HTTP {code}: {body}"),
            Err(e) => format!("token endpoint returned HTTP {code} (body unreadable: {e})"),
        };
        return Err(MailrouteError::Credential(message));
    }

    let parsed: TokenResponse = response.json().await.map_err(|e| {
        MailrouteError::Credential(format!("failed to parse token response: {e}"))
    })?;

    if let Some(token_type) = parsed.token_type.as_deref() {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(MailrouteError::Credential(format!(
                "unsupported token type {token_type:?}"
            )));
        }
    }

    Ok(CachedToken::new(parsed.access_token, parsed.expires_in))
}
