//! Authorized user token source (OAuth2 refresh-token grant)

use std::fmt;

use async_trait::async_trait;
use mailroute_core::TokenSource;
use mailroute_domain::Result;
use reqwest::Client;

use super::credentials_file::AuthorizedUserSecret;
use super::token::{exchange, CachedToken, TokenCache};

/// Mints access tokens from a user's refresh token.
///
/// User credentials cannot impersonate anyone, and the scopes were fixed
/// when the refresh token was granted, so neither is sent.
pub struct AuthorizedUserTokenSource {
    client: Client,
    secret: AuthorizedUserSecret,
    cache: TokenCache,
}

impl AuthorizedUserTokenSource {
    /// Token source that refreshes with `secret` over `client`.
    #[must_use]
    pub fn new(client: Client, secret: AuthorizedUserSecret) -> Self {
        Self { client, secret, cache: TokenCache::default() }
    }

    async fn mint(&self) -> Result<CachedToken> {
        exchange(
            &self.client,
            &self.secret.token_uri,
            &[
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("refresh_token", self.secret.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ],
        )
        .await
    }
}

impl fmt::Debug for AuthorizedUserTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserTokenSource")
            .field("client_id", &self.secret.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for AuthorizedUserTokenSource {
    async fn token(&self) -> Result<String> {
        self.cache.get_or_mint(|| self.mint()).await
    }

    fn kind(&self) -> &'static str {
        "authorized_user"
    }
}
