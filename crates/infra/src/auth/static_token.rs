//! Token source for a caller-supplied bearer token

use std::fmt;

use async_trait::async_trait;
use mailroute_core::TokenSource;
use mailroute_domain::{MailrouteError, Result};

/// Hands out the same pre-minted access token on every request.
///
/// The token is used as-is: scopes and impersonation do not apply and the
/// token is never refreshed.
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Wrap a pre-minted bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSource").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(MailrouteError::Credential("access token is empty".into()));
        }
        Ok(self.token.clone())
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}
