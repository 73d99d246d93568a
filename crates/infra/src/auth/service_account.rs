//! Service account token source (OAuth2 JWT-bearer grant)

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use mailroute_core::TokenSource;
use mailroute_domain::Result;
use reqwest::Client;
use serde::Serialize;

use super::credentials_file::ServiceAccountKey;
use super::token::{exchange, CachedToken, TokenCache};
use crate::errors::InfraError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion. The token endpoint caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Mints access tokens for a service account, optionally acting on behalf
/// of a Workspace user (domain-wide delegation).
pub struct ServiceAccountTokenSource {
    client: Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scopes: Vec<String>,
    subject: Option<String>,
    cache: TokenCache,
}

impl ServiceAccountTokenSource {
    /// Prepare a token source for `key`.
    ///
    /// The private key is parsed up front; no network call is made until
    /// the first token is requested.
    ///
    /// # Errors
    /// Returns `MailrouteError::Credential` when the private key is not an
    /// RSA PEM key.
    pub fn new(
        client: Client,
        key: ServiceAccountKey,
        scopes: Vec<String>,
        subject: Option<String>,
    ) -> Result<Self> {
        let signing_key =
            EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(InfraError::from)?;

        Ok(Self { client, key, signing_key, scopes, subject, cache: TokenCache::default() })
    }

    /// Service account the assertion is issued for.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// User being impersonated, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Build the signed assertion exchanged at the token endpoint.
    fn assertion(&self, issued_at: DateTime<Utc>) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            sub: self.subject.as_deref(),
            scope: self.scopes.join(" "),
            aud: &self.key.token_uri,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .map_err(|err| InfraError::from(err).into())
    }

    async fn mint(&self) -> Result<CachedToken> {
        let assertion = self.assertion(Utc::now())?;
        exchange(
            &self.client,
            &self.key.token_uri,
            &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
        )
        .await
    }
}

impl fmt::Debug for ServiceAccountTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokenSource")
            .field("client_email", &self.key.client_email)
            .field("subject", &self.subject)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn token(&self) -> Result<String> {
        self.cache.get_or_mint(|| self.mint()).await
    }

    fn kind(&self) -> &'static str {
        "service_account"
    }
}
