//! Credential bundle consumed by the credential resolver

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CLIENT_SCOPES;

/// Everything the credential resolver needs to produce a token source.
///
/// Precedence is decided by the resolver, not here: an explicit
/// `access_token` wins over `credentials`, which wins over ambient
/// credentials discovered from the environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Ready-to-use bearer token.
    pub access_token: Option<String>,
    /// Service account or authorized-user JSON, inline or as a file path.
    pub credentials: Option<String>,
    pub customer_id: String,
    /// User the service account acts on behalf of (domain-wide delegation).
    pub impersonated_subject: Option<String>,
    pub scopes: Vec<String>,
}

impl CredentialBundle {
    /// Bundle with no credential material and the default scopes.
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            access_token: None,
            credentials: None,
            customer_id: customer_id.into(),
            impersonated_subject: None,
            scopes: default_scopes(),
        }
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    #[must_use]
    pub fn with_impersonated_subject(mut self, subject: impl Into<String>) -> Self {
        self.impersonated_subject = Some(subject.into());
        self
    }

    /// Replace the requested scopes. An empty list restores the defaults.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = if scopes.is_empty() { default_scopes() } else { scopes };
        self
    }
}

// Token and key material never reach logs through Debug.
impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("customer_id", &self.customer_id)
            .field("impersonated_subject", &self.impersonated_subject)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Owned copy of [`DEFAULT_CLIENT_SCOPES`].
pub fn default_scopes() -> Vec<String> {
    DEFAULT_CLIENT_SCOPES.iter().map(|scope| (*scope).to_string()).collect()
}
