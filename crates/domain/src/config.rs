//! Provider configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::{MailrouteError, Result};
use crate::types::credentials::default_scopes;
use crate::types::CredentialBundle;

/// User-facing provider settings.
///
/// Loaded from the environment or a JSON/TOML file by the infra config
/// loader, then turned into a [`CredentialBundle`] for credential
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Customer id of the Workspace subscription.
    pub customer_id: String,
    #[serde(default)]
    pub impersonated_user_email: Option<String>,
    /// Path to, or contents of, a credential JSON file.
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Read the gateway back after every create and fail on drift.
    #[serde(default)]
    pub verify_after_create: bool,
}

impl ProviderConfig {
    /// Configuration with defaults for everything except the customer id.
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            impersonated_user_email: None,
            credentials: None,
            access_token: None,
            scopes: default_scopes(),
            api_base_url: default_api_base_url(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            verify_after_create: false,
        }
    }

    /// Check the settings that can be checked without touching the network
    /// or the filesystem.
    ///
    /// # Errors
    /// Returns `MailrouteError::Config` for a blank customer id, a zero
    /// timeout, or a non-http(s) API base URL.
    pub fn validate(&self) -> Result<()> {
        if self.customer_id.trim().is_empty() {
            return Err(MailrouteError::Config("customer_id is required".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(MailrouteError::Config("timeout_seconds must be greater than zero".into()));
        }
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(MailrouteError::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Credential bundle handed to the resolver.
    pub fn to_bundle(&self) -> CredentialBundle {
        CredentialBundle {
            access_token: non_blank(self.access_token.as_deref()),
            credentials: non_blank(self.credentials.as_deref()),
            customer_id: self.customer_id.clone(),
            impersonated_subject: non_blank(self.impersonated_user_email.as_deref()),
            scopes: if self.scopes.is_empty() { default_scopes() } else { self.scopes.clone() },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
