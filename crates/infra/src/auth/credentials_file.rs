//! Credential JSON formats understood by the resolver

use std::fmt;

use mailroute_domain::{MailrouteError, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::InfraError;

/// Token endpoint used when the credential JSON does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A parsed credential file, discriminated by its `type` field.
#[derive(Clone, Debug)]
pub enum CredentialFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUserSecret),
}

impl CredentialFile {
    /// Value of the `type` field this variant was parsed from.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => "service_account",
            Self::AuthorizedUser(_) => "authorized_user",
        }
    }
}

/// `"type": "service_account"` key file.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// `"type": "authorized_user"` secret, as written by `gcloud auth
/// application-default login`.
#[derive(Clone, Deserialize)]
pub struct AuthorizedUserSecret {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for AuthorizedUserSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Parse credential JSON text.
///
/// # Errors
/// Returns `MailrouteError::Credential` when the text is not JSON, has no
/// `type`, names an unsupported type, or lacks required fields.
pub fn parse_credential_json(text: &str) -> Result<CredentialFile> {
    let value: Value = serde_json::from_str(text).map_err(InfraError::from)?;

    let kind = value.get("type").and_then(Value::as_str).ok_or_else(|| {
        MailrouteError::Credential("credential JSON has no \"type\" field".into())
    })?;

    match kind {
        "service_account" => serde_json::from_value(value)
            .map(CredentialFile::ServiceAccount)
            .map_err(|e| MailrouteError::Credential(format!("invalid service account key: {e}"))),
        "authorized_user" => serde_json::from_value(value)
            .map(CredentialFile::AuthorizedUser)
            .map_err(|e| MailrouteError::Credential(format!("invalid authorized user secret: {e}"))),
        other => Err(MailrouteError::Credential(format!("unsupported credential type {other:?}"))),
    }
}
