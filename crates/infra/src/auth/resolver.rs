//! Credential resolution chain

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mailroute_core::TokenSource;
use mailroute_domain::types::credentials::default_scopes;
use mailroute_domain::{CredentialBundle, MailrouteError, Result};
use reqwest::Client;
use tracing::{debug, info};

use super::authorized_user::AuthorizedUserTokenSource;
use super::credentials_file::{parse_credential_json, CredentialFile};
use super::service_account::ServiceAccountTokenSource;
use super::static_token::StaticTokenSource;

/// Environment variable naming an application default credentials file.
pub const APPLICATION_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable overriding the gcloud configuration directory.
pub const CLOUDSDK_CONFIG_ENV: &str = "CLOUDSDK_CONFIG";

const WELL_KNOWN_FILE: &str = "application_default_credentials.json";

/// Locations probed when the bundle carries neither a token nor credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientCredentials {
    /// File named by `GOOGLE_APPLICATION_CREDENTIALS`.
    pub application_credentials: Option<PathBuf>,
    /// gcloud's application default credentials file.
    pub well_known_file: Option<PathBuf>,
}

impl AmbientCredentials {
    /// Read the ambient locations from the process environment.
    pub fn from_env() -> Self {
        let application_credentials = std::env::var_os(APPLICATION_CREDENTIALS_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self { application_credentials, well_known_file: gcloud_well_known_file() }
    }

    /// No ambient credentials at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Text of the first ambient credential file found.
    fn discover(&self) -> Result<(String, PathBuf)> {
        if let Some(path) = &self.application_credentials {
            let text = std::fs::read_to_string(path).map_err(|err| {
                MailrouteError::Credential(format!(
                    "{APPLICATION_CREDENTIALS_ENV} names {} which cannot be read: {err}",
                    path.display()
                ))
            })?;
            return Ok((text, path.clone()));
        }

        if let Some(path) = self.well_known_file.as_ref().filter(|path| path.is_file()) {
            let text = std::fs::read_to_string(path).map_err(|err| {
                MailrouteError::Credential(format!(
                    "failed to read {}: {err}",
                    path.display()
                ))
            })?;
            return Ok((text, path.clone()));
        }

        Err(MailrouteError::Credential(format!(
            "no credentials configured: set an access token or credentials, or point \
             {APPLICATION_CREDENTIALS_ENV} at a credential file"
        )))
    }
}

/// Path of gcloud's application default credentials file.
///
/// Honors `CLOUDSDK_CONFIG`, otherwise `<config dir>/gcloud`.
pub fn gcloud_well_known_file() -> Option<PathBuf> {
    let config_dir = std::env::var_os(CLOUDSDK_CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("gcloud")))?;

    Some(config_dir.join(WELL_KNOWN_FILE))
}

/// Expand a leading `~` to the caller's home directory.
pub fn expand_home(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).into_owned())
}

/// Resolve a `credentials` value to credential JSON text.
///
/// A value that parses as JSON is returned as-is. Anything else is taken as
/// a path (with `~` expanded) and the file is read.
///
/// # Errors
/// Returns `MailrouteError::Credential` when the value is neither JSON nor
/// a readable file. The value itself is never included in the message.
pub fn load_credential_text(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    let path = expand_home(trimmed);
    read_credential_file(&path)
}

fn read_credential_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound | ErrorKind::InvalidInput => MailrouteError::Credential(
            "credentials are not valid JSON and do not name an existing file".into(),
        ),
        _ => MailrouteError::Credential(format!(
            "failed to read credential file {}: {err}",
            path.display()
        )),
    })
}

/// Turns a [`CredentialBundle`] into a [`TokenSource`].
///
/// Precedence, first match wins:
/// 1. `access_token` → [`StaticTokenSource`]; nothing else is looked at.
/// 2. `credentials` → inline JSON or a path to it.
/// 3. ambient credentials ([`AmbientCredentials`]).
///
/// Resolution only reads files. Tokens are minted lazily on first use by
/// the returned source, over `client`.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    client: Client,
    ambient: AmbientCredentials,
}

impl CredentialResolver {
    /// Resolver using the process environment for ambient discovery.
    pub fn new(client: Client) -> Self {
        Self { client, ambient: AmbientCredentials::from_env() }
    }

    #[must_use]
    pub fn with_ambient(mut self, ambient: AmbientCredentials) -> Self {
        self.ambient = ambient;
        self
    }

    /// Resolve `bundle` into a token source.
    ///
    /// # Errors
    /// Returns `MailrouteError::Credential` when no usable credential can be
    /// found or the credential material is invalid.
    pub fn resolve(&self, bundle: &CredentialBundle) -> Result<Arc<dyn TokenSource>> {
        if let Some(token) = bundle.access_token.as_deref() {
            info!(source = "access_token", kind = "static", "resolved credentials");
            return Ok(Arc::new(StaticTokenSource::new(token)));
        }

        if let Some(credentials) = bundle.credentials.as_deref() {
            let text = load_credential_text(credentials)?;
            return self.source_from_json(&text, bundle, "credentials");
        }

        let (text, path) = self.ambient.discover()?;
        debug!(path = %path.display(), "using ambient credentials");
        self.source_from_json(&text, bundle, "ambient")
    }

    fn source_from_json(
        &self,
        text: &str,
        bundle: &CredentialBundle,
        origin: &'static str,
    ) -> Result<Arc<dyn TokenSource>> {
        let source: Arc<dyn TokenSource> = match parse_credential_json(text)? {
            CredentialFile::ServiceAccount(key) => {
                let scopes =
                    if bundle.scopes.is_empty() { default_scopes() } else { bundle.scopes.clone() };
                Arc::new(ServiceAccountTokenSource::new(
                    self.client.clone(),
                    key,
                    scopes,
                    bundle.impersonated_subject.clone(),
                )?)
            }
            CredentialFile::AuthorizedUser(secret) => {
                if bundle.impersonated_subject.is_some() {
                    debug!("impersonation does not apply to authorized user credentials; ignoring");
                }
                Arc::new(AuthorizedUserTokenSource::new(self.client.clone(), secret))
            }
        };

        info!(source = origin, kind = source.kind(), "resolved credentials");
        Ok(source)
    }
}
