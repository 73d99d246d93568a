//! Conversions from external infrastructure errors into domain errors.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mailroute_domain::MailrouteError;
use quick_xml::events::attributes::AttrError;
use quick_xml::Error as XmlError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(#[from] pub MailrouteError);

impl From<InfraError> for MailrouteError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMailrouteError {
    fn into_mailroute(self) -> MailrouteError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MailrouteError */
/* -------------------------------------------------------------------------- */

impl IntoMailrouteError for HttpError {
    fn into_mailroute(self) -> MailrouteError {
        if self.is_timeout() {
            return MailrouteError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return MailrouteError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return MailrouteError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            return MailrouteError::remote(status.as_u16(), self.to_string());
        }

        MailrouteError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_mailroute())
    }
}

/* -------------------------------------------------------------------------- */
/* quick_xml errors → MailrouteError */
/* -------------------------------------------------------------------------- */

impl IntoMailrouteError for XmlError {
    fn into_mailroute(self) -> MailrouteError {
        MailrouteError::Protocol(format!("malformed gateway XML: {self}"))
    }
}

impl From<XmlError> for InfraError {
    fn from(value: XmlError) -> Self {
        InfraError(value.into_mailroute())
    }
}

impl From<AttrError> for InfraError {
    fn from(value: AttrError) -> Self {
        InfraError(MailrouteError::Protocol(format!("malformed gateway XML attribute: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → MailrouteError */
/* -------------------------------------------------------------------------- */

impl IntoMailrouteError for JsonError {
    fn into_mailroute(self) -> MailrouteError {
        MailrouteError::Credential(format!("invalid credential JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_mailroute())
    }
}

/* -------------------------------------------------------------------------- */
/* jsonwebtoken::errors::Error → MailrouteError */
/* -------------------------------------------------------------------------- */

impl IntoMailrouteError for JwtError {
    fn into_mailroute(self) -> MailrouteError {
        match self.kind() {
            JwtErrorKind::InvalidKeyFormat => {
                MailrouteError::Credential("service account private key is not a valid RSA PEM key".into())
            }
            _ => MailrouteError::Credential(format!("failed to sign token assertion: {self}")),
        }
    }
}

impl From<JwtError> for InfraError {
    fn from(value: JwtError) -> Self {
        InfraError(value.into_mailroute())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → MailrouteError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(MailrouteError::Credential(format!("failed to read credential file: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
