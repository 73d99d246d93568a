//! Outbound email gateway types
//!
//! The gateway is a per-domain singleton. It has no identity of its own on
//! the remote side; the domain name is the identity, and "deleting" the
//! gateway means resetting both of its fields to empty strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{SMART_HOST_PROPERTY, SMTP_MODE_PROPERTY};
use crate::errors::{MailrouteError, Result};
use crate::impl_wire_enum_conversions;

/// Validated Workspace domain name.
///
/// The value is interpolated into the endpoint path, so anything that would
/// change the shape of the URL is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Validate and wrap a domain name.
    ///
    /// # Errors
    /// Returns `MailrouteError::InvalidInput` when the value is blank or
    /// contains whitespace, `/`, `?` or `#`.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(MailrouteError::InvalidInput("domain name must not be empty".into()));
        }
        if let Some(bad) = value.chars().find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(MailrouteError::InvalidInput(format!(
                "domain name {value:?} contains invalid character {bad:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Borrow the domain name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = MailrouteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DomainName {
    type Error = MailrouteError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Delivery mode used when relaying to the smart host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SmtpMode {
    /// Plain SMTP (the server default).
    Smtp,
    /// SMTP secured with TLS.
    SmtpTls,
}

impl_wire_enum_conversions!(SmtpMode {
    Smtp => "SMTP",
    SmtpTls => "SMTP_TLS",
});

impl SmtpMode {
    /// Parse a wire value where the empty string means "unset".
    ///
    /// # Errors
    /// Returns `MailrouteError::Protocol` for unrecognised values.
    pub fn from_wire(value: &str) -> Result<Option<Self>> {
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some).map_err(MailrouteError::Protocol)
    }
}

/// Wire-level `name`/`value` pair carried by the XML envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayProperty {
    /// Property name, e.g. `smartHost`.
    pub name: String,
    /// Raw value; empty means unset.
    pub value: String,
}

impl GatewayProperty {
    /// Build a property from a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Lifecycle classification of the remote singleton as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayState {
    /// No local record of the gateway.
    Unknown,
    /// Created or read with at least one non-empty field.
    Present,
    /// Reset to the empty state by a tombstone delete.
    Cleared,
}

impl GatewayState {
    /// Classify an optional observed configuration.
    #[must_use]
    pub fn of(observed: Option<&GatewayConfig>) -> Self {
        match observed {
            None => Self::Unknown,
            Some(config) if config.is_cleared() => Self::Cleared,
            Some(_) => Self::Present,
        }
    }
}

/// Desired or observed gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Resource identity. Never changes once the resource is created.
    pub domain_name: DomainName,
    /// IP address or hostname mail is routed to. Empty when cleared.
    pub smart_host: String,
    /// `None` when the remote value is empty.
    pub smtp_mode: Option<SmtpMode>,
}

impl GatewayConfig {
    /// Configuration for `domain_name` routing mail to `smart_host`.
    #[must_use]
    pub fn new(
        domain_name: DomainName,
        smart_host: impl Into<String>,
        smtp_mode: Option<SmtpMode>,
    ) -> Self {
        Self { domain_name, smart_host: smart_host.into(), smtp_mode }
    }

    /// Configuration with both fields blanked, used to model deletion.
    #[must_use]
    pub fn tombstone(domain_name: DomainName) -> Self {
        Self { domain_name, smart_host: String::new(), smtp_mode: None }
    }

    /// True when both fields are empty.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.smart_host.is_empty() && self.smtp_mode.is_none()
    }

    /// Lifecycle state of this configuration.
    #[must_use]
    pub fn state(&self) -> GatewayState {
        GatewayState::of(Some(self))
    }

    /// Request properties, always `smartHost` first and `smtpMode` second.
    #[must_use]
    pub fn to_properties(&self) -> [GatewayProperty; 2] {
        [
            GatewayProperty::new(SMART_HOST_PROPERTY, self.smart_host.clone()),
            GatewayProperty::new(
                SMTP_MODE_PROPERTY,
                self.smtp_mode.map(|mode| mode.as_str()).unwrap_or_default(),
            ),
        ]
    }

    /// Rebuild a configuration from response properties.
    ///
    /// Properties are matched by `name`; their order is irrelevant. A
    /// missing property is treated as an empty value.
    ///
    /// # Errors
    /// Returns `MailrouteError::Protocol` when `smtpMode` carries an
    /// unrecognised value.
    pub fn from_properties(domain_name: DomainName, properties: &[GatewayProperty]) -> Result<Self> {
        let lookup = |name: &str| {
            properties
                .iter()
                .find(|property| property.name == name)
                .map(|property| property.value.as_str())
                .unwrap_or_default()
        };

        let smart_host = lookup(SMART_HOST_PROPERTY).to_string();
        let smtp_mode = SmtpMode::from_wire(lookup(SMTP_MODE_PROPERTY))?;

        Ok(Self { domain_name, smart_host, smtp_mode })
    }
}

impl fmt::Display for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (smartHost={:?}, smtpMode={:?})",
            self.domain_name,
            self.smart_host,
            self.smtp_mode.map(|mode| mode.as_str()).unwrap_or_default()
        )
    }
}
