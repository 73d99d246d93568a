//! Domain constants
//!
//! Wire identifiers and defaults shared by every layer.

/// Base of the Admin Settings API domain feed.
pub const DEFAULT_API_BASE_URL: &str = "https://apps-apis.google.com/a/feeds/domain/2.0";

/// Path suffix appended to `<base>/<domain>`.
pub const EMAIL_GATEWAY_PATH: &str = "email/gateway";

// Envelope namespaces
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
pub const APPS_NAMESPACE: &str = "http://schemas.google.com/apps/2006";

// Gateway property names
pub const SMART_HOST_PROPERTY: &str = "smartHost";
pub const SMTP_MODE_PROPERTY: &str = "smtpMode";

/// Scopes requested when the configuration does not name any.
pub const DEFAULT_CLIENT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://apps-apis.google.com/a/feeds/domain/",
];

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix of the user agent sent with every request.
pub const USER_AGENT_PREFIX: &str = "mailroute";
