//! Pre-flight validation of the `credentials` setting
//!
//! Runs without resolving anything: no token is minted and no network call
//! is made. Problems are reported as field-level diagnostics rather than
//! errors so callers can show all of them at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::credentials_file::parse_credential_json;
use super::resolver::expand_home;

/// Attribute the credential diagnostics are attached to.
pub const CREDENTIALS_ATTRIBUTE: &str = "credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single field-level finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    /// Configuration attribute the finding is about.
    pub attribute_path: String,
}

impl Diagnostic {
    /// Error-severity finding for `attribute_path`.
    #[must_use]
    pub fn error(attribute_path: impl Into<String>, summary: impl Into<String>) -> Self {
        Self { severity: Severity::Error, summary: summary.into(), attribute_path: attribute_path.into() }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attribute_path, self.summary)
    }
}

/// Check a `credentials` value.
///
/// An empty value, or a path (with `~` expanded) to an existing file, is
/// accepted as-is. Anything else must parse as credential JSON.
pub fn validate_credentials(value: &str) -> Vec<Diagnostic> {
    let trimmed = value.trim();
    if trimmed.is_empty() || expand_home(trimmed).exists() {
        return Vec::new();
    }

    match parse_credential_json(trimmed) {
        Ok(_) => Vec::new(),
        Err(err) => vec![Diagnostic::error(
            CREDENTIALS_ATTRIBUTE,
            format!("JSON credentials are not valid: {err}"),
        )],
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_value_has_no_diagnostics() {
        assert!(validate_credentials("").is_empty());
        assert!(validate_credentials("   ").is_empty());
    }

    #[test]
    fn existing_path_has_no_diagnostics() {
        let file = NamedTempFile::new().unwrap();
        assert!(validate_credentials(&file.path().to_string_lossy()).is_empty());
    }

    #[test]
    fn valid_json_has_no_diagnostics() {
        let json = r#"{"type":"authorized_user","client_id":"a","client_secret":"b","refresh_token":"c"}"#;
        assert!(validate_credentials(json).is_empty());
    }

    #[test]
    fn invalid_json_yields_one_error_on_credentials() {
        let diagnostics = validate_credentials(r#"{"type":"service_account","client_email":"x@y"}"#);

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.attribute_path, CREDENTIALS_ATTRIBUTE);
        assert!(diagnostic.summary.starts_with("JSON credentials are not valid"));
    }

    #[test]
    fn diagnostic_never_echoes_the_value() {
        let diagnostics = validate_credentials("{\"private_key\": \"hunter2\"");
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].summary.contains("hunter2"));
    }
}
