//! Error types used throughout the reconciler

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::GatewayConfig;

/// Main error type for Mailroute
///
/// Every failure is surfaced to the caller as-is. Nothing in the workspace
/// retries, so each variant carries enough context to diagnose the problem
/// without re-running the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MailrouteError {
    /// Credential material could not be resolved, parsed or exchanged for a
    /// token.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The remote response was not the envelope we expected.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The remote API answered with a status other than 200.
    #[error("Remote error: HTTP status {status}, body: {body}")]
    Remote { status: u16, body: String },

    /// Network-level failure (DNS, connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A verified create read back something other than what was written.
    #[error("Verification failed: expected {expected}, observed {observed}")]
    Verification { expected: Box<GatewayConfig>, observed: Box<GatewayConfig> },
}

impl MailrouteError {
    /// Build a [`MailrouteError::Remote`] from a raw status and body.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote { status, body: body.into() }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Credential(_) => "credential",
            Self::Protocol(_) => "protocol",
            Self::Remote { .. } => "remote",
            Self::Transport(_) => "transport",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Verification { .. } => "verification",
        }
    }

    /// HTTP status carried by a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Mailroute operations
pub type Result<T> = std::result::Result<T, MailrouteError>;
