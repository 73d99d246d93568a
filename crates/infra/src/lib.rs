//! # Mailroute Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - Credential resolution and OAuth2 token sources
//! - The authenticated HTTP transport
//! - The Atom XML codec and the Admin Settings API client
//! - Configuration loading and the provider session
//!
//! ## Architecture
//! - Implements traits defined in `mailroute-core`
//! - Depends on `mailroute-domain` and `mailroute-core`
//! - Contains all "impure" code (HTTP, filesystem, environment)

pub mod auth;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod session;

// Re-export commonly used items
pub use auth::{validate_credentials, CredentialResolver, Diagnostic, StaticTokenSource};
pub use errors::InfraError;
pub use gateway::codec::{decode, decode_config, encode};
pub use gateway::EmailGatewayClient;
pub use http::AuthenticatedTransport;
pub use logging::init_tracing;
pub use session::ProviderSession;
