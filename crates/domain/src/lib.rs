//! # Mailroute Domain
//!
//! Business domain types for the outbound email gateway reconciler.
//!
//! This crate contains:
//! - Gateway types (`GatewayConfig`, `SmtpMode`, `DomainName`,
//!   `GatewayProperty`)
//! - Credential bundle handed to the credential resolver
//! - Provider configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Mailroute crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
