//! # Mailroute Core
//!
//! Pure reconciliation logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for token sources and the gateway API
//! - The gateway reconciler service (create/read/delete over a singleton)
//!
//! ## Architecture Principles
//! - Only depends on `mailroute-domain`
//! - No HTTP, XML, or filesystem code
//! - All external dependencies via traits

pub mod auth_ports;
pub mod gateway;

// Re-export specific items to avoid ambiguity
pub use auth_ports::TokenSource;
pub use gateway::ports::EmailGatewayApi;
pub use gateway::{GatewayReconciler, ReconcilerOptions};
