//! Domain types and models

pub mod credentials;
pub mod gateway;

pub use credentials::CredentialBundle;
pub use gateway::{DomainName, GatewayConfig, GatewayProperty, GatewayState, SmtpMode};
