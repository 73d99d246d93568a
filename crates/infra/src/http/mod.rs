//! HTTP transport shared by the token sources and the gateway client

pub mod client;

pub use client::{default_user_agent, AuthenticatedTransport, AuthenticatedTransportBuilder};
