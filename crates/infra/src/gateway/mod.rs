//! Admin Settings API adapter for the outbound email gateway

pub mod client;
pub mod codec;

pub use client::EmailGatewayClient;
