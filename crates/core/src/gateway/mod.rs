//! Outbound email gateway reconciliation

pub mod ports;
pub mod service;

pub use service::{GatewayReconciler, ReconcilerOptions};
