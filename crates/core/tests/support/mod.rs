//! Shared test helpers for `mailroute-core` integration tests.
//!
//! These helpers provide an in-memory stand-in for the remote gateway API so
//! reconciler tests can focus on behaviour instead of wire details.

pub mod gateway;
