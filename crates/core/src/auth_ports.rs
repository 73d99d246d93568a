//! Authentication port interfaces

use async_trait::async_trait;
use mailroute_domain::Result;

/// Capability that yields a bearer token on demand.
///
/// Implementations may mint and cache tokens internally; callers must ask
/// for a token on every request rather than holding on to one.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Get a valid bearer token.
    async fn token(&self) -> Result<String>;

    /// Short, non-secret description of the credential kind for logs.
    fn kind(&self) -> &'static str;
}
