//! Gateway API port interfaces

use async_trait::async_trait;
use mailroute_domain::{DomainName, GatewayConfig, GatewayProperty, Result};

/// Transport-level access to the per-domain gateway endpoint.
///
/// Implementations own the wire format. Both methods address the same
/// endpoint, parameterised only by the domain.
#[async_trait]
pub trait EmailGatewayApi: Send + Sync {
    /// Replace the gateway of `config.domain_name` with `config`.
    ///
    /// Succeeds only on HTTP 200; anything else is
    /// `MailrouteError::Remote` carrying the status and raw body.
    async fn put_gateway(&self, config: &GatewayConfig) -> Result<()>;

    /// Fetch the raw properties of the gateway of `domain`, in whatever
    /// order the server sent them.
    async fn get_gateway(&self, domain: &DomainName) -> Result<Vec<GatewayProperty>>;
}
