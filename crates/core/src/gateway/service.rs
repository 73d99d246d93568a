//! Gateway reconciler - maps create/read/delete onto a singleton API
//!
//! The remote API has neither an update nor a delete verb. Everything is
//! expressed through two calls on one endpoint:
//!
//! | Operation | Remote call                         |
//! |-----------|-------------------------------------|
//! | create    | PUT desired values                  |
//! | read      | GET, match properties by name       |
//! | delete    | PUT with both values blanked        |
//!
//! Updating is re-running `create`. Reading after a delete succeeds and
//! returns empty fields; there is no "not found" for a gateway.

use std::sync::Arc;

use mailroute_domain::{DomainName, GatewayConfig, MailrouteError, Result};
use tracing::{debug, info, instrument, warn};

use super::ports::EmailGatewayApi;

/// Knobs for [`GatewayReconciler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerOptions {
    /// Read the gateway back after a create and fail if it differs from
    /// what was written.
    pub verify_after_create: bool,
}

/// Reconciler for the outbound email gateway singleton.
///
/// Holds no per-resource state. The domain passed to each call is the
/// resource identity and is the only thing used to address the endpoint.
pub struct GatewayReconciler {
    api: Arc<dyn EmailGatewayApi>,
    options: ReconcilerOptions,
}

impl GatewayReconciler {
    /// Create a new reconciler over the given API port
    #[must_use]
    pub fn new(api: Arc<dyn EmailGatewayApi>) -> Self {
        Self { api, options: ReconcilerOptions::default() }
    }

    /// Replace the reconciler options.
    #[must_use]
    pub fn with_options(mut self, options: ReconcilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Options the reconciler was built with.
    #[must_use]
    pub const fn options(&self) -> ReconcilerOptions {
        self.options
    }

    /// Write `desired` as the gateway of `domain`.
    ///
    /// Returns the observed configuration: `desired` itself, or the value
    /// read back when post-create verification is enabled.
    ///
    /// # Errors
    /// - `InvalidInput` if `desired.domain_name` is not `domain`
    /// - `Remote` for any non-200 answer
    /// - `Verification` when the read-back differs from `desired`
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn create(&self, domain: &DomainName, desired: &GatewayConfig) -> Result<GatewayConfig> {
        ensure_identity(domain, desired)?;

        let result = self.put_then_verify(desired).await;
        log_outcome("create", domain, &result);
        result
    }

    /// Fetch the current gateway of `domain`.
    ///
    /// # Errors
    /// - `Remote` for any non-200 answer
    /// - `Protocol` for an unparseable envelope or unknown `smtpMode`
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn read(&self, domain: &DomainName) -> Result<GatewayConfig> {
        let result = self.fetch(domain).await;
        log_outcome("read", domain, &result);
        result
    }

    /// Reset the gateway of `domain` to its empty state.
    ///
    /// Idempotent: deleting an already-cleared gateway succeeds.
    ///
    /// # Errors
    /// `Remote` for any non-200 answer.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn delete(&self, domain: &DomainName) -> Result<()> {
        let tombstone = GatewayConfig::tombstone(domain.clone());
        debug!("writing tombstone");

        let result = self.api.put_gateway(&tombstone).await;
        log_outcome("delete", domain, &result);
        result
    }

    async fn put_then_verify(&self, desired: &GatewayConfig) -> Result<GatewayConfig> {
        self.api.put_gateway(desired).await?;

        if !self.options.verify_after_create {
            return Ok(desired.clone());
        }

        let observed = self.fetch(&desired.domain_name).await?;
        if observed != *desired {
            return Err(MailrouteError::Verification {
                expected: Box::new(desired.clone()),
                observed: Box::new(observed),
            });
        }
        Ok(observed)
    }

    async fn fetch(&self, domain: &DomainName) -> Result<GatewayConfig> {
        let properties = self.api.get_gateway(domain).await?;
        debug!(properties = properties.len(), "received gateway properties");
        GatewayConfig::from_properties(domain.clone(), &properties)
    }
}

fn ensure_identity(domain: &DomainName, desired: &GatewayConfig) -> Result<()> {
    if desired.domain_name == *domain {
        return Ok(());
    }
    Err(MailrouteError::InvalidInput(format!(
        "desired configuration targets {} but the resource identity is {}",
        desired.domain_name, domain
    )))
}

fn log_outcome<T>(operation: &'static str, domain: &DomainName, result: &Result<T>) {
    match result {
        Ok(_) => info!(operation, domain = %domain, "gateway_operation_success"),
        Err(err) => warn!(
            operation,
            domain = %domain,
            error_kind = err.label(),
            status = err.status(),
            "gateway_operation_failure"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mailroute_domain::{GatewayProperty, SmtpMode};

    use super::*;

    /// Port that records writes and never answers reads.
    #[derive(Default)]
    struct RecordingApi {
        writes: Mutex<Vec<GatewayConfig>>,
    }

    #[async_trait]
    impl EmailGatewayApi for RecordingApi {
        async fn put_gateway(&self, config: &GatewayConfig) -> Result<()> {
            self.writes.lock().unwrap().push(config.clone());
            Ok(())
        }

        async fn get_gateway(&self, _domain: &DomainName) -> Result<Vec<GatewayProperty>> {
            Err(MailrouteError::Transport("reads are not expected".into()))
        }
    }

    fn domain(value: &str) -> DomainName {
        DomainName::new(value).unwrap()
    }

    #[tokio::test]
    async fn create_rejects_identity_mismatch_without_calling_api() {
        let api = Arc::new(RecordingApi::default());
        let reconciler = GatewayReconciler::new(api.clone());
        let desired = GatewayConfig::new(domain("b.com"), "mx.b.com", Some(SmtpMode::Smtp));

        let err = reconciler.create(&domain("a.com"), &desired).await.unwrap_err();

        assert!(matches!(err, MailrouteError::InvalidInput(_)));
        assert!(api.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_without_verification_skips_read() {
        let api = Arc::new(RecordingApi::default());
        let reconciler = GatewayReconciler::new(api.clone());
        let desired = GatewayConfig::new(domain("a.com"), "mx.a.com", Some(SmtpMode::SmtpTls));

        let observed = reconciler.create(&domain("a.com"), &desired).await.unwrap();

        assert_eq!(observed, desired);
        assert_eq!(api.writes.lock().unwrap().as_slice(), &[desired]);
    }

    #[tokio::test]
    async fn delete_writes_blank_configuration() {
        let api = Arc::new(RecordingApi::default());
        let reconciler = GatewayReconciler::new(api.clone());

        reconciler.delete(&domain("a.com")).await.unwrap();

        let writes = api.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].is_cleared());
        assert_eq!(writes[0].domain_name, domain("a.com"));
    }

    #[test]
    fn options_default_to_no_verification() {
        let reconciler = GatewayReconciler::new(Arc::new(RecordingApi::default()));
        assert!(!reconciler.options().verify_after_create);

        let verified = reconciler.with_options(ReconcilerOptions { verify_after_create: true });
        assert!(verified.options().verify_after_create);
    }
}
