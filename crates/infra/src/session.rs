//! Provider session - the wired-up handle handed to lifecycle callers

use std::sync::Arc;

use mailroute_core::{GatewayReconciler, ReconcilerOptions};
use mailroute_domain::{MailrouteError, ProviderConfig, Result};
use tracing::info;

use crate::auth::{validate_credentials, AmbientCredentials, CredentialResolver};
use crate::gateway::EmailGatewayClient;
use crate::http::AuthenticatedTransport;

/// Everything one configured provider needs, built once and shared
/// read-only by every operation.
///
/// Replaces process-wide provider state: callers hold the session and pass
/// it where it is needed.
pub struct ProviderSession {
    config: ProviderConfig,
    client: Arc<EmailGatewayClient>,
    reconciler: Arc<GatewayReconciler>,
}

impl ProviderSession {
    /// Validate `config`, resolve credentials and wire the reconciler.
    ///
    /// Ambient credentials are discovered from the process environment.
    ///
    /// # Errors
    /// - `Config` for invalid settings
    /// - `Credential` for credential diagnostics or when no usable
    ///   credential can be resolved
    pub fn connect(config: &ProviderConfig) -> Result<Self> {
        Self::connect_with_ambient(config, AmbientCredentials::from_env())
    }

    /// [`connect`](Self::connect) with explicit ambient credential
    /// locations.
    ///
    /// # Errors
    /// Same as [`connect`](Self::connect).
    pub fn connect_with_ambient(config: &ProviderConfig, ambient: AmbientCredentials) -> Result<Self> {
        config.validate()?;

        let bundle = config.to_bundle();
        if bundle.access_token.is_none() {
            if let Some(credentials) = bundle.credentials.as_deref() {
                let diagnostics = validate_credentials(credentials);
                if !diagnostics.is_empty() {
                    let rendered: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
                    return Err(MailrouteError::Credential(rendered.join("; ")));
                }
            }
        }

        let builder = AuthenticatedTransport::builder().timeout(config.timeout());
        let resolver = CredentialResolver::new(builder.build_client()?).with_ambient(ambient);
        let tokens = resolver.resolve(&bundle)?;
        let transport = builder.build(tokens)?;

        let client = Arc::new(EmailGatewayClient::new(transport).with_base_url(&config.api_base_url)?);
        let options = ReconcilerOptions { verify_after_create: config.verify_after_create };
        let reconciler = Arc::new(GatewayReconciler::new(client.clone()).with_options(options));

        info!(
            customer_id = %config.customer_id,
            token_kind = client.token_kind(),
            verify_after_create = options.verify_after_create,
            "provider session ready"
        );

        Ok(Self { config: config.clone(), client, reconciler })
    }

    /// Settings the session was built from.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Workspace customer the session acts for.
    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.config.customer_id
    }

    /// Reconciler for the email gateway resource.
    #[must_use]
    pub fn reconciler(&self) -> Arc<GatewayReconciler> {
        Arc::clone(&self.reconciler)
    }

    /// Low-level API client, for callers that need raw properties.
    #[must_use]
    pub fn gateway_client(&self) -> Arc<EmailGatewayClient> {
        Arc::clone(&self.client)
    }
}
