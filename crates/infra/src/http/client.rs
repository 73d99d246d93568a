use std::sync::Arc;
use std::time::Duration;

use mailroute_core::TokenSource;
use mailroute_domain::constants::{DEFAULT_TIMEOUT_SECS, USER_AGENT_PREFIX};
use mailroute_domain::{MailrouteError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// User agent sent with every request, `mailroute/<version>`.
pub fn default_user_agent() -> String {
    format!("{USER_AGENT_PREFIX}/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client that stamps a bearer token on every request.
///
/// Sends each request exactly once. There is no retry, backoff or circuit
/// breaking: a failure is reported to the caller as soon as it happens.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    client: ReqwestClient,
    tokens: Arc<dyn TokenSource>,
}

impl AuthenticatedTransport {
    /// Start building a new transport.
    pub fn builder() -> AuthenticatedTransportBuilder {
        AuthenticatedTransportBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Kind of the token source backing this transport, for logs.
    pub fn token_kind(&self) -> &'static str {
        self.tokens.kind()
    }

    /// Authorize and execute the provided request builder once.
    ///
    /// # Errors
    /// - `Credential` when no token can be obtained
    /// - `Transport` for DNS, connect, TLS and timeout failures
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let token = self.tokens.token().await.map_err(into_credential_error)?;

        let request = builder.bearer_auth(token).build().map_err(InfraError::from)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, token_kind = self.tokens.kind(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = response.status().as_u16(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

fn into_credential_error(err: MailrouteError) -> MailrouteError {
    match err {
        MailrouteError::Credential(_) => err,
        other => MailrouteError::Credential(format!("failed to obtain access token: {other}")),
    }
}

/// Builder for [`AuthenticatedTransport`].
#[derive(Debug)]
pub struct AuthenticatedTransportBuilder {
    timeout: Duration,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for AuthenticatedTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            default_headers: None,
        }
    }
}

impl AuthenticatedTransportBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    #[must_use]
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the bare client without any authorization.
    ///
    /// Token sources use this for the token endpoint so that token
    /// exchange goes over the same clean, proxy-free transport.
    ///
    /// # Errors
    /// Returns `Config` if reqwest rejects the client settings.
    pub fn build_client(&self) -> Result<ReqwestClient> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .user_agent(self.user_agent.clone());

        if let Some(headers) = &self.default_headers {
            builder = builder.default_headers(headers.clone());
        }

        builder.build().map_err(|err| {
            MailrouteError::Config(format!("failed to build HTTP client: {err}"))
        })
    }

    /// Finish the transport around `tokens`.
    ///
    /// # Errors
    /// Returns `Config` if reqwest rejects the client settings.
    pub fn build(self, tokens: Arc<dyn TokenSource>) -> Result<AuthenticatedTransport> {
        let client = self.build_client()?;
        Ok(AuthenticatedTransport { client, tokens })
    }
}
