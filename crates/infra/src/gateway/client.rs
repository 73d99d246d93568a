//! Admin Settings API client for the email gateway endpoint

use async_trait::async_trait;
use mailroute_core::EmailGatewayApi;
use mailroute_domain::constants::{DEFAULT_API_BASE_URL, EMAIL_GATEWAY_PATH};
use mailroute_domain::{DomainName, GatewayConfig, GatewayProperty, MailrouteError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::codec;
use crate::errors::InfraError;
use crate::http::AuthenticatedTransport;

const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// [`EmailGatewayApi`] over HTTPS.
///
/// Addresses `<base>/<domain>/email/gateway`. Only the base is
/// configurable; the path shape is fixed by the API.
#[derive(Clone)]
pub struct EmailGatewayClient {
    transport: AuthenticatedTransport,
    base_url: String,
}

impl EmailGatewayClient {
    /// Client against the public Admin Settings API.
    pub fn new(transport: AuthenticatedTransport) -> Self {
        Self { transport, base_url: DEFAULT_API_BASE_URL.to_string() }
    }

    /// Point the client at another base, e.g. a mock server or a mirror.
    ///
    /// # Errors
    /// Returns `MailrouteError::Config` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| MailrouteError::Config(format!("invalid API base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MailrouteError::Config(format!(
                "API base URL must use http or https, got {:?}",
                parsed.scheme()
            )));
        }

        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// API base with any trailing `/` removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Kind of credential the requests are authorized with.
    pub fn token_kind(&self) -> &'static str {
        self.transport.token_kind()
    }

    /// Endpoint of the gateway of `domain`.
    pub fn endpoint(&self, domain: &DomainName) -> String {
        format!("{}/{}/{}", self.base_url, domain, EMAIL_GATEWAY_PATH)
    }

    /// Read the body of a 200 response, or turn anything else into
    /// `MailrouteError::Remote`.
    async fn expect_ok(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await.map_err(InfraError::from)?;

        if status != StatusCode::OK {
            return Err(Self::map_status_error(status, &body));
        }

        Ok(body.to_vec())
    }

    fn map_status_error(status: StatusCode, body: &[u8]) -> MailrouteError {
        MailrouteError::remote(status.as_u16(), String::from_utf8_lossy(body))
    }
}

#[async_trait]
impl EmailGatewayApi for EmailGatewayClient {
    #[instrument(skip_all, fields(domain = %config.domain_name))]
    async fn put_gateway(&self, config: &GatewayConfig) -> Result<()> {
        let url = self.endpoint(&config.domain_name);
        let body = codec::encode(config)?;

        debug!(url = %url, cleared = config.is_cleared(), "PUT gateway");

        let request = self
            .transport
            .request(Method::PUT, &url)
            .header(CONTENT_TYPE, ATOM_CONTENT_TYPE)
            .body(body);

        let response = self.transport.send(request).await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(domain = %domain))]
    async fn get_gateway(&self, domain: &DomainName) -> Result<Vec<GatewayProperty>> {
        let url = self.endpoint(domain);

        debug!(url = %url, "GET gateway");

        let response = self.transport.send(self.transport.request(Method::GET, &url)).await?;
        let body = Self::expect_ok(response).await?;
        codec::decode(&body)
    }
}
