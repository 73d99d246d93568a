//! In-memory gateway API
//!
//! Behaves like the remote singleton: PUT replaces both values, GET echoes
//! them back (optionally in reversed order), and every domain starts out
//! empty.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mailroute_core::EmailGatewayApi;
use mailroute_domain::{
    DomainName, GatewayConfig, GatewayProperty, MailrouteError, Result as DomainResult,
};

/// Call recorded by [`InMemoryGatewayApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Put(String, [GatewayProperty; 2]),
    Get(String),
}

#[derive(Default)]
pub struct InMemoryGatewayApi {
    gateways: Mutex<HashMap<String, Vec<GatewayProperty>>>,
    calls: Mutex<Vec<ApiCall>>,
    reverse_order: bool,
    failure: Option<MailrouteError>,
    /// Value the server silently substitutes for `smartHost` on write.
    rewrite_smart_host: Option<String>,
}

impl InMemoryGatewayApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo properties as `smtpMode`, `smartHost`.
    pub fn reversed() -> Self {
        Self { reverse_order: true, ..Self::default() }
    }

    /// Fail every call with `error`.
    pub fn failing(error: MailrouteError) -> Self {
        Self { failure: Some(error), ..Self::default() }
    }

    /// Store `host` instead of whatever `smartHost` is written.
    pub fn rewriting_smart_host(host: &str) -> Self {
        Self { rewrite_smart_host: Some(host.to_string()), ..Self::default() }
    }

    /// Seed the stored properties for `domain` verbatim.
    pub fn seed(&self, domain: &str, properties: Vec<GatewayProperty>) {
        self.gateways.lock().unwrap().insert(domain.to_string(), properties);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> DomainResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EmailGatewayApi for InMemoryGatewayApi {
    async fn put_gateway(&self, config: &GatewayConfig) -> DomainResult<()> {
        let properties = config.to_properties();
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Put(config.domain_name.to_string(), properties.clone()));
        self.check_failure()?;

        let mut stored = properties.to_vec();
        if let Some(host) = &self.rewrite_smart_host {
            stored[0].value = host.clone();
        }
        self.gateways.lock().unwrap().insert(config.domain_name.to_string(), stored);
        Ok(())
    }

    async fn get_gateway(&self, domain: &DomainName) -> DomainResult<Vec<GatewayProperty>> {
        self.calls.lock().unwrap().push(ApiCall::Get(domain.to_string()));
        self.check_failure()?;

        let mut properties = self
            .gateways
            .lock()
            .unwrap()
            .get(domain.as_str())
            .cloned()
            .unwrap_or_else(|| GatewayConfig::tombstone(domain.clone()).to_properties().to_vec());
        if self.reverse_order {
            properties.reverse();
        }
        Ok(properties)
    }
}
