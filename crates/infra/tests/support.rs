//! Shared helpers for the infra integration tests.

use mailroute_domain::ProviderConfig;
use mailroute_infra::auth::AmbientCredentials;
use mailroute_infra::ProviderSession;
use serde_json::json;
use wiremock::MockServer;

/// Bearer token configured directly on test sessions.
pub const TEST_TOKEN: &str = "ya29.integration";

/// PKCS#8 RSA key used to sign service account assertions.
pub const PRIVATE_KEY_PEM: &str = include_str!("fixtures/test_service_account_key.pem");

/// Mount point of the fake Admin Settings API on the mock server.
pub const API_PREFIX: &str = "/a/feeds/domain/2.0";

pub fn api_base_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PREFIX)
}

pub fn gateway_path(domain: &str) -> String {
    format!("{API_PREFIX}/{domain}/email/gateway")
}

pub fn token_uri(server: &MockServer) -> String {
    format!("{}/token", server.uri())
}

/// Config pointing at `server`, with no credential material.
pub fn base_config(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::new("C0123abc");
    config.api_base_url = api_base_url(server);
    config.timeout_seconds = 5;
    config
}

/// Session authorized with [`TEST_TOKEN`].
pub fn token_session(server: &MockServer, verify_after_create: bool) -> ProviderSession {
    let mut config = base_config(server);
    config.access_token = Some(TEST_TOKEN.to_string());
    config.verify_after_create = verify_after_create;
    connect(&config)
}

pub fn connect(config: &ProviderConfig) -> ProviderSession {
    ProviderSession::connect_with_ambient(config, AmbientCredentials::none())
        .expect("session should connect")
}

/// Response envelope carrying `properties` in the given order.
pub fn entry_xml(properties: &[(&str, &str)]) -> String {
    let rendered: String = properties
        .iter()
        .map(|(name, value)| format!("<apps:property name='{name}' value='{value}'/>"))
        .collect();

    format!(
        "<?xml version='1.0' encoding='UTF-8'?>\
         <entry xmlns='http://www.w3.org/2005/Atom' xmlns:apps='http://schemas.google.com/apps/2006'>\
         <id>https://apps-apis.google.com/a/feeds/domain/2.0/example.com/email/gateway</id>\
         <updated>2024-05-01T12:00:00.000Z</updated>\
         <link rel='self' type='application/atom+xml' href='https://apps-apis.google.com/a/feeds/domain/2.0/example.com/email/gateway'/>\
         <link rel='edit' type='application/atom+xml' href='https://apps-apis.google.com/a/feeds/domain/2.0/example.com/email/gateway'/>\
         {rendered}\
         </entry>"
    )
}

pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "mailroute-tests",
        "private_key_id": "test-key-1",
        "private_key": PRIVATE_KEY_PEM,
        "client_email": "mailroute@mailroute-tests.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "token_uri": token_uri
    })
    .to_string()
}

pub fn authorized_user_json(token_uri: &str) -> String {
    json!({
        "type": "authorized_user",
        "client_id": "client.apps.googleusercontent.com",
        "client_secret": "client-secret",
        "refresh_token": "1//refresh-token",
        "token_uri": token_uri
    })
    .to_string()
}

/// Bodies of every PUT the server received, in order.
pub async fn put_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == "PUT")
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect()
}
