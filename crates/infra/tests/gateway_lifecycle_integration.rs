//! Integration tests for the gateway lifecycle over HTTP
//!
//! **Coverage:**
//! - Create → Read → Delete → Read against a mock Admin Settings API
//! - Property order independence on read
//! - Tombstone idempotence
//! - Identity: every call addresses the domain it was given
//! - Remote failures (403) on every operation, with no retry
//! - Post-create verification
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for the Admin Settings API
//! - Real `ProviderSession` (static token, real transport and codec)

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use mailroute_domain::{DomainName, GatewayConfig, GatewayState, MailrouteError, SmtpMode};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn domain(name: &str) -> DomainName {
    DomainName::new(name).expect("valid domain")
}

async fn mount_put_ok(server: &MockServer, domain: &str) {
    Mock::given(method("PUT"))
        .and(path(support::gateway_path(domain)))
        .and(header("authorization", format!("Bearer {}", support::TEST_TOKEN).as_str()))
        .and(header("content-type", "application/atom+xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(support::entry_xml(&[])))
        .mount(server)
        .await;
}

async fn mount_get(server: &MockServer, domain: &str, properties: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(support::gateway_path(domain)))
        .respond_with(ResponseTemplate::new(200).set_body_string(support::entry_xml(properties)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_read_delete_read_round_trip() {
    let server = MockServer::start().await;
    let session = support::token_session(&server, false);
    let reconciler = session.reconciler();
    let example = domain("example.com");

    // Create
    mount_put_ok(&server, "example.com").await;
    let desired = GatewayConfig::new(example.clone(), "smtp.example.com", Some(SmtpMode::SmtpTls));
    let created = reconciler.create(&example, &desired).await.expect("create should succeed");
    assert_eq!(created, desired);

    let bodies = support::put_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let smart_host = bodies[0]
        .find("<apps:property name=\"smartHost\" value=\"smtp.example.com\"/>")
        .expect("smartHost in request");
    let smtp_mode = bodies[0]
        .find("<apps:property name=\"smtpMode\" value=\"SMTP_TLS\"/>")
        .expect("smtpMode in request");
    assert!(smart_host < smtp_mode, "smartHost must precede smtpMode");

    // Read, server answers in reversed order
    mount_get(&server, "example.com", &[("smtpMode", "SMTP_TLS"), ("smartHost", "smtp.example.com")])
        .await;
    let observed = reconciler.read(&example).await.expect("read should succeed");
    assert_eq!(observed, desired);
    assert_eq!(observed.state(), GatewayState::Present);

    // Delete
    reconciler.delete(&example).await.expect("delete should succeed");
    let bodies = support::put_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert!(bodies[1].contains("<apps:property name=\"smartHost\" value=\"\"/>"));
    assert!(bodies[1].contains("<apps:property name=\"smtpMode\" value=\"\"/>"));

    // Read after delete returns empty fields
    server.reset().await;
    mount_get(&server, "example.com", &[("smartHost", ""), ("smtpMode", "")]).await;
    let cleared = reconciler.read(&example).await.expect("read after delete should succeed");
    assert!(cleared.is_cleared());
    assert_eq!(cleared.smtp_mode, None);
    assert_eq!(cleared.state(), GatewayState::Cleared);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = MockServer::start().await;
    mount_put_ok(&server, "example.com").await;
    mount_get(&server, "example.com", &[]).await;

    let session = support::token_session(&server, false);
    let reconciler = session.reconciler();
    let example = domain("example.com");

    reconciler.delete(&example).await.expect("first delete");
    reconciler.delete(&example).await.expect("second delete");

    let observed = reconciler.read(&example).await.expect("read");
    assert!(observed.is_cleared());
}

#[tokio::test]
async fn every_operation_addresses_the_given_domain() {
    let server = MockServer::start().await;
    mount_put_ok(&server, "a.com").await;
    mount_get(&server, "a.com", &[("smartHost", "relay.a.com"), ("smtpMode", "SMTP")]).await;
    Mock::given(path(support::gateway_path("b.com")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = support::token_session(&server, false);
    let reconciler = session.reconciler();
    let a = domain("a.com");

    let desired = GatewayConfig::new(a.clone(), "relay.a.com", Some(SmtpMode::Smtp));
    reconciler.create(&a, &desired).await.expect("create");
    reconciler.read(&a).await.expect("read");
    reconciler.delete(&a).await.expect("delete");

    let retarget = GatewayConfig::new(domain("b.com"), "relay.b.com", None);
    let err = reconciler.create(&a, &retarget).await.unwrap_err();
    assert_eq!(err.label(), "invalid_input");
}

#[tokio::test]
async fn forbidden_is_reported_verbatim_without_retry() {
    let body = "<errors><error errorCode='1100' reason='UserDeletedRecently'/></errors>";

    let server = MockServer::start().await;
    Mock::given(path(support::gateway_path("example.com")))
        .respond_with(ResponseTemplate::new(403).set_body_string(body))
        .expect(3)
        .mount(&server)
        .await;

    let session = support::token_session(&server, false);
    let reconciler = session.reconciler();
    let example = domain("example.com");
    let desired = GatewayConfig::new(example.clone(), "smtp.example.com", None);

    let create = reconciler.create(&example, &desired).await.unwrap_err();
    let read = reconciler.read(&example).await.unwrap_err();
    let delete = reconciler.delete(&example).await.unwrap_err();

    for err in [create, read, delete] {
        assert_eq!(err, MailrouteError::remote(403, body));
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("UserDeletedRecently"));
    }
}

#[tokio::test]
async fn verified_create_returns_the_observed_config() {
    let server = MockServer::start().await;
    mount_put_ok(&server, "example.com").await;
    mount_get(&server, "example.com", &[("smtpMode", "SMTP"), ("smartHost", "smtp.example.com")])
        .await;

    let session = support::token_session(&server, true);
    let example = domain("example.com");
    let desired = GatewayConfig::new(example.clone(), "smtp.example.com", Some(SmtpMode::Smtp));

    let observed = session.reconciler().create(&example, &desired).await.expect("verified create");
    assert_eq!(observed, desired);
}

#[tokio::test]
async fn verified_create_detects_drift() {
    let server = MockServer::start().await;
    mount_put_ok(&server, "example.com").await;
    mount_get(&server, "example.com", &[("smartHost", "other.example.com"), ("smtpMode", "SMTP")])
        .await;

    let session = support::token_session(&server, true);
    let example = domain("example.com");
    let desired = GatewayConfig::new(example.clone(), "smtp.example.com", Some(SmtpMode::Smtp));

    let err = session.reconciler().create(&example, &desired).await.unwrap_err();
    match err {
        MailrouteError::Verification { expected, observed } => {
            assert_eq!(*expected, desired);
            assert_eq!(observed.smart_host, "other.example.com");
        }
        other => panic!("expected verification error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_read_response_is_a_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<entry><apps:property"))
        .mount(&server)
        .await;

    let session = support::token_session(&server, false);
    let err = session.reconciler().read(&domain("example.com")).await.unwrap_err();

    assert_eq!(err.label(), "protocol");
}
