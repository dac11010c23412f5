//! Dynamic-DNS mutator against a mocked update endpoint.

mod common;

use std::time::Duration;

use common::{DOMAIN, RECORD_NAME, posted_bodies};
use he_dns_provider::{
    ClientConfig, Credentials, PLACEHOLDER_VALUE, ProviderError, RecordTarget, SolverMethod,
    create_mutator,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "dyn-key-0123";

async fn mount_update(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/nic/update"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn dyn_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), Credentials::api_key(API_KEY))
}

fn target() -> RecordTarget {
    RecordTarget::new(RECORD_NAME, DOMAIN, "token-value")
}

#[tokio::test]
async fn test_publish_sends_update_form() {
    let server = MockServer::start().await;
    mount_update(&server, 200, "good 127.0.0.1").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    assert_eq!(mutator.method(), SolverMethod::DynamicDns);
    require_ok!(mutator.publish(&target()).await);

    let bodies = posted_bodies(&server, "/nic/update").await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("hostname=_acme-challenge.example.com"));
    assert!(bodies[0].contains(&format!("password={API_KEY}")));
    assert!(bodies[0].contains("txt=token-value"));
}

#[tokio::test]
async fn test_nochg_accepted() {
    let server = MockServer::start().await;
    mount_update(&server, 200, "nochg 127.0.0.1").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    require_ok!(mutator.publish(&target()).await);
}

#[tokio::test]
async fn test_withdraw_overwrites_with_placeholder() {
    let server = MockServer::start().await;
    mount_update(&server, 200, "good 127.0.0.1").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    require_ok!(mutator.withdraw(&target()).await);

    let bodies = posted_bodies(&server, "/nic/update").await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains(&format!("txt={PLACEHOLDER_VALUE}")));
    assert!(!bodies[0].contains("token-value"));
}

#[tokio::test]
async fn test_abuse_rejected() {
    let server = MockServer::start().await;
    mount_update(&server, 200, "abuse").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    assert_err!(
        mutator.publish(&target()).await,
        ProviderError::Submission { detail } if detail.contains("abuse")
    );
}

#[tokio::test]
async fn test_bad_auth_rejected() {
    let server = MockServer::start().await;
    mount_update(&server, 401, "badauth").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    assert_err!(
        mutator.withdraw(&target()).await,
        ProviderError::Submission { .. }
    );
}

#[tokio::test]
async fn test_good_body_with_error_status_rejected() {
    let server = MockServer::start().await;
    mount_update(&server, 503, "good 127.0.0.1").await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    assert_err!(
        mutator.publish(&target()).await,
        ProviderError::Submission { detail } if detail.contains("503")
    );
}

#[tokio::test]
async fn test_no_session_cookie_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nic/update"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "tracking=1; path=/")
                .set_body_string("good 127.0.0.1"),
        )
        .mount(&server)
        .await;

    let mutator = require_ok!(create_mutator(dyn_config(&server)));
    require_ok!(mutator.publish(&target()).await);
    require_ok!(mutator.withdraw(&target()).await);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| !r.headers.contains_key("cookie")));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nic/update"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("good 127.0.0.1")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = dyn_config(&server).request_timeout(Duration::from_millis(200));
    let mutator = require_ok!(create_mutator(config));
    assert_err!(
        mutator.publish(&target()).await,
        ProviderError::Timeout { .. }
    );
}
