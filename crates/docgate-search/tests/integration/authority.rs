//! Authenticated requests resolved through a mock authority service.

use std::time::Duration;

use docgate_acl::params::RequestParams;
use docgate_core::DocgateConfig;
use docgate_search::Error;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{all, TestHarness};

fn harness_for(server: &MockServer) -> TestHarness {
    let mut config = DocgateConfig::default();
    config.authority.base_url = server.uri();
    TestHarness::with_config(config)
}

#[tokio::test]
async fn test_authenticated_user_sees_resolved_acls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/UserACLs"))
        .and(query_param("username", "alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("AUTHORIZED:ad\nTOKEN:eng\nTOKEN:finance\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server);
    let params = RequestParams::new().with("AuthenticatedUserName", "alice");
    let query = harness.component.prepare(&params, all()).await.unwrap();

    assert_eq!(
        harness.visible(query),
        vec![
            "public",
            "engineering",
            "eng-no-contractors",
            "finance-share",
            "eng-share-finance-doc",
        ]
    );
}

#[tokio::test]
async fn test_multiple_domains_are_indexed() {
    let server = MockServer::start().await;
    Mock::given(path("/UserACLs"))
        .and(query_param("username_0", "alice"))
        .and(query_param("domain_0", "ad"))
        .and(query_param("username_1", "asmith"))
        .and(query_param("domain_1", "ldap"))
        .respond_with(ResponseTemplate::new(200).set_body_string("TOKEN:hr\n"))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness_for(&server);
    let params = RequestParams::new()
        .with("AuthenticatedUserName_0", "alice")
        .with("AuthenticatedUserDomain_0", "ad")
        .with("AuthenticatedUserName_1", "asmith")
        .with("AuthenticatedUserDomain_1", "ldap");
    let query = harness.component.filter_query(&params).await.unwrap();

    assert_eq!(harness.visible(query), vec!["public", "hr-parent"]);
}

#[tokio::test]
async fn test_user_with_no_tokens_sees_only_public() {
    let server = MockServer::start().await;
    Mock::given(path("/UserACLs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("UNREACHABLEAUTHORITY:ad\n"))
        .mount(&server)
        .await;

    let harness = harness_for(&server);
    let params = RequestParams::new().with("AuthenticatedUserName", "mallory");
    let query = harness.component.prepare(&params, all()).await.unwrap();
    assert_eq!(harness.visible(query), vec!["public"]);
}

#[tokio::test]
async fn test_authority_failure_fails_the_request() {
    let server = MockServer::start().await;
    Mock::given(path("/UserACLs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let harness = harness_for(&server);
    let params = RequestParams::new().with("AuthenticatedUserName", "alice");
    let err = harness.component.prepare(&params, all()).await.err().unwrap();

    assert!(matches!(err, Error::Client(_)));
    let msg = err.to_string();
    assert!(msg.contains("503"));
    assert!(msg.contains("service unavailable"));
}

#[tokio::test]
async fn test_authority_timeout_fails_the_request() {
    let server = MockServer::start().await;
    Mock::given(path("/UserACLs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("TOKEN:eng")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = DocgateConfig::default();
    config.authority.base_url = server.uri();
    config.authority.socket_timeout_ms = 50;
    let harness = TestHarness::with_config(config);

    let params = RequestParams::new().with("AuthenticatedUserName", "alice");
    let err = harness.component.filter_query(&params).await.err().unwrap();
    assert!(matches!(err, Error::Client(docgate_client::Error::Transport { .. })));
}

#[tokio::test]
async fn test_pool_is_lazy_and_shut_down_once() {
    let server = MockServer::start().await;
    Mock::given(path("/UserACLs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("TOKEN:eng"))
        .mount(&server)
        .await;

    let harness = harness_for(&server);
    assert_eq!(
        harness.component.pool_state(),
        docgate_core::ResourceState::Uninitialized
    );

    let params = RequestParams::new().with("AuthenticatedUserName", "alice");
    harness.component.filter_query(&params).await.unwrap();
    assert!(harness.component.pool_state().is_ready());

    assert!(harness.component.shutdown());
    assert!(!harness.component.shutdown());

    let err = harness.component.filter_query(&params).await.err().unwrap();
    assert!(err.is_fatal_configuration());

    // Anonymous requests never touch the pool.
    assert!(harness
        .component
        .filter_query(&RequestParams::new())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_missing_authority_url_is_configuration_error() {
    let mut config = DocgateConfig::default();
    config.authority.base_url = String::new();
    let harness = TestHarness::with_config(config);

    let params = RequestParams::new().with("AuthenticatedUserName", "alice");
    let err = harness.component.filter_query(&params).await.err().unwrap();
    assert!(err.is_fatal_configuration());
}
