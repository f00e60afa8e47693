//! Requests that skip filtering.

use docgate_acl::params::RequestParams;
use docgate_core::DocgateConfig;
use docgate_search::Bypass;

use crate::common::{all, TestHarness, ALL_IDS};

#[tokio::test]
async fn test_disabled_component_returns_user_query() {
    let harness = TestHarness::new();
    let params = RequestParams::new().with("acl", "false");
    let query = harness.component.prepare(&params, all()).await.unwrap();
    assert_eq!(harness.visible(query), ALL_IDS.to_vec());
}

#[tokio::test]
async fn test_distributed_subrequest_is_not_filtered_twice() {
    let harness = TestHarness::new();
    let params = RequestParams::new().with("shards", "host1/core,host2/core");
    assert_eq!(harness.component.bypass(&params), Some(Bypass::Distributed));
    let query = harness.component.prepare(&params, all()).await.unwrap();
    assert_eq!(harness.visible(query).len(), ALL_IDS.len());
}

#[tokio::test]
async fn test_health_check_query_bypasses() {
    let harness = TestHarness::new();
    let params = RequestParams::new()
        .with("q", "SOLRPINGQUERY")
        .with("AuthenticatedUserName", "alice");
    // No authority is running: a bypassed request must not try to reach it.
    let query = harness.component.prepare(&params, all()).await.unwrap();
    assert_eq!(harness.visible(query).len(), ALL_IDS.len());
}

#[tokio::test]
async fn test_custom_bypass_list() {
    let mut config = DocgateConfig::default();
    config.search.bypass_queries = vec![" *:* ".to_string()];
    config.search.enable_param = "security".to_string();
    let harness = TestHarness::with_config(config);

    let params = RequestParams::new().with("q", "*:*");
    assert!(harness.component.bypass(&params).is_some());

    let params = RequestParams::new().with("q", "solrpingquery");
    assert_eq!(harness.component.bypass(&params), None);

    let params = RequestParams::new().with("security", "no");
    assert_eq!(harness.component.bypass(&params), Some(Bypass::Disabled));
}

#[tokio::test]
async fn test_filter_query_ignores_bypass_rules() {
    let harness = TestHarness::new();
    let params = RequestParams::new().with("acl", "false");
    let query = harness.component.filter_query(&params).await.unwrap();
    assert_eq!(harness.visible(query), vec!["public"]);
}
