//! Visibility of the fixture corpus for anonymous and group-token callers.

use docgate_acl::params::RequestParams;
use docgate_acl::{AclFieldNames, AclQueryCompiler, TokenSet};
use docgate_core::config::DEFAULT_SENTINEL;
use docgate_search::filter_query;
use tantivy::query::{Query, QueryClone, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::Term;

use crate::common::{all, corpus, TestHarness};

fn with_tokens(tokens: &[&str]) -> RequestParams {
    tokens
        .iter()
        .map(|t| ("UserTokens", *t))
        .collect()
}

#[tokio::test]
async fn test_anonymous_sees_only_public() {
    let harness = TestHarness::new();
    let query = harness
        .component
        .prepare(&RequestParams::new(), all())
        .await
        .unwrap();
    assert_eq!(harness.visible(query), vec!["public"]);
}

#[tokio::test]
async fn test_group_token_grants_document_acl() {
    let harness = TestHarness::new();
    let query = harness
        .component
        .prepare(&with_tokens(&["eng"]), all())
        .await
        .unwrap();
    assert_eq!(
        harness.visible(query),
        vec!["public", "engineering", "eng-no-contractors"]
    );
}

#[tokio::test]
async fn test_deny_token_dominates() {
    let harness = TestHarness::new();
    let query = harness
        .component
        .prepare(&with_tokens(&["eng", "contractors"]), all())
        .await
        .unwrap();
    assert_eq!(harness.visible(query), vec!["public", "engineering"]);
}

#[tokio::test]
async fn test_every_relation_must_pass() {
    let harness = TestHarness::new();
    let query = harness
        .component
        .prepare(&with_tokens(&["eng", "finance"]), all())
        .await
        .unwrap();
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
async fn test_parent_relation() {
    let harness = TestHarness::new();
    let query = harness
        .component
        .filter_query(&with_tokens(&["hr"]))
        .await
        .unwrap();
    assert_eq!(harness.visible(query), vec!["public", "hr-parent"]);
}

#[tokio::test]
async fn test_filter_narrows_user_query() {
    let harness = TestHarness::new();
    let schema = harness.index.schema();
    let design: Box<dyn Query> = Box::new(TermQuery::new(
        Term::from_field_text(schema.body, "design"),
        IndexRecordOption::Basic,
    ));

    let unfiltered = harness.visible(design.box_clone());
    assert_eq!(unfiltered, vec!["engineering", "eng-share-finance-doc"]);

    let query = harness
        .component
        .prepare(&with_tokens(&["eng"]), design)
        .await
        .unwrap();
    assert_eq!(harness.visible(query), vec!["engineering"]);
}

#[tokio::test]
async fn test_index_agrees_with_in_memory_evaluation() {
    let harness = TestHarness::new();
    let docs = corpus();
    let compiler = AclQueryCompiler::default();
    let names = AclFieldNames::default();
    let token_sets: [&[&str]; 6] = [
        &[],
        &["eng"],
        &["eng", "contractors"],
        &["finance"],
        &["hr", "eng", "finance"],
        &[DEFAULT_SENTINEL],
    ];

    for held in token_sets {
        let tokens: TokenSet = held.iter().copied().collect();
        let filter = compiler.compile(&tokens);
        let lowered = filter_query(&filter, harness.index.schema().schema()).unwrap();

        let expected: Vec<&str> = docs
            .iter()
            .filter(|doc| filter.matches(&doc.field_values(&names, DEFAULT_SENTINEL)))
            .map(|doc| doc.id.as_str())
            .collect();
        assert_eq!(harness.visible(lowered), expected, "tokens {held:?}");
    }
}
