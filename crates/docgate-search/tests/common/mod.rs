//! Common fixtures for docgate-search integration tests.

use docgate_acl::fields::AclRelation;
use docgate_core::config::DEFAULT_SENTINEL;
use docgate_core::DocgateConfig;
use docgate_search::{AclDocument, AclIndex, AclSchema, SecurityComponent};
use tantivy::query::{AllQuery, Query, QueryClone};

/// Index plus component over the default schema.
pub struct TestHarness {
    /// Committed index with the fixture corpus.
    pub index: AclIndex,
    /// Component under test.
    pub component: SecurityComponent,
}

impl TestHarness {
    /// Harness with default configuration (authority at the default URL).
    pub fn new() -> Self {
        Self::with_config(DocgateConfig::default())
    }

    /// Harness with a custom configuration.
    pub fn with_config(config: DocgateConfig) -> Self {
        let schema = AclSchema::default();
        let mut index = AclIndex::new_in_memory(&schema, DEFAULT_SENTINEL).expect("index");
        for doc in corpus() {
            index.add_document(&doc).expect("add document");
        }
        index.commit().expect("commit");

        let component =
            SecurityComponent::new(&config, schema.schema().clone()).expect("component");
        Self { index, component }
    }

    /// Ids from [`ALL_IDS`] that `query` matches, in fixture order.
    pub fn visible(&self, query: Box<dyn Query>) -> Vec<&'static str> {
        ALL_IDS
            .iter()
            .copied()
            .filter(|id| {
                self.index
                    .matches_id(query.box_clone(), id)
                    .expect("search")
            })
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids of every fixture document.
pub const ALL_IDS: [&str; 6] = [
    "public",
    "engineering",
    "eng-no-contractors",
    "finance-share",
    "hr-parent",
    "eng-share-finance-doc",
];

/// Fixture corpus covering each relation and the deny path.
pub fn corpus() -> Vec<AclDocument> {
    vec![
        AclDocument::builder()
            .id("public")
            .body("company handbook")
            .build(),
        AclDocument::builder()
            .id("engineering")
            .body("design review notes")
            .allow(AclRelation::Document, ["eng"])
            .build(),
        AclDocument::builder()
            .id("eng-no-contractors")
            .body("roadmap")
            .allow(AclRelation::Document, ["eng"])
            .deny(AclRelation::Document, ["contractors"])
            .build(),
        AclDocument::builder()
            .id("finance-share")
            .body("quarterly report")
            .allow(AclRelation::Share, ["finance"])
            .build(),
        AclDocument::builder()
            .id("hr-parent")
            .body("salary bands")
            .allow(AclRelation::Parent, ["hr"])
            .build(),
        AclDocument::builder()
            .id("eng-share-finance-doc")
            .body("budget design")
            .allow(AclRelation::Share, ["eng"])
            .allow(AclRelation::Document, ["finance"])
            .build(),
    ]
}

/// Match-everything user query.
pub fn all() -> Box<dyn Query> {
    Box::new(AllQuery)
}
