//! Indexable documents carrying ACL metadata.
//!
//! An empty allow or deny list means "no restriction recorded" and is
//! indexed as the sentinel, which is what the compiled open clause tests
//! for.

use std::collections::HashMap;

use docgate_acl::fields::{Access, AclField, AclFieldNames, AclRelation};
use serde::{Deserialize, Serialize};
use tantivy::TantivyDocument;

use crate::schema::AclSchema;

/// Allow/deny tokens for one relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationAcl {
    /// Tokens granting visibility.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Tokens revoking visibility.
    #[serde(default)]
    pub deny: Vec<String>,
}

/// A document with its content and ACL metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclDocument {
    /// Unique identifier.
    pub id: String,
    /// Searchable content.
    #[serde(default)]
    pub body: String,
    /// ACL attached to the document itself.
    #[serde(default)]
    pub document: RelationAcl,
    /// ACL of the share.
    #[serde(default)]
    pub share: RelationAcl,
    /// ACL inherited from the parent.
    #[serde(default)]
    pub parent: RelationAcl,
}

impl AclDocument {
    /// Start building a document.
    pub fn builder() -> AclDocumentBuilder {
        AclDocumentBuilder::default()
    }

    /// ACL of one relation.
    pub fn relation(&self, relation: AclRelation) -> &RelationAcl {
        match relation {
            AclRelation::Document => &self.document,
            AclRelation::Share => &self.share,
            AclRelation::Parent => &self.parent,
        }
    }

    /// Raw tokens recorded for a role (possibly empty).
    pub fn tokens(&self, role: AclField) -> &[String] {
        let acl = self.relation(role.relation);
        match role.access {
            Access::Allow => &acl.allow,
            Access::Deny => &acl.deny,
        }
    }

    /// Values as indexed for a role: the tokens, or the sentinel alone.
    pub fn indexed_values(&self, role: AclField, sentinel: &str) -> Vec<String> {
        let tokens = self.tokens(role);
        if tokens.is_empty() {
            vec![sentinel.to_string()]
        } else {
            tokens.to_vec()
        }
    }

    /// Field name → indexed values, for evaluating a filter in memory.
    pub fn field_values(
        &self,
        names: &AclFieldNames,
        sentinel: &str,
    ) -> HashMap<String, Vec<String>> {
        AclField::all()
            .into_iter()
            .map(|role| (names.name(role).to_string(), self.indexed_values(role, sentinel)))
            .collect()
    }

    /// Convert to a Tantivy document for `schema`.
    pub fn to_tantivy(&self, schema: &AclSchema, sentinel: &str) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_text(schema.id, &self.id);
        doc.add_text(schema.body, &self.body);
        for (role, field) in schema.acl().iter() {
            for value in self.indexed_values(role, sentinel) {
                doc.add_text(field, &value);
            }
        }
        doc
    }
}

/// Builder for [`AclDocument`].
#[derive(Debug, Default)]
pub struct AclDocumentBuilder {
    doc: AclDocument,
}

impl AclDocumentBuilder {
    /// Set the identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.doc.id = id.into();
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.doc.body = body.into();
        self
    }

    /// Add allow tokens for a relation.
    pub fn allow<I, S>(mut self, relation: AclRelation, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_mut(relation)
            .allow
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Add deny tokens for a relation.
    pub fn deny<I, S>(mut self, relation: AclRelation, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_mut(relation)
            .deny
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Finish.
    pub fn build(self) -> AclDocument {
        self.doc
    }

    fn relation_mut(&mut self, relation: AclRelation) -> &mut RelationAcl {
        match relation {
            AclRelation::Document => &mut self.doc.document,
            AclRelation::Share => &mut self.doc.share,
            AclRelation::Parent => &mut self.doc.parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_acl::{AclQueryCompiler, TokenSet};

    const S: &str = "__nosecurity__";

    #[test]
    fn test_empty_lists_become_sentinel() {
        let doc = AclDocument::builder()
            .id("d1")
            .allow(AclRelation::Share, ["g1", "g2"])
            .build();
        let role = AclField::new(Access::Allow, AclRelation::Share);
        assert_eq!(doc.indexed_values(role, S), vec!["g1", "g2"]);
        let role = AclField::new(Access::Deny, AclRelation::Share);
        assert_eq!(doc.indexed_values(role, S), vec![S]);
    }

    #[test]
    fn test_field_values_cover_all_six_fields() {
        let doc = AclDocument::builder().id("open").build();
        let values = doc.field_values(&AclFieldNames::default(), S);
        assert_eq!(values.len(), 6);
        assert!(values.values().all(|v| v == &vec![S.to_string()]));
    }

    #[test]
    fn test_unrestricted_document_is_public() {
        let doc = AclDocument::builder().id("open").body("hello").build();
        let values = doc.field_values(&AclFieldNames::default(), S);
        assert!(AclQueryCompiler::default().compile(&TokenSet::new()).matches(&values));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let doc: AclDocument = serde_json::from_str(
            r#"{"id": "d1", "share": {"allow": ["eng"]}}"#,
        )
        .unwrap();
        assert_eq!(doc.share.allow, vec!["eng"]);
        assert!(doc.share.deny.is_empty());
        assert!(doc.document.allow.is_empty());
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_to_tantivy_adds_every_field() {
        let schema = AclSchema::default();
        let doc = AclDocument::builder()
            .id("d1")
            .body("quarterly report")
            .deny(AclRelation::Parent, ["contractors"])
            .build();
        let tantivy_doc = doc.to_tantivy(&schema, S);
        assert_eq!(tantivy_doc.get_all(schema.id).count(), 1);
        for (_, field) in schema.acl().iter() {
            assert_eq!(tantivy_doc.get_all(field).count(), 1);
        }
    }
}
