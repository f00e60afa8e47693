//! ACL filter compilation.
//!
//! Each of the three relations (document, share, parent) carries an allow
//! field and a deny field. A document that records no restriction on a
//! relation holds the sentinel in both fields. For a non-empty token set a
//! relation is passed when
//!
//! ```text
//! ((allow:SENTINEL AND deny:SENTINEL) OR allow:t1 OR allow:t2 ...)
//!     AND NOT deny:t1 AND NOT deny:t2 ...
//! ```
//!
//! and a document is visible only if it passes all three. With no tokens at
//! all, only documents holding the sentinel in all six fields are visible.

use docgate_core::config::AclFieldConfig;

use crate::fields::{AclFieldNames, AclRelation, FieldPair};
use crate::predicate::{AclFilter, Predicate};
use crate::token::TokenSet;

/// Compiles access tokens into an [`AclFilter`]. Pure and total.
#[derive(Debug, Clone)]
pub struct AclQueryCompiler {
    fields: AclFieldNames,
    sentinel: String,
}

impl AclQueryCompiler {
    /// Create a compiler for the given fields and sentinel.
    pub fn new(fields: AclFieldNames, sentinel: impl Into<String>) -> Self {
        Self {
            fields,
            sentinel: sentinel.into(),
        }
    }

    /// Create a compiler from configuration.
    pub fn from_config(config: &AclFieldConfig) -> Self {
        Self::new(AclFieldNames::from_config(config), config.sentinel.clone())
    }

    /// Configured field names.
    pub fn fields(&self) -> &AclFieldNames {
        &self.fields
    }

    /// Reserved "no restriction" value.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Compile the filter for a requester holding `tokens`.
    pub fn compile(&self, tokens: &TokenSet) -> AclFilter {
        if tokens.is_empty() {
            let open_everywhere = self
                .fields
                .all()
                .iter()
                .map(|field| Predicate::equals(*field, &self.sentinel))
                .collect();
            return AclFilter::new(Predicate::And(open_everywhere));
        }

        let relations = AclRelation::ALL
            .iter()
            .map(|relation| self.relation_clause(*relation, tokens))
            .collect();
        AclFilter::new(Predicate::And(relations))
    }

    /// Visibility test for a single relation.
    pub fn relation_clause(&self, relation: AclRelation, tokens: &TokenSet) -> Predicate {
        let pair = self.fields.pair(relation);
        let open = self.open_clause(pair);
        if tokens.is_empty() {
            return open;
        }

        let mut allowed = Vec::with_capacity(tokens.len() + 1);
        allowed.push(open);
        allowed.extend(
            tokens
                .iter()
                .map(|token| Predicate::equals(&pair.allow, token.as_str())),
        );

        let denied = tokens
            .iter()
            .map(|token| Predicate::equals(&pair.deny, token.as_str()))
            .collect();

        Predicate::AndNot {
            include: Box::new(Predicate::Or(allowed)),
            exclude: denied,
        }
    }

    fn open_clause(&self, pair: &FieldPair) -> Predicate {
        Predicate::And(vec![
            Predicate::equals(&pair.allow, &self.sentinel),
            Predicate::equals(&pair.deny, &self.sentinel),
        ])
    }
}

impl Default for AclQueryCompiler {
    fn default() -> Self {
        Self::from_config(&AclFieldConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
