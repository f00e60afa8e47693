//! ACL field roles and their configured names.

use std::fmt;

use docgate_core::config::AclFieldConfig;

/// One of the three independent ACL axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclRelation {
    /// ACL attached to the document itself.
    Document,
    /// ACL of the share the document lives on.
    Share,
    /// ACL inherited from the containing object.
    Parent,
}

impl AclRelation {
    /// All relations, in compilation order.
    pub const ALL: [AclRelation; 3] = [Self::Document, Self::Share, Self::Parent];

    /// Field-name suffix for this relation.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Share => "share",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for AclRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Allow or deny side of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Presenting a matching token grants visibility.
    Allow,
    /// Presenting a matching token revokes visibility.
    Deny,
}

/// A field role: one of six (access, relation) combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AclField {
    /// Allow or deny.
    pub access: Access,
    /// Which relation.
    pub relation: AclRelation,
}

impl AclField {
    /// Shorthand constructor.
    pub fn new(access: Access, relation: AclRelation) -> Self {
        Self { access, relation }
    }

    /// All six roles, allow before deny, relations in compilation order.
    pub fn all() -> [AclField; 6] {
        let mut roles = [Self::new(Access::Allow, AclRelation::Document); 6];
        for (i, relation) in AclRelation::ALL.into_iter().enumerate() {
            roles[2 * i] = Self::new(Access::Allow, relation);
            roles[2 * i + 1] = Self::new(Access::Deny, relation);
        }
        roles
    }
}

/// Allow/deny field names for one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    /// Allow field name.
    pub allow: String,
    /// Deny field name.
    pub deny: String,
}

/// Configured names of all six ACL fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFieldNames {
    document: FieldPair,
    share: FieldPair,
    parent: FieldPair,
}

impl AclFieldNames {
    /// Build names as `prefix + relation suffix`.
    pub fn with_prefixes(allow_prefix: &str, deny_prefix: &str) -> Self {
        let pair = |relation: AclRelation| FieldPair {
            allow: format!("{allow_prefix}{}", relation.suffix()),
            deny: format!("{deny_prefix}{}", relation.suffix()),
        };
        Self {
            document: pair(AclRelation::Document),
            share: pair(AclRelation::Share),
            parent: pair(AclRelation::Parent),
        }
    }

    /// Build names from configuration.
    pub fn from_config(config: &AclFieldConfig) -> Self {
        Self::with_prefixes(&config.allow_prefix, &config.deny_prefix)
    }

    /// Field pair for a relation.
    pub fn pair(&self, relation: AclRelation) -> &FieldPair {
        match relation {
            AclRelation::Document => &self.document,
            AclRelation::Share => &self.share,
            AclRelation::Parent => &self.parent,
        }
    }

    /// Field name for a role.
    pub fn name(&self, field: AclField) -> &str {
        let pair = self.pair(field.relation);
        match field.access {
            Access::Allow => &pair.allow,
            Access::Deny => &pair.deny,
        }
    }

    /// All six names, allow before deny, relations in compilation order.
    pub fn all(&self) -> [&str; 6] {
        [
            &self.document.allow,
            &self.document.deny,
            &self.share.allow,
            &self.share.deny,
            &self.parent.allow,
            &self.parent.deny,
        ]
    }
}

impl Default for AclFieldNames {
    fn default() -> Self {
        Self::from_config(&AclFieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = AclFieldNames::default();
        assert_eq!(
            names.all(),
            [
                "allow_token_document",
                "deny_token_document",
                "allow_token_share",
                "deny_token_share",
                "allow_token_parent",
                "deny_token_parent",
            ]
        );
    }

    #[test]
    fn test_names_match_config_listing() {
        let config = AclFieldConfig::default();
        let names = AclFieldNames::from_config(&config);
        let listed: Vec<&str> = names.all().to_vec();
        assert_eq!(listed, config.field_names());
    }

    #[test]
    fn test_name_by_role() {
        let names = AclFieldNames::with_prefixes("a_", "d_");
        assert_eq!(
            names.name(AclField::new(Access::Allow, AclRelation::Share)),
            "a_share"
        );
        assert_eq!(
            names.name(AclField::new(Access::Deny, AclRelation::Parent)),
            "d_parent"
        );
    }

    #[test]
    fn test_role_order_matches_name_order() {
        let names = AclFieldNames::default();
        let by_role: Vec<&str> = AclField::all().iter().map(|r| names.name(*r)).collect();
        assert_eq!(by_role, names.all().to_vec());
    }

    #[test]
    fn test_relation_display() {
        let shown: Vec<String> = AclRelation::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(shown, vec!["document", "share", "parent"]);
    }
}
