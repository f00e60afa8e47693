//! Tantivy schema support for ACL fields.
//!
//! The six ACL fields are raw (`STRING`) multi-valued fields: tokens are
//! indexed verbatim so equality tests behave exactly like the in-memory
//! predicate. `STORED` is set so hits can be inspected.
//!
//! # Fields
//!
//! | Field | Type | Purpose |
//! |-------|------|---------|
//! | `id` | STRING \| STORED | Unique identifier |
//! | `body` | TEXT \| STORED | Searchable content |
//! | `allow_token_document` … `deny_token_parent` | STRING \| STORED | ACL tokens |

use docgate_acl::fields::{Access, AclField, AclFieldNames, AclRelation};
use tantivy::schema::{Field, Schema, SchemaBuilder, STORED, STRING, TEXT};

use crate::error::{Error, Result};

/// Handles of the six ACL fields inside a schema.
#[derive(Debug, Clone)]
pub struct AclFields {
    names: AclFieldNames,
    // Same order as `AclFieldNames::all`.
    fields: [Field; 6],
}

impl AclFields {
    /// Add the ACL fields to a schema under construction.
    pub fn add_to(builder: &mut SchemaBuilder, names: &AclFieldNames) -> Self {
        let fields = names
            .all()
            .map(|name| builder.add_text_field(name, STRING | STORED));
        Self {
            names: names.clone(),
            fields,
        }
    }

    /// Locate the ACL fields in an existing schema.
    ///
    /// Fails with [`Error::MissingField`] naming the first absent field.
    pub fn from_schema(schema: &Schema, names: &AclFieldNames) -> Result<Self> {
        let mut fields = Vec::with_capacity(6);
        for name in names.all() {
            let field = schema
                .get_field(name)
                .map_err(|_| Error::missing_field(name))?;
            fields.push(field);
        }
        let fields: [Field; 6] = fields
            .try_into()
            .map_err(|_| Error::missing_field("<acl>"))?;
        Ok(Self {
            names: names.clone(),
            fields,
        })
    }

    /// Configured names.
    pub fn names(&self) -> &AclFieldNames {
        &self.names
    }

    /// Field handle for a role.
    pub fn field(&self, role: AclField) -> Field {
        self.fields[slot(role)]
    }

    /// Field handle by configured name.
    pub fn by_name(&self, name: &str) -> Option<Field> {
        self.names
            .all()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.fields[i])
    }

    /// All six handles paired with their roles.
    pub fn iter(&self) -> impl Iterator<Item = (AclField, Field)> + '_ {
        AclField::all()
            .into_iter()
            .map(move |role| (role, self.field(role)))
    }
}

fn slot(role: AclField) -> usize {
    let relation = match role.relation {
        AclRelation::Document => 0,
        AclRelation::Share => 1,
        AclRelation::Parent => 2,
    };
    let access = match role.access {
        Access::Allow => 0,
        Access::Deny => 1,
    };
    relation * 2 + access
}

/// Ready-made schema: identity, body text, and the ACL fields.
#[derive(Debug, Clone)]
pub struct AclSchema {
    schema: Schema,
    /// Unique document identifier.
    pub id: Field,
    /// Searchable content.
    pub body: Field,
    acl: AclFields,
}

impl AclSchema {
    /// Build the schema for the given ACL field names.
    pub fn build(names: &AclFieldNames) -> Self {
        let mut builder = SchemaBuilder::new();
        let id = builder.add_text_field("id", STRING | STORED);
        let body = builder.add_text_field("body", TEXT | STORED);
        let acl = AclFields::add_to(&mut builder, names);
        Self {
            schema: builder.build(),
            id,
            body,
            acl,
        }
    }

    /// The Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// ACL field handles.
    pub fn acl(&self) -> &AclFields {
        &self.acl
    }
}

impl Default for AclSchema {
    fn default() -> Self {
        Self::build(&AclFieldNames::default())
    }
}
