//! Lowering compiled ACL filters to Tantivy queries.
//!
//! | Predicate | Tantivy |
//! |-----------|---------|
//! | `field:value` | `TermQuery` on the raw term |
//! | `And` | `BooleanQuery`, every clause `Must` |
//! | `Or` | `BooleanQuery`, every clause `Should` |
//! | `AndNot` | `Must` include, `MustNot` each exclusion |
//!
//! The lowered filter is wrapped in a zero-score `ConstScoreQuery` so that
//! it restricts eligibility without touching relevance.

use docgate_acl::predicate::{AclFilter, Predicate};
use tantivy::query::{AllQuery, BooleanQuery, ConstScoreQuery, EmptyQuery, Occur, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Schema};
use tantivy::Term;

use crate::error::{Error, Result};

/// Lower a predicate tree. Every field it names must exist in `schema`.
pub fn lower(predicate: &Predicate, schema: &Schema) -> Result<Box<dyn Query>> {
    match predicate {
        Predicate::Equals { field, value } => {
            let field = schema
                .get_field(field)
                .map_err(|_| Error::missing_field(field.as_str()))?;
            Ok(Box::new(TermQuery::new(
                Term::from_field_text(field, value),
                IndexRecordOption::Basic,
            )))
        }
        Predicate::And(children) if children.is_empty() => Ok(Box::new(AllQuery)),
        Predicate::Or(children) if children.is_empty() => Ok(Box::new(EmptyQuery)),
        Predicate::And(children) => boolean(children, Occur::Must, schema),
        Predicate::Or(children) => boolean(children, Occur::Should, schema),
        Predicate::AndNot { include, exclude } => {
            let mut clauses = Vec::with_capacity(exclude.len() + 1);
            clauses.push((Occur::Must, lower(include, schema)?));
            for child in exclude {
                clauses.push((Occur::MustNot, lower(child, schema)?));
            }
            Ok(Box::new(BooleanQuery::new(clauses)))
        }
    }
}

fn boolean(children: &[Predicate], occur: Occur, schema: &Schema) -> Result<Box<dyn Query>> {
    let clauses = children
        .iter()
        .map(|child| Ok((occur, lower(child, schema)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// Lower `filter` into a non-scoring Tantivy query.
pub fn filter_query(filter: &AclFilter, schema: &Schema) -> Result<Box<dyn Query>> {
    let lowered = lower(filter.predicate(), schema)?;
    Ok(Box::new(ConstScoreQuery::new(lowered, 0.0)))
}

/// Conjoin a user query with a lowered filter.
pub fn restrict(user_query: Box<dyn Query>, filter: Box<dyn Query>) -> Box<dyn Query> {
    Box::new(BooleanQuery::new(vec![
        (Occur::Must, user_query),
        (Occur::Must, filter),
    ]))
}
