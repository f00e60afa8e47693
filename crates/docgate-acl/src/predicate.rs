//! Backend-neutral boolean predicates over field-equality tests.
//!
//! [`Predicate`] is the tree the compiler emits. Search backends lower it to
//! their native query types; [`Predicate::matches`] evaluates it directly
//! against in-memory field values.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Read access to a document's (multi-valued) field contents.
pub trait FieldValues {
    /// Whether `field` holds `value` among its values.
    fn has_value(&self, field: &str, value: &str) -> bool;
}

impl FieldValues for HashMap<String, Vec<String>> {
    fn has_value(&self, field: &str, value: &str) -> bool {
        self.get(field)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }
}

impl FieldValues for HashMap<&str, Vec<&str>> {
    fn has_value(&self, field: &str, value: &str) -> bool {
        self.get(field)
            .is_some_and(|values| values.contains(&value))
    }
}

/// Boolean predicate tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// `field` contains `value`.
    Equals {
        /// Field name.
        field: String,
        /// Exact value.
        value: String,
    },
    /// Every child holds. Empty is true.
    And(Vec<Predicate>),
    /// At least one child holds. Empty is false.
    Or(Vec<Predicate>),
    /// `include` holds and no `exclude` child holds.
    AndNot {
        /// Required part.
        include: Box<Predicate>,
        /// Disqualifying parts.
        exclude: Vec<Predicate>,
    },
}

impl Predicate {
    /// Equality test.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate against a document.
    pub fn matches<D: FieldValues + ?Sized>(&self, doc: &D) -> bool {
        match self {
            Predicate::Equals { field, value } => doc.has_value(field, value),
            Predicate::And(children) => children.iter().all(|c| c.matches(doc)),
            Predicate::Or(children) => children.iter().any(|c| c.matches(doc)),
            Predicate::AndNot { include, exclude } => {
                include.matches(doc) && !exclude.iter().any(|c| c.matches(doc))
            }
        }
    }

    /// Number of equality tests in the tree.
    pub fn term_count(&self) -> usize {
        match self {
            Predicate::Equals { .. } => 1,
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().map(Predicate::term_count).sum()
            }
            Predicate::AndNot { include, exclude } => {
                include.term_count() + exclude.iter().map(Predicate::term_count).sum::<usize>()
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { field, value } => write!(f, "{field}:{value}"),
            Predicate::And(children) => write_joined(f, children, " AND "),
            Predicate::Or(children) => write_joined(f, children, " OR "),
            Predicate::AndNot { include, exclude } => {
                write!(f, "({include}")?;
                for child in exclude {
                    write!(f, " AND NOT {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

/// A compiled, non-scoring eligibility filter.
///
/// Its truth value decides whether a document may be returned; it never
/// contributes to ranking. Combine it with the user's query by conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclFilter {
    predicate: Predicate,
}

impl AclFilter {
    /// Wrap a predicate as a filter.
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// The underlying predicate tree.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Whether a document passes the filter.
    pub fn matches<D: FieldValues + ?Sized>(&self, doc: &D) -> bool {
        self.predicate.matches(doc)
    }
}

impl fmt::Display for AclFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.predicate, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(
        pairs: Vec<(&'static str, Vec<&'static str>)>,
    ) -> HashMap<&'static str, Vec<&'static str>> {
        pairs.into_iter().collect()
    }

    #[test]
    fn test_equals_multi_valued() {
        let d = doc(vec![("tags", vec!["a", "b"])]);
        assert!(Predicate::equals("tags", "b").matches(&d));
        assert!(!Predicate::equals("tags", "c").matches(&d));
        assert!(!Predicate::equals("other", "a").matches(&d));
    }

    #[test]
    fn test_empty_connectives() {
        let d = doc(vec![]);
        assert!(Predicate::And(vec![]).matches(&d));
        assert!(!Predicate::Or(vec![]).matches(&d));
    }

    #[test]
    fn test_and_not() {
        let d = doc(vec![("allow", vec!["g1"]), ("deny", vec!["g2"])]);
        let p = Predicate::AndNot {
            include: Box::new(Predicate::equals("allow", "g1")),
            exclude: vec![Predicate::equals("deny", "g2")],
        };
        assert!(!p.matches(&d));

        let p = Predicate::AndNot {
            include: Box::new(Predicate::equals("allow", "g1")),
            exclude: vec![Predicate::equals("deny", "g3")],
        };
        assert!(p.matches(&d));
    }

    #[test]
    fn test_display() {
        let p = Predicate::AndNot {
            include: Box::new(Predicate::Or(vec![
                Predicate::equals("a", "1"),
                Predicate::equals("a", "2"),
            ])),
            exclude: vec![Predicate::equals("d", "1")],
        };
        assert_eq!(p.to_string(), "((a:1 OR a:2) AND NOT d:1)");
        assert_eq!(p.term_count(), 3);
    }

    #[test]
    fn test_owned_field_values() {
        let mut d: HashMap<String, Vec<String>> = HashMap::new();
        d.insert("f".to_string(), vec!["v".to_string()]);
        assert!(AclFilter::new(Predicate::equals("f", "v")).matches(&d));
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(Predicate::And(vec![Predicate::equals("f", "v")])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"and": [{"equals": {"field": "f", "value": "v"}}]})
        );
    }
}
