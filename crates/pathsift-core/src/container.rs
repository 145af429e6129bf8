//! `HasContainer`: one filter condition bound to an element selector.

use crate::element::Element;
use crate::ids::IdCanonicalizer;
use crate::predicate::Predicate;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of an element a container reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "target", content = "key", rename_all = "snake_case")]
pub enum HasTarget {
    Id,
    Label,
    Property(String),
}

impl HasTarget {
    pub fn canonical(&self) -> String {
        match self {
            HasTarget::Id => "~id".to_string(),
            HasTarget::Label => "~label".to_string(),
            HasTarget::Property(key) => format!("{key:?}"),
        }
    }
}

impl fmt::Display for HasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HasTarget::Id => write!(f, "~id"),
            HasTarget::Label => write!(f, "~label"),
            HasTarget::Property(key) => write!(f, "{key}"),
        }
    }
}

/// A target plus an optional predicate.
///
/// With no predicate the container is an existence test: the target must
/// resolve to at least one value. With a predicate, at least one resolved
/// value must satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HasContainer {
    target: HasTarget,
    predicate: Option<Predicate>,
}

impl HasContainer {
    pub fn new(target: HasTarget, predicate: Option<Predicate>) -> Self {
        Self { target, predicate }
    }

    /// `has(key)`
    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(HasTarget::Property(key.into()), None)
    }

    /// `has(key, predicate)`
    pub fn property(key: impl Into<String>, predicate: Predicate) -> Self {
        Self::new(HasTarget::Property(key.into()), Some(predicate))
    }

    /// `has(key, value)`, sugar for `has(key, eq(value))`.
    pub fn property_eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::property(key, Predicate::eq(value))
    }

    /// `has(T.id, predicate)`
    pub fn id(predicate: Predicate) -> Self {
        Self::new(HasTarget::Id, Some(predicate))
    }

    /// `hasId(a, b, ...)`
    pub fn ids<I, V>(ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::id(one_or_within(ids))
    }

    /// `has(T.label, predicate)`
    pub fn label(predicate: Predicate) -> Self {
        Self::new(HasTarget::Label, Some(predicate))
    }

    /// `hasLabel(a, b, ...)`
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::label(one_or_within(labels.into_iter().map(Into::into)))
    }

    pub fn target(&self) -> &HasTarget {
        &self.target
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// Copy of this container with identifier operands canonicalized.
    /// Label and property containers are returned unchanged.
    ///
    /// Equality and membership operands take the canonical form; ordering
    /// and range operands take the ordering key, so an id range keeps the
    /// order it was validated in.
    pub fn canonicalized(&self, ids: &dyn IdCanonicalizer) -> Self {
        match (&self.target, &self.predicate) {
            (HasTarget::Id, Some(p)) => Self {
                target: HasTarget::Id,
                predicate: Some(
                    p.map_operands_keyed(&|v| ids.canonicalize(v), &|v| ids.ordering_key(v)),
                ),
            },
            _ => self.clone(),
        }
    }

    /// Test an element, canonicalizing identifier operands on the fly.
    pub fn test<E: Element + ?Sized>(&self, element: &E, ids: &dyn IdCanonicalizer) -> bool {
        match (&self.target, &self.predicate) {
            (HasTarget::Id, Some(_)) => self.canonicalized(ids).test_canonical(element, ids),
            _ => self.test_canonical(element, ids),
        }
    }

    /// Test an element, assuming identifier operands are already canonical
    /// under `ids` (see [`HasContainer::canonicalized`]).
    pub fn test_canonical<E: Element + ?Sized>(
        &self,
        element: &E,
        ids: &dyn IdCanonicalizer,
    ) -> bool {
        match &self.target {
            HasTarget::Id => match &self.predicate {
                None => true,
                Some(p) => {
                    let id = element.id();
                    p.test_keyed(&ids.canonicalize(id), &ids.ordering_key(id))
                }
            },
            HasTarget::Label => match &self.predicate {
                None => true,
                Some(p) => p.test(&Value::from(element.label())),
            },
            HasTarget::Property(key) => {
                let values = element.properties(key);
                match &self.predicate {
                    None => !values.is_empty(),
                    Some(p) => values.iter().any(|v| p.test(v)),
                }
            }
        }
    }

    /// Canonical `(target, predicate)` key; identifier operands must already
    /// be canonical.
    pub fn canonical(&self) -> String {
        match &self.predicate {
            None => format!("{}?", self.target.canonical()),
            Some(p) => format!("{}={}", self.target.canonical(), p.canonical()),
        }
    }
}

fn one_or_within<I, V>(values: I) -> Predicate
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let mut values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.len() == 1 {
        if let Some(only) = values.pop() {
            return Predicate::Eq(only);
        }
    }
    Predicate::Within(values)
}

impl fmt::Display for HasContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            None => write!(f, "has({})", self.target),
            Some(p) => write!(f, "has({}, {p})", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::DetachedElement;
    use crate::ids::{NativeIds, NumericIds, TextualIds};

    fn marko() -> DetachedElement {
        DetachedElement::vertex(1, "person")
            .with_property("name", "marko")
            .with_property("age", 29)
            .with_property("location", "san diego")
            .with_property("location", "santa cruz")
    }

    #[test]
    fn existence_requires_a_value() {
        let e = marko();
        assert!(HasContainer::exists("name").test(&e, &NativeIds));
        assert!(!HasContainer::exists("circumference").test(&e, &NativeIds));
    }

    #[test]
    fn multi_valued_properties_are_existential() {
        let e = marko();
        assert!(HasContainer::property_eq("location", "santa cruz").test(&e, &NativeIds));
        assert!(!HasContainer::property_eq("location", "brussels").test(&e, &NativeIds));
        let not_san_diego = HasContainer::property("location", Predicate::neq("san diego"));
        assert!(not_san_diego.test(&e, &NativeIds));
    }

    #[test]
    fn id_containers_accept_textual_ids_under_numeric_canonicalization() {
        let e = marko();
        assert!(HasContainer::ids(["1"]).test(&e, &NumericIds));
        assert!(HasContainer::ids([Value::from("2"), Value::Int(1)]).test(&e, &NumericIds));
        assert!(!HasContainer::ids(["1"]).test(&e, &NativeIds));
        assert!(HasContainer::id(Predicate::lt(3)).test(&e, &NumericIds));
    }

    #[test]
    fn textual_id_ranges_keep_numeric_order() {
        let e = DetachedElement::edge(9, "created");
        let range = HasContainer::id(Predicate::between(7, 11).unwrap());
        assert!(range.test(&e, &TextualIds));
        assert_eq!(
            range.canonicalized(&TextualIds).predicate(),
            Some(&Predicate::between(7, 11).unwrap())
        );
        let later = HasContainer::id(Predicate::gt("10"));
        assert!(later.test(&DetachedElement::edge(11, "knows"), &TextualIds));
        assert!(HasContainer::ids([9]).test(&e, &TextualIds));
        assert_eq!(
            HasContainer::ids([9]).canonicalized(&TextualIds).predicate(),
            Some(&Predicate::eq("9"))
        );
    }

    #[test]
    fn label_lists_become_membership_tests() {
        let e = marko();
        let c = HasContainer::labels(["person", "software", "blah"]);
        assert!(matches!(c.predicate(), Some(Predicate::Within(xs)) if xs.len() == 3));
        assert!(c.test(&e, &NativeIds));
        assert!(!HasContainer::labels(["software"]).test(&e, &NativeIds));
        assert_eq!(
            HasContainer::labels(["person"]).predicate(),
            Some(&Predicate::eq("person"))
        );
    }

    #[test]
    fn canonical_key_distinguishes_targets() {
        let by_label = HasContainer::labels(["name"]);
        let by_key = HasContainer::exists("name");
        assert_ne!(by_label.canonical(), by_key.canonical());
        assert_eq!(by_key.to_string(), "has(name)");
    }
}
