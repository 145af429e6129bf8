//! Element capability: the read surface shared by vertices and edges.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether an element is a vertex or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "vertex"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}

/// Read-only view of a graph element, provided by the backing store.
///
/// A property key may be absent (empty slice), single-valued, or
/// multi-valued; value order is the store's insertion order.
pub trait Element {
    fn id(&self) -> &Value;

    fn label(&self) -> &str;

    fn properties(&self, key: &str) -> &[Value];

    fn kind(&self) -> ElementKind;

    /// First value of `key`, if any.
    fn value(&self, key: &str) -> Option<&Value> {
        self.properties(key).first()
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn id(&self) -> &Value {
        (**self).id()
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn properties(&self, key: &str) -> &[Value] {
        (**self).properties(key)
    }

    fn kind(&self) -> ElementKind {
        (**self).kind()
    }
}

/// An element that owns its data, independent of any store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetachedElement {
    id: Value,
    label: String,
    kind: ElementKind,
    properties: BTreeMap<String, Vec<Value>>,
}

impl DetachedElement {
    pub fn new(kind: ElementKind, id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    pub fn vertex(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self::new(ElementKind::Vertex, id, label)
    }

    pub fn edge(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self::new(ElementKind::Edge, id, label)
    }

    /// Append one value to `key` (repeated calls build a multi-valued property).
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_properties<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.properties
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl Element for DetachedElement {
    fn id(&self) -> &Value {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn properties(&self, key: &str) -> &[Value] {
        self.properties
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }
}
