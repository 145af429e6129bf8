//! Traversal construction: a builder producing a logical plan of [`StepSpec`]s.
//!
//! Each `has*` call appends its own has-step with one container, mirroring
//! the call sequence; folding them together is the optimizer's job
//! (see [`crate::strategy`]).

use crate::container::HasContainer;
use crate::element::ElementKind;
use crate::graph::Direction;
use crate::plan::{StepDescriptor, StepKind};
use crate::predicate::Predicate;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of a value sub-traversal, run against a single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "predicate", rename_all = "snake_case")]
pub enum ValueStep {
    /// String length in characters; non-strings are dropped.
    Length,
    Is(Predicate),
}

/// An anonymous traversal over a property value, e.g. `length().is(gt(3))`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueTraversal {
    steps: Vec<ValueStep>,
}

impl ValueTraversal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self) -> Self {
        self.steps.push(ValueStep::Length);
        self
    }

    pub fn is(mut self, predicate: Predicate) -> Self {
        self.steps.push(ValueStep::Is(predicate));
        self
    }

    pub fn steps(&self) -> &[ValueStep] {
        &self.steps
    }

    /// `Some(p)` when the traversal is exactly `is(p)`.
    pub fn single_predicate(&self) -> Option<&Predicate> {
        match self.steps.as_slice() {
            [ValueStep::Is(p)] => Some(p),
            _ => None,
        }
    }

    /// Run the traversal; `None` means the value was filtered out.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        let mut current = value.clone();
        for step in &self.steps {
            current = match step {
                ValueStep::Length => {
                    let len = current.as_str()?.chars().count();
                    Value::Int(i64::try_from(len).ok()?)
                }
                ValueStep::Is(p) => {
                    if !p.test(&current) {
                        return None;
                    }
                    current
                }
            };
        }
        Some(current)
    }

    pub fn canonical(&self) -> String {
        self.steps
            .iter()
            .map(|s| match s {
                ValueStep::Length => "length".to_string(),
                ValueStep::Is(p) => format!("is({})", p.canonical()),
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for ValueTraversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("__")?;
        for step in &self.steps {
            match step {
                ValueStep::Length => f.write_str(".length()")?,
                ValueStep::Is(p) => write!(f, ".is({p})")?,
            }
        }
        Ok(())
    }
}

/// A step of the logical plan, before it is bound to a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepSpec {
    /// Element selection; empty `ids` selects every element of `kind`.
    Source { kind: ElementKind, ids: Vec<Value> },
    Has { containers: Vec<HasContainer> },
    Vertex {
        direction: Direction,
        edge_labels: Vec<String>,
        emit: ElementKind,
    },
    EdgeVertex { direction: Direction },
    PropertyTraversal { key: String, traversal: ValueTraversal },
}

impl StepSpec {
    pub fn kind(&self) -> StepKind {
        match self {
            StepSpec::Source { .. } => StepKind::Source,
            StepSpec::Has { .. } => StepKind::Has,
            StepSpec::Vertex { .. } => StepKind::Vertex,
            StepSpec::EdgeVertex { .. } => StepKind::EdgeVertex,
            StepSpec::PropertyTraversal { .. } => StepKind::PropertyTraversal,
        }
    }

    /// Descriptor for plan comparison. Identifier operands must already be
    /// canonical (the compiler canonicalizes before describing).
    ///
    /// Source ids are described as a set: `V(2, 1)` equals `V(1, 2)`, and a
    /// repeated id collapses (`V(1, 1)` equals `V(1)`), matching the
    /// deduplicated, store-ordered lookup. Sources with different distinct
    /// ids never compare equal.
    pub fn descriptor(&self) -> StepDescriptor {
        let d = StepDescriptor::new(self.kind());
        match self {
            StepSpec::Source { kind, ids } => d
                .with_text("element", kind.to_string())
                .with_set("ids", ids.iter().map(Value::canonical_key)),
            StepSpec::Has { containers } => {
                d.with_set("containers", containers.iter().map(HasContainer::canonical))
            }
            StepSpec::Vertex {
                direction,
                edge_labels,
                emit,
            } => d
                .with_text("direction", direction.to_string())
                .with_text("emit", emit.to_string())
                .with_set("labels", edge_labels.iter().map(|l| format!("{l:?}"))),
            StepSpec::EdgeVertex { direction } => {
                d.with_text("direction", direction.to_string())
            }
            StepSpec::PropertyTraversal { key, traversal } => d
                .with_text("key", format!("{key:?}"))
                .with_text("traversal", traversal.canonical()),
        }
    }
}

impl fmt::Display for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSpec::Source { kind, ids } => {
                let name = match kind {
                    ElementKind::Vertex => "V",
                    ElementKind::Edge => "E",
                };
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                write!(f, "{name}({})", ids.join(", "))
            }
            StepSpec::Has { containers } => {
                let parts: Vec<String> = containers.iter().map(ToString::to_string).collect();
                write!(f, "HasStep([{}])", parts.join(", "))
            }
            StepSpec::Vertex {
                direction,
                edge_labels,
                emit,
            } => {
                let suffix = if *emit == ElementKind::Edge { "E" } else { "" };
                write!(f, "{direction}{suffix}({})", edge_labels.join(", "))
            }
            StepSpec::EdgeVertex { direction } => write!(f, "{direction}V()"),
            StepSpec::PropertyTraversal { key, traversal } => write!(f, "has({key}, {traversal})"),
        }
    }
}

/// Traversal builder.
///
/// ```
/// use pathsift_core::{Predicate, Traversal};
///
/// let t = Traversal::v().has_label(["person"]).has_where("age", Predicate::gt(30));
/// assert_eq!(t.steps().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    steps: Vec<StepSpec>,
}

impl Traversal {
    /// `g.V()`
    pub fn v() -> Self {
        Self::source(ElementKind::Vertex, Vec::new())
    }

    /// `g.V(id, ...)`
    pub fn v_ids<I, V>(ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::source(ElementKind::Vertex, ids.into_iter().map(Into::into).collect())
    }

    /// `g.E()`
    pub fn e() -> Self {
        Self::source(ElementKind::Edge, Vec::new())
    }

    /// `g.E(id, ...)`
    pub fn e_ids<I, V>(ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::source(ElementKind::Edge, ids.into_iter().map(Into::into).collect())
    }

    fn source(kind: ElementKind, ids: Vec<Value>) -> Self {
        Self {
            steps: vec![StepSpec::Source { kind, ids }],
        }
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn push(mut self, step: StepSpec) -> Self {
        self.steps.push(step);
        self
    }

    fn has_container(self, container: HasContainer) -> Self {
        self.push(StepSpec::Has {
            containers: vec![container],
        })
    }

    /// `has(key)`
    pub fn has(self, key: impl Into<String>) -> Self {
        self.has_container(HasContainer::exists(key))
    }

    /// `has(key, value)`
    pub fn has_value(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.has_container(HasContainer::property_eq(key, value))
    }

    /// `has(key, predicate)`
    pub fn has_where(self, key: impl Into<String>, predicate: Predicate) -> Self {
        self.has_container(HasContainer::property(key, predicate))
    }

    /// `has(label, key, value)`: one step holding a label and a value container.
    pub fn has_labeled(
        self,
        label: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.push(StepSpec::Has {
            containers: vec![
                HasContainer::labels([label]),
                HasContainer::property_eq(key, value),
            ],
        })
    }

    /// `has(key, <value traversal>)`
    pub fn has_traversal(self, key: impl Into<String>, traversal: ValueTraversal) -> Self {
        self.push(StepSpec::PropertyTraversal {
            key: key.into(),
            traversal,
        })
    }

    /// `hasId(id, ...)`
    pub fn has_id<I, V>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.has_container(HasContainer::ids(ids))
    }

    /// `has(T.id, predicate)`
    pub fn has_id_where(self, predicate: Predicate) -> Self {
        self.has_container(HasContainer::id(predicate))
    }

    /// `hasLabel(label, ...)`
    pub fn has_label<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.has_container(HasContainer::labels(labels))
    }

    fn vertex(self, direction: Direction, edge_labels: &[&str], emit: ElementKind) -> Self {
        self.push(StepSpec::Vertex {
            direction,
            edge_labels: edge_labels.iter().map(|l| l.to_string()).collect(),
            emit,
        })
    }

    pub fn out(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::Out, edge_labels, ElementKind::Vertex)
    }

    pub fn in_(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::In, edge_labels, ElementKind::Vertex)
    }

    pub fn both(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::Both, edge_labels, ElementKind::Vertex)
    }

    pub fn out_e(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::Out, edge_labels, ElementKind::Edge)
    }

    pub fn in_e(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::In, edge_labels, ElementKind::Edge)
    }

    pub fn both_e(self, edge_labels: &[&str]) -> Self {
        self.vertex(Direction::Both, edge_labels, ElementKind::Edge)
    }

    pub fn out_v(self) -> Self {
        self.push(StepSpec::EdgeVertex {
            direction: Direction::Out,
        })
    }

    pub fn in_v(self) -> Self {
        self.push(StepSpec::EdgeVertex {
            direction: Direction::In,
        })
    }

    pub fn both_v(self) -> Self {
        self.push(StepSpec::EdgeVertex {
            direction: Direction::Both,
        })
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
