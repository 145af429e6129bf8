//! Compiled plans and the plan equality checker.
//!
//! A compiled plan is the sequence of step descriptors a traversal compiles
//! to. Every descriptor parameter is stored in canonical text form (id
//! encodings normalized, unordered collections as sorted sets), so plan
//! equality is plain structural equality over descriptors. That makes it an
//! equivalence relation, and the same encoding feeds a stable fingerprint.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

/// Prefix used in serialized plan fingerprints.
pub const PLAN_FINGERPRINT_PREFIX: &str = "fnv1a64:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// `V(...)` / `E(...)`
    Source,
    /// Conjunctive has-filter.
    Has,
    /// `out` / `in` / `both` (vertices or edges).
    Vertex,
    /// `outV` / `inV` / `bothV`.
    EdgeVertex,
    /// `has(key, <value traversal>)`.
    PropertyTraversal,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Source => "source",
            StepKind::Has => "has",
            StepKind::Vertex => "vertex",
            StepKind::EdgeVertex => "edge_vertex",
            StepKind::PropertyTraversal => "property_traversal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CanonicalParam {
    Text(String),
    /// Unordered collection.
    Set(BTreeSet<String>),
}

impl fmt::Display for CanonicalParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalParam::Text(t) => f.write_str(t),
            CanonicalParam::Set(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(item)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepDescriptor {
    kind: StepKind,
    params: BTreeMap<String, CanonicalParam>,
}

impl StepDescriptor {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params
            .insert(name.to_string(), CanonicalParam::Text(value.into()));
        self
    }

    pub fn with_set<I, S>(mut self, name: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.insert(
            name.to_string(),
            CanonicalParam::Set(items.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn param(&self, name: &str) -> Option<&CanonicalParam> {
        self.params.get(name)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &CanonicalParam)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// The canonical descriptor sequence of a compiled traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompiledPlan {
    steps: Vec<StepDescriptor>,
}

impl CompiledPlan {
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(StepDescriptor::kind).collect()
    }

    /// FNV-1a 64-bit digest of the canonical encoding: `"fnv1a64:<16 hex>"`.
    ///
    /// Equal plans always share a fingerprint. It is a cache key, not a
    /// security primitive.
    pub fn fingerprint(&self) -> String {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x00000100000001b3;

        let mut hash = FNV_OFFSET_BASIS;
        for b in self.to_string().as_bytes() {
            hash ^= (*b) as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }

        format!("{PLAN_FINGERPRINT_PREFIX}{hash:016x}")
    }
}

impl fmt::Display for CompiledPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Plan equality: same length, same kind at each position, identical
/// canonical parameters. Descriptors of different kinds never compare equal.
pub fn plans_equal(a: &CompiledPlan, b: &CompiledPlan) -> bool {
    if a.len() != b.len() {
        trace!(left = a.len(), right = b.len(), "plans differ in length");
        return false;
    }
    for (index, (x, y)) in a.steps.iter().zip(&b.steps).enumerate() {
        if x.kind != y.kind {
            trace!(index, left = %x.kind, right = %y.kind, "plans differ in step kind");
            return false;
        }
        if x.params != y.params {
            trace!(index, left = %x, right = %y, "plans differ in step parameters");
            return false;
        }
    }
    true
}
