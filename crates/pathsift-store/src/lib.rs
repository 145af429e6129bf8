//! In-memory property graph for Pathsift
//!
//! A reference [`Graph`] provider with:
//! 1. **String Interning**: labels and property keys stored once, referenced by `StrId`
//! 2. **Columnar Storage**: id, label and per-key property columns
//! 3. **Label Bitmaps**: Roaring bitmaps of element indices per label
//! 4. **Adjacency Indexes**: per-vertex outgoing/incoming edge lists in insertion order
//!
//! Vertices and edges share one id space, assigned from 1 in insertion order,
//! and ids are matched numerically (`"1"`, `1` and `1.0` name the same
//! element).

pub mod datasets;
pub mod interner;

use ahash::AHashMap;
use anyhow::{anyhow, Result};
use pathsift_core::{
    Direction, Element, ElementKind, EngineConfig, Graph, IdCanonicalizer, NumericIds,
    TraversalCompiler, Value,
};
use roaring::RoaringBitmap;
use std::fmt;
use std::sync::Arc;

pub use interner::{StrId, StringInterner};

// ============================================================================
// Element Storage (Columnar)
// ============================================================================

/// Columnar element storage, used for both vertices and edges.
#[derive(Debug, Default)]
pub struct ElementStore {
    /// Id column: element index -> id
    ids: Vec<Value>,
    /// Label column: element index -> label
    labels: Vec<StrId>,
    /// Property columns: key -> (element index -> values, in insertion order)
    props: AHashMap<StrId, AHashMap<u32, Vec<Value>>>,
    /// Label index: label -> bitmap of element indices
    label_index: AHashMap<StrId, RoaringBitmap>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add an element; repeated keys make a multi-valued property.
    pub fn add(&mut self, id: Value, label: StrId, props: Vec<(StrId, Value)>) -> u32 {
        let index = self.ids.len() as u32;
        self.ids.push(id);
        self.labels.push(label);

        self.label_index.entry(label).or_default().insert(index);

        for (key, value) in props {
            self.props
                .entry(key)
                .or_default()
                .entry(index)
                .or_default()
                .push(value);
        }

        index
    }

    /// Element indices carrying `label`.
    pub fn by_label(&self, label: StrId) -> Option<&RoaringBitmap> {
        self.label_index.get(&label)
    }

    pub fn id(&self, index: u32) -> Option<&Value> {
        self.ids.get(index as usize)
    }

    pub fn label(&self, index: u32) -> Option<StrId> {
        self.labels.get(index as usize).copied()
    }

    pub fn values(&self, index: u32, key: StrId) -> &[Value] {
        self.props
            .get(&key)
            .and_then(|column| column.get(&index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// Property Graph
// ============================================================================

#[derive(Debug, Default)]
pub struct PropertyGraph {
    interner: StringInterner,
    vertices: ElementStore,
    edges: ElementStore,
    /// Edge index -> (tail vertex index, head vertex index)
    endpoints: Vec<(u32, u32)>,
    /// Forward index: vertex index -> outgoing edge indices
    forward_index: AHashMap<u32, Vec<u32>>,
    /// Backward index: vertex index -> incoming edge indices
    backward_index: AHashMap<u32, Vec<u32>>,
    /// Id index: numeric id -> (kind, element index)
    id_index: AHashMap<i64, (ElementKind, u32)>,
    next_id: i64,
}

impl PropertyGraph {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    fn intern_props(&mut self, props: Vec<(&str, Value)>) -> Vec<(StrId, Value)> {
        props
            .into_iter()
            .map(|(k, v)| (self.interner.intern(k), v))
            .collect()
    }

    /// Add a vertex, returning its id.
    pub fn add_vertex(&mut self, label: &str, props: Vec<(&str, Value)>) -> i64 {
        let id = self.allocate_id();
        let label = self.interner.intern(label);
        let props = self.intern_props(props);
        let index = self.vertices.add(Value::Int(id), label, props);
        self.id_index.insert(id, (ElementKind::Vertex, index));
        id
    }

    /// Add an edge `tail -label-> head`, returning its id.
    pub fn add_edge(
        &mut self,
        label: &str,
        tail: i64,
        head: i64,
        props: Vec<(&str, Value)>,
    ) -> Result<i64> {
        let tail_index = self
            .vertex_index(tail)
            .ok_or_else(|| anyhow!("unknown tail vertex id {tail} for edge {label}"))?;
        let head_index = self
            .vertex_index(head)
            .ok_or_else(|| anyhow!("unknown head vertex id {head} for edge {label}"))?;

        let id = self.allocate_id();
        let label = self.interner.intern(label);
        let props = self.intern_props(props);
        let index = self.edges.add(Value::Int(id), label, props);
        self.endpoints.push((tail_index, head_index));
        self.forward_index.entry(tail_index).or_default().push(index);
        self.backward_index.entry(head_index).or_default().push(index);
        self.id_index.insert(id, (ElementKind::Edge, index));
        Ok(id)
    }

    fn vertex_index(&self, id: i64) -> Option<u32> {
        match self.id_index.get(&id) {
            Some((ElementKind::Vertex, index)) => Some(*index),
            _ => None,
        }
    }

    fn handle(&self, kind: ElementKind, index: u32) -> GraphElement<'_> {
        GraphElement {
            graph: self,
            kind,
            index,
        }
    }

    fn store(&self, kind: ElementKind) -> &ElementStore {
        match kind {
            ElementKind::Vertex => &self.vertices,
            ElementKind::Edge => &self.edges,
        }
    }

    pub fn vertex(&self, id: i64) -> Option<GraphElement<'_>> {
        self.vertex_index(id)
            .map(|index| self.handle(ElementKind::Vertex, index))
    }

    pub fn edge(&self, id: i64) -> Option<GraphElement<'_>> {
        match self.id_index.get(&id) {
            Some((ElementKind::Edge, index)) => Some(self.handle(ElementKind::Edge, *index)),
            _ => None,
        }
    }

    /// Elements of `kind` carrying `label`, in insertion order.
    pub fn with_label(&self, kind: ElementKind, label: &str) -> Vec<GraphElement<'_>> {
        self.interner
            .id_of(label)
            .and_then(|label| self.store(kind).by_label(label))
            .map(|bitmap| bitmap.iter().map(|i| self.handle(kind, i)).collect())
            .unwrap_or_default()
    }

    /// A compiler bound to this graph's id matching.
    pub fn compiler(&self, config: EngineConfig) -> TraversalCompiler {
        TraversalCompiler::for_graph(self, config)
    }

    /// Elements of `kind` named by `ids`, deduplicated, in insertion order.
    fn lookup(&self, kind: ElementKind, ids: &[Value]) -> Vec<GraphElement<'_>> {
        let mut found = RoaringBitmap::new();
        for id in ids {
            let Some(id) = NumericIds.canonicalize(id).as_i64() else {
                continue;
            };
            if let Some((k, index)) = self.id_index.get(&id) {
                if *k == kind {
                    found.insert(*index);
                }
            }
        }
        found.iter().map(|index| self.handle(kind, index)).collect()
    }

    fn edge_labels(&self, edge_labels: &[String]) -> Option<Vec<StrId>> {
        if edge_labels.is_empty() {
            return None;
        }
        Some(
            edge_labels
                .iter()
                .filter_map(|l| self.interner.id_of(l))
                .collect(),
        )
    }
}

// ============================================================================
// Element Handles
// ============================================================================

/// A borrowed view of one vertex or edge.
#[derive(Clone, Copy)]
pub struct GraphElement<'g> {
    graph: &'g PropertyGraph,
    kind: ElementKind,
    index: u32,
}

impl<'g> GraphElement<'g> {
    fn store(&self) -> &'g ElementStore {
        self.graph.store(self.kind)
    }

    /// `(tail, head)` for edges.
    pub fn endpoints(&self) -> Option<(GraphElement<'g>, GraphElement<'g>)> {
        if self.kind != ElementKind::Edge {
            return None;
        }
        let (tail, head) = *self.graph.endpoints.get(self.index as usize)?;
        Some((
            self.graph.handle(ElementKind::Vertex, tail),
            self.graph.handle(ElementKind::Vertex, head),
        ))
    }
}

static NULL_ID: Value = Value::Null;

impl Element for GraphElement<'_> {
    fn id(&self) -> &Value {
        self.store().id(self.index).unwrap_or(&NULL_ID)
    }

    fn label(&self) -> &str {
        self.store()
            .label(self.index)
            .and_then(|label| self.graph.interner.lookup(label))
            .unwrap_or("")
    }

    fn properties(&self, key: &str) -> &[Value] {
        match self.graph.interner.id_of(key) {
            Some(key) => self.store().values(self.index, key),
            None => &[],
        }
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }
}

impl PartialEq for GraphElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph)
            && self.kind == other.kind
            && self.index == other.index
    }
}

impl Eq for GraphElement<'_> {}

impl fmt::Display for GraphElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.endpoints() {
            Some((tail, head)) => write!(
                f,
                "e[{}][{}-{}->{}]",
                self.id(),
                tail.id(),
                self.label(),
                head.id()
            ),
            None => write!(f, "v[{}]", self.id()),
        }
    }
}

impl fmt::Debug for GraphElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ============================================================================
// Graph Provider
// ============================================================================

impl<'g> Graph<'g> for PropertyGraph {
    type Element = GraphElement<'g>;

    fn vertices(&'g self) -> Box<dyn Iterator<Item = GraphElement<'g>> + 'g> {
        let n = self.vertices.len() as u32;
        Box::new((0..n).map(move |i| self.handle(ElementKind::Vertex, i)))
    }

    fn edges(&'g self) -> Box<dyn Iterator<Item = GraphElement<'g>> + 'g> {
        let n = self.edges.len() as u32;
        Box::new((0..n).map(move |i| self.handle(ElementKind::Edge, i)))
    }

    fn vertices_by_id(&'g self, ids: &[Value]) -> Vec<GraphElement<'g>> {
        self.lookup(ElementKind::Vertex, ids)
    }

    fn edges_by_id(&'g self, ids: &[Value]) -> Vec<GraphElement<'g>> {
        self.lookup(ElementKind::Edge, ids)
    }

    fn adjacent(
        &'g self,
        element: &GraphElement<'g>,
        direction: Direction,
        edge_labels: &[String],
        emit: ElementKind,
    ) -> Vec<GraphElement<'g>> {
        if element.kind != ElementKind::Vertex || !std::ptr::eq(element.graph, self) {
            return Vec::new();
        }
        let wanted = self.edge_labels(edge_labels);
        let accepts = |edge: u32| match &wanted {
            None => true,
            Some(labels) => self
                .edges
                .label(edge)
                .is_some_and(|label| labels.contains(&label)),
        };

        let mut out = Vec::new();
        let mut follow = |index: &AHashMap<u32, Vec<u32>>, far: fn((u32, u32)) -> u32| {
            for &edge in index.get(&element.index).into_iter().flatten() {
                if !accepts(edge) {
                    continue;
                }
                match emit {
                    ElementKind::Edge => out.push(self.handle(ElementKind::Edge, edge)),
                    ElementKind::Vertex => {
                        if let Some(&ends) = self.endpoints.get(edge as usize) {
                            out.push(self.handle(ElementKind::Vertex, far(ends)));
                        }
                    }
                }
            }
        };
        if matches!(direction, Direction::Out | Direction::Both) {
            follow(&self.forward_index, |(_, head)| head);
        }
        if matches!(direction, Direction::In | Direction::Both) {
            follow(&self.backward_index, |(tail, _)| tail);
        }
        out
    }

    fn edge_vertices(
        &'g self,
        edge: &GraphElement<'g>,
        direction: Direction,
    ) -> Vec<GraphElement<'g>> {
        let Some((tail, head)) = edge.endpoints() else {
            return Vec::new();
        };
        match direction {
            Direction::Out => vec![tail],
            Direction::In => vec![head],
            Direction::Both => vec![tail, head],
        }
    }

    fn id_canonicalizer(&self) -> Arc<dyn IdCanonicalizer> {
        Arc::new(NumericIds)
    }
}
