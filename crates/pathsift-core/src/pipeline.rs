//! Binding a compiled step list to a graph as a pull pipeline.

use crate::element::{Element, ElementKind};
use crate::graph::Graph;
use crate::has_step::HasStep;
use crate::ids::IdCanonicalizer;
use crate::plan::StepKind;
use crate::step::{BoxedStep, FilterStep, FlatMapStep, StartStep, Step};
use crate::traversal::StepSpec;
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;

/// A lazily evaluated traversal. Nothing is read from the graph until the
/// first pull.
pub struct Pipeline<'g, E> {
    head: BoxedStep<'g, E>,
    kinds: Vec<StepKind>,
}

impl<'g, E: Element + Clone + 'g> Pipeline<'g, E> {
    pub(crate) fn assemble<G>(
        graph: &'g G,
        steps: &[StepSpec],
        ids: Arc<dyn IdCanonicalizer>,
    ) -> Self
    where
        G: Graph<'g, Element = E>,
    {
        let mut rest = steps;
        let mut head: BoxedStep<'g, E> = match steps.first() {
            Some(StepSpec::Source { kind, ids: wanted }) => {
                rest = &steps[1..];
                Box::new(StartStep::new(select(graph, *kind, wanted, ids.as_ref())))
            }
            // No source: nothing to traverse.
            _ => Box::new(StartStep::new(std::iter::empty::<E>())),
        };
        for spec in rest {
            head = stage(graph, head, spec, &ids);
        }

        let kinds: Vec<StepKind> = steps.iter().map(StepSpec::kind).collect();
        debug!(kinds = ?kinds, ids = ids.name(), "assembled pipeline");
        Self { head, kinds }
    }

    /// Whether another element is available; buffers it if so.
    pub fn has_next(&mut self) -> bool {
        self.head.has_next()
    }

    pub fn step_kinds(&self) -> &[StepKind] {
        &self.kinds
    }
}

impl<E> Iterator for Pipeline<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        Step::next(&mut self.head)
    }
}

/// Source selection. Id lookups are re-checked under `ids` so that a source
/// and an equivalent id filter always agree.
fn select<'g, G>(
    graph: &'g G,
    kind: ElementKind,
    wanted: &[Value],
    ids: &dyn IdCanonicalizer,
) -> Box<dyn Iterator<Item = G::Element> + 'g>
where
    G: Graph<'g>,
{
    if wanted.is_empty() {
        return match kind {
            ElementKind::Vertex => graph.vertices(),
            ElementKind::Edge => graph.edges(),
        };
    }
    let found = match kind {
        ElementKind::Vertex => graph.vertices_by_id(wanted),
        ElementKind::Edge => graph.edges_by_id(wanted),
    };
    let found: Vec<G::Element> = found
        .into_iter()
        .filter(|e| {
            let id = ids.canonicalize(e.id());
            wanted.iter().any(|w| *w == id)
        })
        .collect();
    Box::new(found.into_iter())
}

fn stage<'g, G>(
    graph: &'g G,
    upstream: BoxedStep<'g, G::Element>,
    spec: &StepSpec,
    ids: &Arc<dyn IdCanonicalizer>,
) -> BoxedStep<'g, G::Element>
where
    G: Graph<'g>,
{
    match spec {
        StepSpec::Source { kind, ids: wanted } => {
            let (kind, wanted, ids) = (*kind, wanted.clone(), Arc::clone(ids));
            Box::new(FlatMapStep::new(upstream, move |_: &G::Element| {
                select(graph, kind, &wanted, ids.as_ref()).collect()
            }))
        }
        StepSpec::Has { containers } => Box::new(HasStep::with_containers(
            upstream,
            containers.iter().cloned(),
            Arc::clone(ids),
        )),
        StepSpec::Vertex {
            direction,
            edge_labels,
            emit,
        } => {
            let (direction, emit, labels) = (*direction, *emit, edge_labels.clone());
            Box::new(FlatMapStep::new(upstream, move |e: &G::Element| {
                graph.adjacent(e, direction, &labels, emit)
            }))
        }
        StepSpec::EdgeVertex { direction } => {
            let direction = *direction;
            Box::new(FlatMapStep::new(upstream, move |e: &G::Element| {
                graph.edge_vertices(e, direction)
            }))
        }
        StepSpec::PropertyTraversal { key, traversal } => {
            let (key, traversal) = (key.clone(), traversal.clone());
            Box::new(FilterStep::new(upstream, move |e: &G::Element| {
                e.properties(&key)
                    .iter()
                    .any(|v| traversal.apply(v).is_some())
            }))
        }
    }
}
