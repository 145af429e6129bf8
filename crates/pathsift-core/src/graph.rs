//! The backing-store surface a traversal executes against.

use crate::element::{Element, ElementKind};
use crate::ids::{IdCanonicalizer, NativeIds};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Out,
    In,
    Both,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Out => write!(f, "out"),
            Direction::In => write!(f, "in"),
            Direction::Both => write!(f, "both"),
        }
    }
}

/// Read-only graph provider.
///
/// Implementations must be safe to read from several pipelines at once; each
/// pipeline owns its own iteration state.
pub trait Graph<'g> {
    type Element: Element + Clone + 'g;

    fn vertices(&'g self) -> Box<dyn Iterator<Item = Self::Element> + 'g>;

    fn edges(&'g self) -> Box<dyn Iterator<Item = Self::Element> + 'g>;

    /// Vertices whose id is one of `ids` (in any encoding the provider's
    /// canonicalizer accepts), each at most once, in the same relative order
    /// `vertices()` yields them.
    fn vertices_by_id(&'g self, ids: &[Value]) -> Vec<Self::Element>;

    fn edges_by_id(&'g self, ids: &[Value]) -> Vec<Self::Element>;

    /// Neighbors of `element` through incident edges in `direction`.
    ///
    /// `edge_labels` restricts the edges followed (empty means any label);
    /// `emit` selects whether the far vertices or the edges themselves are
    /// produced.
    fn adjacent(
        &'g self,
        element: &Self::Element,
        direction: Direction,
        edge_labels: &[String],
        emit: ElementKind,
    ) -> Vec<Self::Element>;

    /// Endpoint vertices of an edge (`Out` = tail, `In` = head).
    fn edge_vertices(&'g self, edge: &Self::Element, direction: Direction) -> Vec<Self::Element>;

    fn id_canonicalizer(&self) -> Arc<dyn IdCanonicalizer> {
        Arc::new(NativeIds)
    }
}
