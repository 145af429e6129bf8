//! `HasStep`: the conjunctive element filter stage.
//!
//! Semantics:
//! - an element passes iff it satisfies every container (logical AND);
//! - containers are evaluated in list order and evaluation stops at the first
//!   failure, so order affects cost only, never the outcome;
//! - passing elements are forwarded unchanged and in upstream order;
//! - each upstream element is pulled exactly once and tested exactly once.

use crate::container::HasContainer;
use crate::element::Element;
use crate::ids::IdCanonicalizer;
use crate::step::{BoxedStep, Step};
use std::sync::Arc;
use tracing::{debug, trace};

/// Pull counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HasStepStats {
    pub pulled: u64,
    pub passed: u64,
    pub rejected: u64,
}

pub struct HasStep<'g, E> {
    upstream: BoxedStep<'g, E>,
    containers: Vec<HasContainer>,
    ids: Arc<dyn IdCanonicalizer>,
    /// At most one element that already passed and awaits `next()`.
    pending: Option<E>,
    stats: HasStepStats,
    exhausted: bool,
}

impl<'g, E: Element> HasStep<'g, E> {
    /// Bind a step with no containers (a pass-through) to `upstream`.
    pub fn new(upstream: impl Step<E> + 'g, ids: Arc<dyn IdCanonicalizer>) -> Self {
        Self {
            upstream: Box::new(upstream),
            containers: Vec::new(),
            ids,
            pending: None,
            stats: HasStepStats::default(),
            exhausted: false,
        }
    }

    pub fn with_containers(
        upstream: impl Step<E> + 'g,
        containers: impl IntoIterator<Item = HasContainer>,
        ids: Arc<dyn IdCanonicalizer>,
    ) -> Self {
        let mut step = Self::new(upstream, ids);
        for container in containers {
            step.add_container(container);
        }
        step
    }

    /// Append one more condition to the conjunction.
    ///
    /// If an element is already buffered by `has_next()`, it is checked
    /// against the new container too, so the buffer never leaks an element
    /// the extended conjunction would reject.
    pub fn add_container(&mut self, container: HasContainer) {
        let container = container.canonicalized(self.ids.as_ref());
        if let Some(e) = self.pending.as_ref() {
            if !container.test_canonical(e, self.ids.as_ref()) {
                trace!(id = %e.id(), "buffered element rejected by appended container");
                self.pending = None;
                self.stats.passed -= 1;
                self.stats.rejected += 1;
            }
        }
        self.containers.push(container);
    }

    pub fn containers(&self) -> &[HasContainer] {
        &self.containers
    }

    pub fn stats(&self) -> HasStepStats {
        self.stats
    }

    fn passes(&self, element: &E) -> bool {
        for (index, container) in self.containers.iter().enumerate() {
            if !container.test_canonical(element, self.ids.as_ref()) {
                trace!(id = %element.id(), container = index, "element rejected");
                return false;
            }
        }
        true
    }

    fn advance(&mut self) -> Option<E> {
        if self.exhausted {
            return None;
        }
        loop {
            let Some(element) = self.upstream.next() else {
                self.exhausted = true;
                debug!(
                    containers = self.containers.len(),
                    pulled = self.stats.pulled,
                    passed = self.stats.passed,
                    rejected = self.stats.rejected,
                    "has step exhausted upstream"
                );
                return None;
            };
            self.stats.pulled += 1;
            if self.passes(&element) {
                self.stats.passed += 1;
                return Some(element);
            }
            self.stats.rejected += 1;
        }
    }
}

impl<E: Element> Step<E> for HasStep<'_, E> {
    fn has_next(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.advance();
        }
        self.pending.is_some()
    }

    fn next(&mut self) -> Option<E> {
        match self.pending.take() {
            Some(e) => Some(e),
            None => self.advance(),
        }
    }
}
