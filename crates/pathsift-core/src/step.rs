//! Pull-iterator pipeline stages.
//!
//! A stage advances only when its downstream consumer pulls. `next()` is the
//! one pull primitive; `has_next()` may buffer a single lookahead element so
//! the consumer can peek without losing it.

use std::collections::VecDeque;

pub trait Step<E> {
    fn has_next(&mut self) -> bool;

    fn next(&mut self) -> Option<E>;
}

/// A type-erased stage, as assembled into a pipeline.
pub type BoxedStep<'g, E> = Box<dyn Step<E> + 'g>;

impl<E, S: Step<E> + ?Sized> Step<E> for Box<S> {
    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Option<E> {
        (**self).next()
    }
}

/// Head of a pipeline: adapts any iterator into a stage.
pub struct StartStep<I: Iterator> {
    iter: I,
    pending: Option<I::Item>,
}

impl<I: Iterator> StartStep<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            pending: None,
        }
    }
}

impl<I: Iterator> Step<I::Item> for StartStep<I> {
    fn has_next(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.iter.next();
        }
        self.pending.is_some()
    }

    fn next(&mut self) -> Option<I::Item> {
        self.pending.take().or_else(|| self.iter.next())
    }
}

/// Expands each upstream element into zero or more elements (navigation).
pub struct FlatMapStep<'g, E, F> {
    upstream: BoxedStep<'g, E>,
    expand: F,
    buffer: VecDeque<E>,
}

impl<'g, E, F> FlatMapStep<'g, E, F>
where
    F: FnMut(&E) -> Vec<E>,
{
    pub fn new(upstream: impl Step<E> + 'g, expand: F) -> Self {
        Self {
            upstream: Box::new(upstream),
            expand,
            buffer: VecDeque::new(),
        }
    }

    fn fill(&mut self) {
        while self.buffer.is_empty() {
            let Some(e) = self.upstream.next() else {
                return;
            };
            self.buffer.extend((self.expand)(&e));
        }
    }
}

impl<E, F> Step<E> for FlatMapStep<'_, E, F>
where
    F: FnMut(&E) -> Vec<E>,
{
    fn has_next(&mut self) -> bool {
        self.fill();
        !self.buffer.is_empty()
    }

    fn next(&mut self) -> Option<E> {
        self.fill();
        self.buffer.pop_front()
    }
}

/// Keeps upstream elements accepted by an arbitrary test.
pub struct FilterStep<'g, E, F> {
    upstream: BoxedStep<'g, E>,
    accept: F,
    pending: Option<E>,
}

impl<'g, E, F> FilterStep<'g, E, F>
where
    F: FnMut(&E) -> bool,
{
    pub fn new(upstream: impl Step<E> + 'g, accept: F) -> Self {
        Self {
            upstream: Box::new(upstream),
            accept,
            pending: None,
        }
    }

    fn advance(&mut self) -> Option<E> {
        while let Some(e) = self.upstream.next() {
            if (self.accept)(&e) {
                return Some(e);
            }
        }
        None
    }
}

impl<E, F> Step<E> for FilterStep<'_, E, F>
where
    F: FnMut(&E) -> bool,
{
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_step_keeps_the_lookahead() {
        let mut s = StartStep::new(vec![1, 2].into_iter());
        assert!(s.has_next());
        assert!(s.has_next());
        assert_eq!(s.next(), Some(1));
        assert_eq!(s.next(), Some(2));
        assert!(!s.has_next());
        assert_eq!(s.next(), None);
    }

    #[test]
    fn flat_map_skips_empty_expansions() {
        let start = StartStep::new(vec![0, 2, 0, 1].into_iter());
        let mut s = FlatMapStep::new(start, |n: &i32| vec![*n; *n as usize]);
        let mut out = Vec::new();
        while let Some(x) = s.next() {
            out.push(x);
        }
        assert_eq!(out, vec![2, 2, 1]);
        assert!(!s.has_next());
    }

    #[test]
    fn filter_step_preserves_order() {
        let start = StartStep::new(1..=6);
        let mut s = FilterStep::new(start, |n: &i32| n % 2 == 0);
        assert!(s.has_next());
        assert_eq!(s.next(), Some(2));
        assert_eq!(s.next(), Some(4));
        assert_eq!(s.next(), Some(6));
        assert_eq!(s.next(), None);
    }
}
