//! Plan rewrite strategies.
//!
//! Strategies run in a fixed order over the logical plan after identifier
//! operands have been canonicalized. Every rewrite preserves the set and
//! order of emitted elements.

use crate::config::StrategyConfig;
use crate::container::{HasContainer, HasTarget};
use crate::traversal::StepSpec;
use std::fmt;
use tracing::debug;

pub trait TraversalStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite `steps` in place; returns whether anything changed.
    fn apply(&self, steps: &mut Vec<StepSpec>) -> bool;
}

/// `has(key, is(p))` becomes the plain container `has(key, p)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineValuePredicates;

impl TraversalStrategy for InlineValuePredicates {
    fn name(&self) -> &'static str {
        "inline_value_predicates"
    }

    fn apply(&self, steps: &mut Vec<StepSpec>) -> bool {
        let mut changed = false;
        for step in steps.iter_mut() {
            let StepSpec::PropertyTraversal { key, traversal } = step else {
                continue;
            };
            if let Some(p) = traversal.single_predicate() {
                *step = StepSpec::Has {
                    containers: vec![HasContainer::property(key.clone(), p.clone())],
                };
                changed = true;
            }
        }
        changed
    }
}

/// Adjacent has-steps collapse into one, keeping container order.
/// Has-steps left with no containers are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeHasSteps;

impl TraversalStrategy for MergeHasSteps {
    fn name(&self) -> &'static str {
        "merge_has_steps"
    }

    fn apply(&self, steps: &mut Vec<StepSpec>) -> bool {
        let before = steps.len();
        let mut merged: Vec<StepSpec> = Vec::with_capacity(before);
        for step in steps.drain(..) {
            match step {
                StepSpec::Has { containers } if containers.is_empty() => {}
                StepSpec::Has { containers } => {
                    if !matches!(merged.last(), Some(StepSpec::Has { .. })) {
                        merged.push(StepSpec::Has { containers });
                    } else if let Some(StepSpec::Has { containers: acc }) = merged.last_mut() {
                        acc.extend(containers);
                    }
                }
                step => merged.push(step),
            }
        }
        *steps = merged;
        steps.len() != before
    }
}

/// `V().hasId(a, b)` becomes `V(a, b)`.
///
/// Applies only when the source selects every element and the step right
/// after it carries an `eq`/`within` id container with at least one value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldIdsIntoSource;

impl TraversalStrategy for FoldIdsIntoSource {
    fn name(&self) -> &'static str {
        "fold_ids_into_source"
    }

    fn apply(&self, steps: &mut Vec<StepSpec>) -> bool {
        let [StepSpec::Source { ids, .. }, StepSpec::Has { containers }, ..] = steps.as_mut_slice()
        else {
            return false;
        };
        if !ids.is_empty() {
            return false;
        }
        let position = containers.iter().position(|c| {
            *c.target() == HasTarget::Id
                && c.predicate()
                    .and_then(|p| p.as_value_set())
                    .is_some_and(|set| !set.is_empty())
        });
        let Some(position) = position else {
            return false;
        };

        let container = containers.remove(position);
        if let Some(set) = container.predicate().and_then(|p| p.as_value_set()) {
            ids.extend(set.iter().cloned());
        }
        if containers.is_empty() {
            steps.remove(1);
        }
        true
    }
}

/// The enabled strategies, in application order.
pub fn default_strategies(config: &StrategyConfig) -> Vec<Box<dyn TraversalStrategy>> {
    let mut strategies: Vec<Box<dyn TraversalStrategy>> = Vec::new();
    if config.inline_value_predicates {
        strategies.push(Box::new(InlineValuePredicates));
    }
    if config.merge_has_steps {
        strategies.push(Box::new(MergeHasSteps));
    }
    if config.fold_ids_into_source {
        strategies.push(Box::new(FoldIdsIntoSource));
    }
    strategies
}

pub fn apply_strategies(strategies: &[Box<dyn TraversalStrategy>], steps: &mut Vec<StepSpec>) {
    for strategy in strategies {
        let before = steps.len();
        if strategy.apply(steps) {
            debug!(
                strategy = strategy.name(),
                before,
                after = steps.len(),
                "strategy rewrote plan"
            );
        }
    }
}
