//! Traversal compilation: canonicalize, optimize, describe.

use crate::config::EngineConfig;
use crate::graph::Graph;
use crate::ids::IdCanonicalizer;
use crate::pipeline::Pipeline;
use crate::plan::{plans_equal, CompiledPlan};
use crate::strategy::{apply_strategies, default_strategies, TraversalStrategy};
use crate::traversal::{StepSpec, Traversal};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct TraversalCompiler {
    config: EngineConfig,
    ids: Arc<dyn IdCanonicalizer>,
    strategies: Vec<Box<dyn TraversalStrategy>>,
}

impl TraversalCompiler {
    /// `store_ids` is used when the configuration defers to the store.
    pub fn new(config: EngineConfig, store_ids: Arc<dyn IdCanonicalizer>) -> Self {
        let ids = config.id_strategy.resolve(store_ids);
        let strategies = default_strategies(&config.strategies);
        Self {
            config,
            ids,
            strategies,
        }
    }

    pub fn for_graph<'g, G: Graph<'g>>(graph: &G, config: EngineConfig) -> Self {
        Self::new(config, graph.id_canonicalizer())
    }

    /// Replace the configured strategy list.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn TraversalStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn id_canonicalizer(&self) -> &Arc<dyn IdCanonicalizer> {
        &self.ids
    }

    pub fn compile(&self, traversal: &Traversal) -> CompiledTraversal {
        let ids = self.ids.as_ref();
        let mut steps: Vec<StepSpec> = traversal
            .steps()
            .iter()
            .map(|step| canonicalize_step(step, ids))
            .collect();
        apply_strategies(&self.strategies, &mut steps);

        let plan = CompiledPlan::new(steps.iter().map(StepSpec::descriptor).collect());
        debug!(
            traversal = %traversal,
            plan = %plan,
            fingerprint = %plan.fingerprint(),
            "compiled traversal"
        );
        CompiledTraversal {
            steps,
            plan,
            ids: Arc::clone(&self.ids),
        }
    }
}

fn canonicalize_step(step: &StepSpec, ids: &dyn IdCanonicalizer) -> StepSpec {
    match step {
        StepSpec::Source { kind, ids: source } => StepSpec::Source {
            kind: *kind,
            ids: source.iter().map(|id| ids.canonicalize(id)).collect(),
        },
        StepSpec::Has { containers } => StepSpec::Has {
            containers: containers.iter().map(|c| c.canonicalized(ids)).collect(),
        },
        other => other.clone(),
    }
}

/// An optimized traversal, ready to run against any graph.
///
/// Two compiled traversals are equal when their plans are equal (see
/// [`plans_equal`]).
#[derive(Debug, Clone)]
pub struct CompiledTraversal {
    steps: Vec<StepSpec>,
    plan: CompiledPlan,
    ids: Arc<dyn IdCanonicalizer>,
}

impl CompiledTraversal {
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn plan(&self) -> &CompiledPlan {
        &self.plan
    }

    pub fn execute<'g, G: Graph<'g>>(&self, graph: &'g G) -> Pipeline<'g, G::Element> {
        Pipeline::assemble(graph, &self.steps, Arc::clone(&self.ids))
    }
}

impl PartialEq for CompiledTraversal {
    fn eq(&self, other: &Self) -> bool {
        plans_equal(&self.plan, &other.plan)
    }
}

impl Eq for CompiledTraversal {}
