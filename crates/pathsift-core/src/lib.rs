//! Pathsift: has-filtering and plan comparison for property-graph traversals
//!
//! A traversal is built as a list of steps (`V()`, `has(...)`, `out(...)`,
//! ...), compiled into a canonical plan, and executed as a pull pipeline
//! over any store implementing [`Graph`].
//!
//! Key pieces:
//! 1. **Predicates**: comparison, range, membership and boolean combinators
//!    over property values ([`Predicate`])
//! 2. **Has containers**: a predicate bound to an id, label or property key
//!    ([`HasContainer`])
//! 3. **HasStep**: the conjunctive filter stage with lookahead buffering
//! 4. **Plans**: canonical step descriptors with structural equality and a
//!    stable fingerprint ([`CompiledPlan`], [`plans_equal`])
//!
//! ## Module Organization
//!
//! - `value`, `element`, `ids`: the data surface elements expose
//! - `predicate`, `container`, `has_step`, `step`: filtering and the pull model
//! - `traversal`, `strategy`, `compiler`, `pipeline`, `plan`: building,
//!   optimizing, comparing and running traversals
//! - `config`: engine configuration

pub mod compiler;
pub mod config;
pub mod container;
pub mod element;
pub mod error;
pub mod graph;
pub mod has_step;
pub mod ids;
pub mod pipeline;
pub mod plan;
pub mod predicate;
pub mod step;
pub mod strategy;
pub mod traversal;
pub mod value;

// Re-export key types
pub use compiler::{CompiledTraversal, TraversalCompiler};
pub use config::{EngineConfig, IdStrategy, StrategyConfig};
pub use container::{HasContainer, HasTarget};
pub use element::{DetachedElement, Element, ElementKind};
pub use error::{PredicateError, RangeFault};
pub use graph::{Direction, Graph};
pub use has_step::{HasStep, HasStepStats};
pub use ids::{IdCanonicalizer, NativeIds, NumericIds, TextualIds};
pub use pipeline::Pipeline;
pub use plan::{plans_equal, CompiledPlan, StepDescriptor, StepKind};
pub use predicate::Predicate;
pub use step::{BoxedStep, Step};
pub use strategy::TraversalStrategy;
pub use traversal::{StepSpec, Traversal, ValueTraversal};
pub use value::Value;
