//! Integration tests for the complete Pathsift pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Traversal builder → Compiler (strategies, canonical plans)
//! - Compiled plan → Pipeline over the reference property graph
//! - Engine configuration → id matching and optimizer toggles
//!
//! Run with: cargo test --test integration_tests

use pathsift_core::{
    Element, EngineConfig, IdStrategy, Pipeline, Predicate, StepKind, StrategyConfig, Traversal,
    Value, ValueTraversal,
};
use pathsift_store::datasets::{crew, modern};
use pathsift_store::{GraphElement, PropertyGraph};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run_with<'g>(
    g: &'g PropertyGraph,
    config: EngineConfig,
    traversal: Traversal,
) -> Pipeline<'g, GraphElement<'g>> {
    init_tracing();
    g.compiler(config).compile(&traversal).execute(g)
}

fn run<'g>(g: &'g PropertyGraph, traversal: Traversal) -> Pipeline<'g, GraphElement<'g>> {
    run_with(g, EngineConfig::default(), traversal)
}

fn names<'g>(elements: impl IntoIterator<Item = GraphElement<'g>>) -> Vec<String> {
    elements
        .into_iter()
        .filter_map(|e| e.value("name").map(ToString::to_string))
        .collect()
}

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

fn ids<'g>(elements: impl IntoIterator<Item = GraphElement<'g>>) -> Vec<Value> {
    elements.into_iter().map(|e| e.id().clone()).collect()
}

// ============================================================================
// Property existence and equality
// ============================================================================

#[test]
fn test_v1_has_key() {
    let g = modern().unwrap();
    assert_eq!(names(run(&g, Traversal::v_ids([1]).has("name"))), vec!["marko"]);

    let mut none = run(&g, Traversal::v_ids([1]).has("circumference"));
    assert!(!none.has_next());
}

#[test]
fn test_v1_has_name_marko() {
    let g = modern().unwrap();
    assert_eq!(
        names(run(&g, Traversal::v_ids([1]).has_value("name", "marko"))),
        vec!["marko"]
    );
    assert!(run(&g, Traversal::v_ids([2]).has_value("name", "marko"))
        .next()
        .is_none());
}

#[test]
fn test_v_has_name_marko_and_blah() {
    let g = modern().unwrap();
    assert_eq!(
        names(run(&g, Traversal::v().has_value("name", "marko"))),
        vec!["marko"]
    );
    assert_eq!(run(&g, Traversal::v().has_value("name", "blah")).count(), 0);
    assert_eq!(run(&g, Traversal::v().has("blah")).count(), 0);
}

#[test]
fn test_v_has_location_on_multi_valued_properties() {
    let g = crew().unwrap();
    assert_eq!(
        sorted(names(run(&g, Traversal::v().has("location")))),
        vec!["daniel", "marko", "matthias", "stephen"]
    );
    assert_eq!(
        names(run(&g, Traversal::v().has_value("location", "brussels"))),
        vec!["marko"]
    );
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn test_v_has_age_gt_30() {
    let g = modern().unwrap();
    let direct: Vec<GraphElement> =
        run(&g, Traversal::v().has_where("age", Predicate::gt(30))).collect();
    assert_eq!(direct.len(), 2);
    assert!(direct
        .iter()
        .all(|v| v.value("age").is_some_and(|age| Predicate::gt(30).test(age))));

    let via_is = run(
        &g,
        Traversal::v().has_traversal("age", ValueTraversal::new().is(Predicate::gt(30))),
    );
    assert_eq!(names(via_is), names(direct));
}

#[test]
fn test_v1_has_age_gt_30() {
    let g = modern().unwrap();
    let mut marko = run(&g, Traversal::v_ids([1]).has_where("age", Predicate::gt(30)));
    assert!(!marko.has_next());
    let mut josh = run(&g, Traversal::v_ids([4]).has_where("age", Predicate::gt(30)));
    assert!(josh.has_next());
}

#[test]
fn test_compound_age_predicate() {
    let g = modern().unwrap();
    let age = Predicate::lte(10)
        .and(!Predicate::between(11, 20).unwrap())
        .negate()
        .and(Predicate::lt(29).or(Predicate::eq(35)));
    let found = names(run(
        &g,
        Traversal::v().has_label(["person"]).has_where("age", age),
    ));
    assert_eq!(sorted(found), vec!["peter", "vadas"]);
}

#[test]
fn test_out_created_has_name_length_gt_3() {
    let g = modern().unwrap();
    let found = names(run(
        &g,
        Traversal::v().out(&["created"]).has_traversal(
            "name",
            ValueTraversal::new().length().is(Predicate::gt(3)),
        ),
    ));
    assert_eq!(found, vec!["ripple"]);
}

#[test]
fn test_v1_out_e_has_weight_inside_inv() {
    let g = modern().unwrap();
    let found = names(run(
        &g,
        Traversal::v_ids([1])
            .out_e(&[])
            .has_where("weight", Predicate::inside(0.0, 0.6).unwrap())
            .in_v(),
    ));
    assert_eq!(sorted(found), vec!["lop", "vadas"]);
}

// ============================================================================
// Ids
// ============================================================================

#[test]
fn test_v1_out_has_id_2() {
    let g = modern().unwrap();
    for traversal in [
        Traversal::v_ids([1]).out(&[]).has_id([2]),
        Traversal::v_ids(["1"]).out(&[]).has_id(["2"]),
        Traversal::v_ids([1]).out(&[]).has_id_where(Predicate::lt(3)),
    ] {
        let mut vadas = run(&g, traversal);
        assert!(vadas.has_next());
        assert_eq!(vadas.next().map(|v| v.id().clone()), Some(Value::Int(2)));
        assert!(!vadas.has_next());
    }
}

#[test]
fn test_v1_out_has_id_2_3() {
    let g = modern().unwrap();
    for traversal in [
        Traversal::v_ids([1]).out(&[]).has_id([2, 3]),
        Traversal::v_ids([1]).out(&[]).has_id(["2", "3"]),
    ] {
        let mut found = ids(run(&g, traversal));
        found.sort_by_key(Value::canonical_key);
        assert_eq!(found, vec![Value::Int(2), Value::Int(3)]);
    }
}

#[test]
fn test_e11_out_v_out_e_has_id_10() {
    let g = modern().unwrap();
    for traversal in [
        Traversal::e_ids([11]).out_v().out_e(&[]).has_id_where(Predicate::eq(10)),
        Traversal::e_ids(["11"]).out_v().out_e(&[]).has_id_where(Predicate::eq("10")),
    ] {
        let mut edges = run(&g, traversal);
        assert!(edges.has_next());
        let e = edges.next().unwrap();
        assert_eq!(e.id(), &Value::Int(10));
        assert_eq!(e.label(), "created");
        assert!(!edges.has_next());
    }
}

#[test]
fn test_textual_id_strategy_matches_the_same_elements() {
    let g = modern().unwrap();
    let config = EngineConfig {
        id_strategy: IdStrategy::Textual,
        ..EngineConfig::default()
    };
    let found = ids(run_with(&g, config, Traversal::v_ids([1]).out(&[]).has_id([2, 4])));
    assert_eq!(found, vec![Value::Int(2), Value::Int(4)]);
}

#[test]
fn test_textual_id_strategy_keeps_numeric_id_ranges() {
    let g = modern().unwrap();
    let textual = EngineConfig {
        id_strategy: IdStrategy::Textual,
        ..EngineConfig::default()
    };
    let expected: Vec<Value> = (7..=10).map(Value::Int).collect();

    let range = Traversal::e().has_id_where(Predicate::between(7, 11).unwrap());
    assert_eq!(ids(run(&g, range.clone())), expected);
    assert_eq!(ids(run_with(&g, textual.clone(), range)), expected);

    let text_bounds = Traversal::e().has_id_where(Predicate::between("7", "9").unwrap());
    let found = ids(run_with(&g, textual.clone(), text_bounds));
    assert_eq!(found, vec![Value::Int(7), Value::Int(8)]);

    let above = Traversal::v().has_id_where(Predicate::gt(4).and(Predicate::neq(6)));
    assert_eq!(ids(run_with(&g, textual, above)), vec![Value::Int(5)]);
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn test_e7_has_label_knows() {
    let g = modern().unwrap();
    let edges: Vec<GraphElement> = run(&g, Traversal::e_ids([7]).has_label(["knows"])).collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].label(), "knows");

    let all: Vec<GraphElement> = run(&g, Traversal::e().has_label(["knows"])).collect();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|e| e.label() == "knows"));
}

#[test]
fn test_e_has_label_uses_traverses() {
    let g = crew().unwrap();
    let edges: Vec<GraphElement> =
        run(&g, Traversal::e().has_label(["uses", "traverses"])).collect();
    assert_eq!(edges.len(), 9);
    assert!(edges
        .iter()
        .all(|e| e.label() == "uses" || e.label() == "traverses"));
}

#[test]
fn test_v_has_label_person_software_blah() {
    let g = modern().unwrap();
    let count = run(&g, Traversal::v().has_label(["person", "software", "blah"])).count();
    assert_eq!(count, 6);
}

#[test]
fn test_v_has_person_name_marko_age() {
    let g = modern().unwrap();
    let ages: Vec<Value> = run(&g, Traversal::v().has_labeled("person", "name", "marko"))
        .filter_map(|v| v.value("age").cloned())
        .collect();
    assert_eq!(ages, vec![Value::Int(29)]);
}

// ============================================================================
// Compilation equality
// ============================================================================

#[test]
fn test_has_id_compilation_equality() {
    init_tracing();
    let g = modern().unwrap();
    let compiler = g.compiler(EngineConfig::default());

    let a1 = compiler.compile(&Traversal::v_ids([1]));
    let a2 = compiler.compile(&Traversal::v().has_id([1]));
    let b1 = compiler.compile(&Traversal::v_ids([1, 2]));
    let b2 = compiler.compile(&Traversal::v().has_id([1, 2]));

    assert_eq!(ids(a1.execute(&g)), vec![Value::Int(1)]);
    assert_eq!(ids(a2.execute(&g)), vec![Value::Int(1)]);
    assert_eq!(ids(b1.execute(&g)), vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(ids(b2.execute(&g)), vec![Value::Int(1), Value::Int(2)]);

    assert_eq!(a1, a2);
    assert_eq!(b1, b2);
    assert_ne!(a1, b1);
    assert_ne!(a1, b2);
    assert_ne!(a2, b1);
    assert_ne!(a2, b2);
    assert_eq!(a2.plan().kinds(), vec![StepKind::Source]);
}

#[test]
fn test_strategies_never_change_results() {
    let g = modern().unwrap();
    let off = EngineConfig {
        strategies: StrategyConfig::disabled(),
        ..EngineConfig::default()
    };
    let traversals = [
        Traversal::v().has_id([1, 2]).has("name"),
        Traversal::v()
            .has_label(["person"])
            .has_traversal("age", ValueTraversal::new().is(Predicate::gt(28))),
        Traversal::v_ids([1]).out_e(&["knows"]).has_where("weight", Predicate::gte(0.5)).in_v(),
        Traversal::e().has_label(["created"]).out_v().has_value("name", "josh"),
    ];
    for t in traversals {
        let optimized = ids(run(&g, t.clone()));
        let plain = ids(run_with(&g, off.clone(), t));
        assert_eq!(optimized, plain);
    }
}

#[test]
fn test_pipeline_reports_compiled_step_kinds() {
    let g = modern().unwrap();
    let pipeline = run(&g, Traversal::v().has_label(["person"]).has("age").out(&[]));
    assert_eq!(
        pipeline.step_kinds(),
        &[StepKind::Source, StepKind::Has, StepKind::Vertex]
    );
}

// ============================================================================
// Property Tests
// ============================================================================

fn generated_traversal() -> impl Strategy<Value = Traversal> {
    let op = prop_oneof![
        prop::collection::vec(1i64..13, 1..3).prop_map(|ids| ("has_id", ids)),
        (20i64..40).prop_map(|n| ("age_gt", vec![n])),
        (0i64..2).prop_map(|n| ("label", vec![n])),
        Just(("has_name", Vec::new())),
        Just(("is_age", Vec::new())),
        Just(("out", Vec::new())),
        Just(("out_e", Vec::new())),
        Just(("in_v", Vec::new())),
    ];
    (any::<bool>(), prop::collection::vec(op, 0..5)).prop_map(|(vertices, ops)| {
        let mut t = if vertices { Traversal::v() } else { Traversal::e() };
        for (name, args) in ops {
            t = match name {
                "has_id" => t.has_id(args),
                "age_gt" => t.has_where("age", Predicate::gt(args[0])),
                "label" => t.has_label([["person", "knows"][args[0] as usize]]),
                "has_name" => t.has("name"),
                "is_age" => t.has_traversal("age", ValueTraversal::new().is(Predicate::lte(32))),
                "out" => t.out(&[]),
                "out_e" => t.out_e(&[]),
                _ => t.in_v(),
            };
        }
        t
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn strategies_preserve_generated_results(t in generated_traversal()) {
        let g = modern().unwrap();
        let off = EngineConfig {
            strategies: StrategyConfig::disabled(),
            ..EngineConfig::default()
        };
        let optimized = ids(run(&g, t.clone()));
        let plain = ids(run_with(&g, off, t.clone()));
        prop_assert_eq!(optimized, plain);

        let textual = EngineConfig {
            id_strategy: IdStrategy::Textual,
            ..EngineConfig::default()
        };
        prop_assert_eq!(ids(run_with(&g, textual, t.clone())), ids(run(&g, t)));
    }
}
