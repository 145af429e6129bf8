use pathsift_core::step::StartStep;
use pathsift_core::{
    DetachedElement, Element, HasContainer, HasStep, NumericIds, Predicate, Step, Value,
};
use proptest::prelude::*;
use std::sync::Arc;

const LABELS: [&str; 3] = ["person", "software", "place"];
const KEYS: [&str; 3] = ["age", "name", "weight"];

fn element_strategy() -> impl Strategy<Value = DetachedElement> {
    (
        1i64..40,
        0usize..LABELS.len(),
        prop::option::of(0i64..60),
        prop::option::of("[a-d]{1,3}"),
    )
        .prop_map(|(id, label, age, name)| {
            let mut e = DetachedElement::vertex(id, LABELS[label]);
            if let Some(age) = age {
                e = e.with_property("age", age);
            }
            if let Some(name) = name {
                e = e.with_property("name", name);
            }
            e
        })
}

fn container_strategy() -> impl Strategy<Value = HasContainer> {
    prop_oneof![
        (0usize..KEYS.len()).prop_map(|k| HasContainer::exists(KEYS[k])),
        (0i64..60).prop_map(|n| HasContainer::property("age", Predicate::gt(n))),
        (0i64..60).prop_map(|n| HasContainer::property("age", Predicate::lte(n))),
        "[a-d]{1,2}".prop_map(|s| HasContainer::property("name", Predicate::gte(s))),
        prop::collection::vec(0usize..LABELS.len(), 1..3)
            .prop_map(|ls| HasContainer::labels(ls.into_iter().map(|i| LABELS[i]))),
        prop::collection::vec(1i64..40, 1..4)
            .prop_map(|ids| HasContainer::ids(ids.into_iter().map(|i| i.to_string()))),
    ]
}

fn run(elements: &[DetachedElement], containers: &[HasContainer]) -> Vec<Value> {
    let mut step = HasStep::with_containers(
        StartStep::new(elements.to_vec().into_iter()),
        containers.to_vec(),
        Arc::new(NumericIds),
    );
    let mut out = Vec::new();
    while step.has_next() {
        if let Some(e) = step.next() {
            out.push(e.id().clone());
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 192,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn container_order_never_changes_the_output(
        elements in prop::collection::vec(element_strategy(), 0..12),
        containers in prop::collection::vec(container_strategy(), 0..5),
        seed in any::<u64>(),
    ) {
        let mut shuffled = containers.clone();
        // Deterministic rotation plus reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let n = shuffled.len();
            shuffled.rotate_left((seed as usize) % n);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        prop_assert_eq!(run(&elements, &containers), run(&elements, &shuffled));
    }

    #[test]
    fn output_matches_a_naive_conjunction(
        elements in prop::collection::vec(element_strategy(), 0..12),
        containers in prop::collection::vec(container_strategy(), 0..5),
    ) {
        let expected: Vec<Value> = elements
            .iter()
            .filter(|e| containers.iter().all(|c| c.test(*e, &NumericIds)))
            .map(|e| e.id().clone())
            .collect();
        prop_assert_eq!(run(&elements, &containers), expected);
    }

    #[test]
    fn incremental_and_batch_construction_agree(
        elements in prop::collection::vec(element_strategy(), 0..12),
        containers in prop::collection::vec(container_strategy(), 0..5),
    ) {
        let start = StartStep::new(elements.clone().into_iter());
        let mut step = HasStep::new(start, Arc::new(NumericIds));
        for c in containers.iter().cloned() {
            step.add_container(c);
        }
        let mut incremental = Vec::new();
        while let Some(e) = step.next() {
            incremental.push(e.id().clone());
        }
        prop_assert_eq!(incremental, run(&elements, &containers));
        prop_assert_eq!(step.stats().pulled, elements.len() as u64);
    }
}
