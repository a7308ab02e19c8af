//! Property tests for diff determinism.
//!
//! The engine must produce byte-identical output for the same pair of models
//! regardless of evaluator registration order or scheduling. Models are
//! generated at random from a small vocabulary so that added, removed and
//! matched shapes, member churn and trait churn all occur frequently.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use shapediff_core::diff::{
    diff, result_digest, Evaluator, EvaluatorRegistry, ModelDiffEngine, Parallelism, TraitRules,
};
use shapediff_core::model::{MemberShape, Model, Shape, ShapeId, ShapeKind};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

const NAMES: &[&str] = &["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];
const KINDS: &[ShapeKind] = &[
    ShapeKind::String,
    ShapeKind::Integer,
    ShapeKind::Structure,
    ShapeKind::Union,
];
const MEMBER_NAMES: &[&str] = &["a", "b", "c", "d"];
const TARGETS: &[&str] = &["smithy.api#String", "smithy.api#Integer", "smithy.api#Boolean"];
const TRAITS: &[&str] = &[
    "smithy.api#required",
    "smithy.api#documentation",
    "smithy.api#length",
    "acme#custom",
];

type TraitPlan = (usize, Value);
type MemberPlan = (usize, usize, Vec<TraitPlan>);
type ShapePlan = (usize, usize, Vec<MemberPlan>, Vec<TraitPlan>);

// ---------------------------------------------------------------------------
// Proptest strategies
// ---------------------------------------------------------------------------

/// Trait values, including some the bounds comparator cannot read
fn arb_trait_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({})),
        (0u32..5).prop_map(|n| json!({ "min": n })),
        (0u32..5, 5u32..10).prop_map(|(lo, hi)| json!({ "min": lo, "max": hi })),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

fn arb_traits() -> impl Strategy<Value = Vec<TraitPlan>> {
    prop::collection::vec((0..TRAITS.len(), arb_trait_value()), 0..3)
}

fn arb_shape_plan() -> impl Strategy<Value = ShapePlan> {
    (
        0..NAMES.len(),
        0..KINDS.len(),
        prop::collection::vec((0..MEMBER_NAMES.len(), 0..TARGETS.len(), arb_traits()), 0..4),
        arb_traits(),
    )
}

fn arb_model() -> impl Strategy<Value = Model> {
    prop::collection::vec(arb_shape_plan(), 0..6).prop_map(|plans| build_model(&plans))
}

fn build_model(plans: &[ShapePlan]) -> Model {
    let mut shapes: BTreeMap<&str, Shape> = BTreeMap::new();
    for (name_idx, kind_idx, members, traits) in plans {
        let name = NAMES[*name_idx];
        if shapes.contains_key(name) {
            continue;
        }
        let id = ShapeId::parse(&format!("acme#{}", name)).unwrap();
        let kind = KINDS[*kind_idx];
        let mut shape = Shape::new(id.clone(), kind);
        for (trait_idx, value) in traits {
            shape = shape.with_trait(TRAITS[*trait_idx], value.clone());
        }
        if kind.has_members() {
            let mut seen = BTreeSet::new();
            for (member_idx, target_idx, member_traits) in members {
                let member_name = MEMBER_NAMES[*member_idx];
                if !seen.insert(member_name) {
                    continue;
                }
                let target = ShapeId::parse(TARGETS[*target_idx]).unwrap();
                let mut member = MemberShape::new(&id, member_name, target).unwrap();
                for (trait_idx, value) in member_traits {
                    member = member.with_trait(TRAITS[*trait_idx], value.clone());
                }
                shape = shape.with_member(member);
            }
        }
        shapes.insert(name, shape);
    }
    Model::builder().add_shapes(shapes.into_values()).build().unwrap()
}

fn standard_evaluators() -> Vec<Arc<dyn Evaluator>> {
    EvaluatorRegistry::standard(TraitRules::standard())
        .iter()
        .cloned()
        .collect()
}

fn arb_permutation() -> impl Strategy<Value = Vec<usize>> {
    let n = standard_evaluators().len();
    Just((0..n).collect::<Vec<usize>>()).prop_shuffle()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Shuffled registries and both schedules agree byte for byte.
    #[test]
    fn prop_output_independent_of_registry_order_and_scheduling(
        old in arb_model(),
        new in arb_model(),
        order in arb_permutation(),
    ) {
        let baseline = ModelDiffEngine::standard()
            .with_parallelism(Parallelism::Sequential)
            .diff(&old, &new, &[])
            .unwrap();

        let evaluators = standard_evaluators();
        let shuffled = EvaluatorRegistry::from_evaluators(
            order.iter().map(|i| Arc::clone(&evaluators[*i])).collect(),
        );

        for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
            let engine = ModelDiffEngine::new(shuffled.clone()).with_parallelism(parallelism);
            for _ in 0..3 {
                let result = engine.diff(&old, &new, &[]).unwrap();
                prop_assert_eq!(&result, &baseline);
                prop_assert_eq!(result_digest(&result), result_digest(&baseline));
            }
        }
    }

    /// Events come out sorted by shape id, then event id, then severity.
    #[test]
    fn prop_events_are_in_canonical_order(old in arb_model(), new in arb_model()) {
        let result = diff(&old, &new, &[]).unwrap();
        for pair in result.events().windows(2) {
            let key = |e: &shapediff_core::ValidationEvent| {
                (e.shape_id().clone(), e.event_id().to_string(), e.severity())
            };
            prop_assert!(key(&pair[0]) <= key(&pair[1]));
        }
    }

    /// A model diffed against itself has nothing to report.
    #[test]
    fn prop_idempotence(m in arb_model()) {
        let result = diff(&m, &m, &[]).unwrap();
        prop_assert!(result.is_empty());
        prop_assert!(!result.has_errors());
    }

    /// What one direction adds, the other removes.
    #[test]
    fn prop_swap_symmetry(x in arb_model(), y in arb_model()) {
        let ids_with = |m: &Model, n: &Model, event_id: &str| -> Vec<String> {
            diff(m, n, &[])
                .unwrap()
                .events()
                .iter()
                .filter(|e| e.event_id() == event_id)
                .map(|e| e.shape_id().to_string())
                .collect()
        };
        prop_assert_eq!(ids_with(&x, &y, "ShapeAdded"), ids_with(&y, &x, "ShapeRemoved"));
        prop_assert_eq!(ids_with(&x, &y, "MemberAdded"), ids_with(&y, &x, "MemberRemoved"));
    }
}
