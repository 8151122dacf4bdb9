//! Property-based tests for the filter engine
//!
//! These tests verify invariants that should hold for all inputs:
//! - Classifying two attribute maps puts every name in exactly one bucket
//! - Filtering partitions the candidates and keeps their order
//! - Filtering a filtered list again changes nothing
//! - Adding criteria never lets more candidates through
//! - Ranking is a permutation of what it was given
//! - Offered filter choices are disjoint and exclude current criteria

use cifinder::{
    classify, derive_filter_choices, filter_candidates, rank_by_score, AttributeValue, Bucket,
    Candidate, Classification, ClassifiedAttribute, ClassifiedTestCase, DownloadStatus,
    FilterSelection, Namespace,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const TEST_CASES: [&str; 2] = ["TC1", "TC2"];

fn attribute_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["volte", "ipsec", "vonr", "srvcc", "codec", "mode"])
        .prop_map(str::to_string)
}

fn raw_attributes() -> impl Strategy<Value = BTreeMap<String, AttributeValue>> {
    let value = prop_oneof![
        any::<bool>().prop_map(AttributeValue::Bool),
        prop::sample::select(vec!["auto", "manual"]).prop_map(AttributeValue::from),
    ];
    prop::collection::btree_map(attribute_name(), value, 0..6)
}

fn attribute(namespace: Namespace) -> impl Strategy<Value = ClassifiedAttribute> {
    let value = move |flag: bool| match namespace {
        Namespace::Boolean => AttributeValue::Bool(flag),
        Namespace::String => AttributeValue::from(if flag { "AMR" } else { "EVS" }),
    };
    (0u8..4, any::<bool>()).prop_map(move |(bucket, flag)| match bucket {
        0 => ClassifiedAttribute::Match { value: value(flag) },
        1 => ClassifiedAttribute::Mismatch {
            input: value(flag),
            candidate: value(!flag),
        },
        2 => ClassifiedAttribute::OnlyInput { value: value(flag) },
        _ => ClassifiedAttribute::OnlyCandidate { value: value(flag) },
    })
}

fn classification(namespace: Namespace) -> impl Strategy<Value = Option<Classification>> {
    prop::option::weighted(
        0.8,
        prop::collection::btree_map(attribute_name(), attribute(namespace), 0..5)
            .prop_map(Classification::new),
    )
}

fn test_case() -> impl Strategy<Value = ClassifiedTestCase> {
    (
        classification(Namespace::Boolean),
        classification(Namespace::String),
    )
        .prop_map(|(boolean, string)| ClassifiedTestCase {
            boolean,
            string,
            test_activity: None,
        })
}

fn candidate() -> impl Strategy<Value = Candidate> {
    (
        "[a-z]{3,8}",
        0.0f64..1.0,
        prop::collection::btree_map(prop::sample::select(TEST_CASES.to_vec()), test_case(), 0..3),
    )
        .prop_map(|(name, score, cases)| Candidate {
            name,
            score,
            status: DownloadStatus::Unavailable,
            tas: None,
            own_test_cases: BTreeMap::new(),
            test_cases: cases
                .into_iter()
                .map(|(tc, classified)| (tc.to_string(), classified))
                .collect(),
        })
}

fn selection() -> impl Strategy<Value = FilterSelection> {
    prop::collection::btree_map(
        prop::sample::select(TEST_CASES.to_vec()),
        prop::collection::vec(attribute_name(), 0..3),
        0..3,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    /// Property: the classified names are the union of both sides, each in
    /// the bucket its membership and equality call for
    #[test]
    fn prop_classify_partitions_the_union_of_names(
        input in raw_attributes(),
        candidate in raw_attributes(),
    ) {
        let (input_before, candidate_before) = (input.clone(), candidate.clone());
        let cls = classify(&input, &candidate);

        let names: BTreeSet<&String> = cls.iter().map(|(name, _)| name).collect();
        let union: BTreeSet<&String> = input.keys().chain(candidate.keys()).collect();
        prop_assert_eq!(names, union);

        for (name, attribute) in cls.iter() {
            let expected = match (input.get(name), candidate.get(name)) {
                (Some(a), Some(b)) if a == b => Bucket::Match,
                (Some(_), Some(_)) => Bucket::Mismatch,
                (Some(_), None) => Bucket::OnlyInput,
                (None, Some(_)) => Bucket::OnlyCandidate,
                (None, None) => unreachable!("{name} is on neither side"),
            };
            prop_assert_eq!(attribute.bucket(), expected);
            prop_assert_eq!(attribute.input_value(), input.get(name));
            prop_assert_eq!(attribute.candidate_value(), candidate.get(name));
        }

        prop_assert_eq!(input, input_before);
        prop_assert_eq!(candidate, candidate_before);
    }

    /// Property: passing indices are strictly increasing, in range, and
    /// exactly the candidates that satisfy the selection on their own
    #[test]
    fn prop_filter_is_an_ordered_partition(
        candidates in prop::collection::vec(candidate(), 0..8),
        selection in selection(),
    ) {
        let passing = filter_candidates(&candidates, &TEST_CASES, &selection);

        prop_assert!(passing.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(passing.iter().all(|&i| i < candidates.len()));
        for (index, candidate) in candidates.iter().enumerate() {
            let alone = filter_candidates(std::slice::from_ref(candidate), &TEST_CASES, &selection);
            prop_assert_eq!(alone.len() == 1, passing.contains(&index));
        }
    }

    /// Property: filtering the survivors again keeps all of them
    #[test]
    fn prop_filter_is_idempotent(
        candidates in prop::collection::vec(candidate(), 0..8),
        selection in selection(),
    ) {
        let passing = filter_candidates(&candidates, &TEST_CASES, &selection);
        let survivors: Vec<Candidate> = passing.iter().map(|&i| candidates[i].clone()).collect();
        let again = filter_candidates(&survivors, &TEST_CASES, &selection);
        prop_assert_eq!(again, (0..survivors.len()).collect::<Vec<_>>());
    }

    /// Property: selecting one more name yields a subset
    #[test]
    fn prop_more_criteria_never_widen_the_result(
        candidates in prop::collection::vec(candidate(), 0..8),
        selection in selection(),
        test_case in prop::sample::select(TEST_CASES.to_vec()),
        name in attribute_name(),
    ) {
        let before: BTreeSet<usize> = filter_candidates(&candidates, &TEST_CASES, &selection)
            .into_iter()
            .collect();
        let narrowed = if selection.contains(test_case, &name) {
            selection.clone()
        } else {
            selection.with_toggled(test_case, &name)
        };
        let after: BTreeSet<usize> = filter_candidates(&candidates, &TEST_CASES, &narrowed)
            .into_iter()
            .collect();
        prop_assert!(after.is_subset(&before));
    }

    /// Property: an empty selection keeps everything, in order, and leaves
    /// the input untouched
    #[test]
    fn prop_empty_selection_keeps_everything(
        candidates in prop::collection::vec(candidate(), 0..8),
    ) {
        let snapshot = candidates.clone();
        let passing = filter_candidates(&candidates, &TEST_CASES, &FilterSelection::new());
        prop_assert_eq!(passing, (0..candidates.len()).collect::<Vec<_>>());
        prop_assert_eq!(candidates, snapshot);
    }

    /// Property: ranking permutes its input and orders scores descending
    #[test]
    fn prop_rank_is_a_sorted_permutation(
        candidates in prop::collection::vec(candidate(), 0..8),
    ) {
        let indices: Vec<usize> = (0..candidates.len()).rev().collect();
        let ranked = rank_by_score(&candidates, &indices);

        let mut sorted = ranked.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..candidates.len()).collect::<Vec<_>>());
        prop_assert!(ranked
            .windows(2)
            .all(|w| candidates[w[0]].score >= candidates[w[1]].score));
    }

    /// Property: choice sets are disjoint, skip current criteria and cover
    /// every input test case
    #[test]
    fn prop_filter_choices_are_consistent(
        candidates in prop::collection::vec(candidate(), 0..8),
        current in selection(),
        boolean in any::<bool>(),
    ) {
        let namespace = if boolean { Namespace::Boolean } else { Namespace::String };
        let choices = derive_filter_choices(&candidates, &TEST_CASES, &current, namespace);

        for test_case in TEST_CASES {
            let selectable = &choices.selectable[test_case];
            let fixed = &choices.non_discriminating[test_case];
            prop_assert!(selectable.is_disjoint(fixed));
            prop_assert!(selectable.iter().chain(fixed).all(|n| !current.contains(test_case, n)));

            // Every offered name is satisfied by at least one candidate
            for name in selectable.iter().chain(fixed) {
                prop_assert!(candidates.iter().any(|c| c
                    .classification(test_case, namespace)
                    .is_some_and(|cls| cls.satisfies(name, namespace))));
            }
        }
    }
}
