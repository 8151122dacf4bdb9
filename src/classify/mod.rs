//! Attribute classification.
//!
//! Compares the attributes an input suite and a candidate suite record for
//! the same test case and namespace, putting every attribute name into
//! exactly one of four buckets: match, mismatch, only-input or
//! only-candidate. This is the rule the backend applies before it returns
//! a search result; it is reproduced here so results can be re-derived
//! client-side.

pub mod patterns;

pub use patterns::{is_selectable, selection_exclusion, Exclusion, NOISE_PATTERNS};

use crate::core::{
    AttributeValue, Classification, ClassifiedAttribute, ClassifiedTestCase, Namespace,
    TestCaseAttributes, TestSuite,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Classify one namespace of one test case.
///
/// Equality is type-aware: `Bool(true)` never equals `Text("true")`.
pub fn classify(
    input: &BTreeMap<String, AttributeValue>,
    candidate: &BTreeMap<String, AttributeValue>,
) -> Classification {
    let mut attributes = BTreeMap::new();
    for (name, a) in input {
        let attribute = match candidate.get(name) {
            Some(b) if a == b => ClassifiedAttribute::Match { value: a.clone() },
            Some(b) => ClassifiedAttribute::Mismatch {
                input: a.clone(),
                candidate: b.clone(),
            },
            None => ClassifiedAttribute::OnlyInput { value: a.clone() },
        };
        attributes.insert(name.clone(), attribute);
    }
    for (name, b) in candidate {
        if !input.contains_key(name) {
            attributes.insert(
                name.clone(),
                ClassifiedAttribute::OnlyCandidate { value: b.clone() },
            );
        }
    }

    Classification::new(attributes)
}

/// Classify both namespaces of a test case present in both suites.
pub fn classify_test_case(
    input: &TestCaseAttributes,
    candidate: &TestCaseAttributes,
) -> ClassifiedTestCase {
    ClassifiedTestCase {
        boolean: Some(classify(
            &input.values(Namespace::Boolean),
            &candidate.values(Namespace::Boolean),
        )),
        string: Some(classify(
            &input.values(Namespace::String),
            &candidate.values(Namespace::String),
        )),
        test_activity: candidate.test_activity().map(str::to_string),
    }
}

/// Classify every test case the input shares with a candidate.
///
/// Test cases the candidate never recorded are left out rather than
/// reported as all only-input.
pub fn classify_suite(
    input: &TestSuite,
    candidate_test_cases: &BTreeMap<String, TestCaseAttributes>,
) -> BTreeMap<String, ClassifiedTestCase> {
    input
        .test_cases
        .iter()
        .filter_map(|(name, attrs)| match candidate_test_cases.get(name) {
            Some(candidate) => Some((name.clone(), classify_test_case(attrs, candidate))),
            None => {
                debug!(test_case = %name, "candidate has no data for test case");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bucket;
    use pretty_assertions::assert_eq;

    fn attrs(entries: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_equal_booleans_match() {
        let result = classify(
            &attrs(&[("ready", true.into())]),
            &attrs(&[("ready", true.into())]),
        );
        assert_eq!(
            result.get("ready"),
            Some(&ClassifiedAttribute::Match { value: true.into() })
        );
    }

    #[test]
    fn test_different_booleans_mismatch() {
        let result = classify(
            &attrs(&[("ready", true.into())]),
            &attrs(&[("ready", false.into())]),
        );
        assert_eq!(
            result.get("ready"),
            Some(&ClassifiedAttribute::Mismatch {
                input: true.into(),
                candidate: false.into(),
            })
        );
    }

    #[test]
    fn test_missing_in_candidate_is_only_input() {
        let result = classify(&attrs(&[("mode", "auto".into())]), &attrs(&[]));
        assert_eq!(
            result.get("mode"),
            Some(&ClassifiedAttribute::OnlyInput {
                value: "auto".into()
            })
        );
    }

    #[test]
    fn test_missing_in_input_is_only_candidate() {
        let result = classify(&attrs(&[]), &attrs(&[("mode", "manual".into())]));
        assert_eq!(result.get("mode").map(|a| a.bucket()), Some(Bucket::OnlyCandidate));
    }

    #[test]
    fn test_type_aware_equality() {
        let result = classify(
            &attrs(&[("flag", true.into())]),
            &attrs(&[("flag", "true".into())]),
        );
        assert_eq!(result.get("flag").map(|a| a.bucket()), Some(Bucket::Mismatch));
    }

    #[test]
    fn test_noisy_strings_are_still_classified() {
        let result = classify(
            &attrs(&[("TestActivity", "Capacity".into()), ("Ip", "10.0.0.1".into())]),
            &attrs(&[("TestActivity", "Capacity".into()), ("Ip", "10.0.0.1".into())]),
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.matches().count(), 2);
    }

    #[test]
    fn test_classify_suite_skips_test_cases_missing_from_candidate() {
        let mut tc = TestCaseAttributes::default();
        tc.boolean.insert("ready".to_string(), true);
        tc.string
            .insert("TestActivity".to_string(), "Capacity".to_string());

        let input = TestSuite {
            name: "input".to_string(),
            test_cases: [
                ("TC1".to_string(), tc.clone()),
                ("TC2".to_string(), tc.clone()),
            ]
            .into_iter()
            .collect(),
            ..TestSuite::default()
        };
        let candidate: BTreeMap<String, TestCaseAttributes> =
            [("TC1".to_string(), tc)].into_iter().collect();

        let result = classify_suite(&input, &candidate);
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["TC1"]);
        assert_eq!(result["TC1"].test_activity.as_deref(), Some("Capacity"));
        assert!(result["TC1"].satisfies("ready"));
    }
}
