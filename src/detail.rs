//! Per-candidate detail: suite info, issue link and the four difference
//! tables.

use crate::classify::classify_suite;
use crate::classify::patterns::string_exclusion;
use crate::core::{
    Bucket, Candidate, Classification, ClassifiedAttribute, Namespace, TestCaseAttributes,
    TestSuite, TEST_ACTIVITY,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Shown for a test case whose activity is unknown.
const UNDEFINED_ACTIVITY: &str = "undefined";

/// Placeholder the backend uses for an unset string attribute.
const NONE_VALUE: &str = "none";

static ISSUE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{5}").unwrap());

/// First five-digit run in a suite name, the tracker ticket it was made for.
pub fn issue_number(name: &str) -> Option<&str> {
    ISSUE_NUMBER.find(name).map(|m| m.as_str())
}

pub fn issue_link(name: &str, prefix: &str) -> Option<String> {
    issue_number(name).map(|number| format!("{prefix}{number}"))
}

fn label(test_case: &str, activity: Option<&str>) -> String {
    format!(
        "{} ({})",
        test_case,
        activity.unwrap_or(UNDEFINED_ACTIVITY)
    )
}

/// `TC (activity)` labels of the input suite, sorted.
pub fn input_test_case_labels(input: &TestSuite) -> Vec<String> {
    let mut labels: Vec<String> = input
        .test_cases
        .iter()
        .map(|(name, attrs)| label(name, attrs.string.get(TEST_ACTIVITY).map(String::as_str)))
        .collect();
    labels.sort();
    labels
}

/// `TC (activity)` labels of a candidate's own test cases, sorted. The
/// activity comes from the classification, so test cases the input does
/// not share show as undefined.
pub fn candidate_test_case_labels(candidate: &Candidate) -> Vec<String> {
    let mut labels: Vec<String> = candidate
        .own_test_cases
        .keys()
        .map(|name| {
            let activity = candidate
                .test_cases
                .get(name)
                .and_then(|tc| tc.test_activity.as_deref());
            label(name, activity)
        })
        .collect();
    labels.sort();
    labels
}

/// An attribute both suites carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoexistRow {
    pub test_case: String,
    pub name: String,
    pub namespace: Namespace,
    pub input: String,
    pub candidate: String,
}

/// An attribute only one suite carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusiveRow {
    pub test_case: String,
    pub name: String,
    pub namespace: Namespace,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffTables {
    pub matched: Vec<CoexistRow>,
    pub mismatched: Vec<CoexistRow>,
    pub only_input: Vec<ExclusiveRow>,
    pub only_candidate: Vec<ExclusiveRow>,
}

impl DiffTables {
    pub fn build(candidate: &Candidate) -> Self {
        let mut tables = DiffTables::default();
        for (test_case, classified) in &candidate.test_cases {
            for namespace in Namespace::ALL {
                let Some(cls) = classified.namespace(namespace) else {
                    continue;
                };
                for (name, attribute) in cls.iter() {
                    tables.push(test_case, name, namespace, attribute);
                }
            }
        }
        tables.sort();
        tables
    }

    fn push(
        &mut self,
        test_case: &str,
        name: &str,
        namespace: Namespace,
        attribute: &ClassifiedAttribute,
    ) {
        let coexist = |input: String, candidate: String| CoexistRow {
            test_case: test_case.to_string(),
            name: name.to_string(),
            namespace,
            input,
            candidate,
        };
        let exclusive = |value: String| ExclusiveRow {
            test_case: test_case.to_string(),
            name: name.to_string(),
            namespace,
            value,
        };
        match attribute {
            ClassifiedAttribute::Match { value } => self
                .matched
                .push(coexist(value.to_string(), value.to_string())),
            ClassifiedAttribute::Mismatch { input, candidate } => self
                .mismatched
                .push(coexist(input.to_string(), candidate.to_string())),
            ClassifiedAttribute::OnlyInput { value } => {
                self.only_input.push(exclusive(value.to_string()))
            }
            ClassifiedAttribute::OnlyCandidate { value } => {
                self.only_candidate.push(exclusive(value.to_string()))
            }
        }
    }

    fn sort(&mut self) {
        let coexist_key = |r: &CoexistRow| (r.test_case.clone(), r.name.clone(), r.namespace);
        let exclusive_key = |r: &ExclusiveRow| (r.test_case.clone(), r.name.clone(), r.namespace);
        self.matched.sort_by_key(coexist_key);
        self.mismatched.sort_by_key(coexist_key);
        self.only_input.sort_by_key(exclusive_key);
        self.only_candidate.sort_by_key(exclusive_key);
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Match => self.matched.len(),
            Bucket::Mismatch => self.mismatched.len(),
            Bucket::OnlyInput => self.only_input.len(),
            Bucket::OnlyCandidate => self.only_candidate.len(),
        }
    }
}

/// Test cases whose classification, redone locally from the candidate's own
/// attributes, puts some attribute in a different bucket than the backend.
///
/// Test cases the candidate did not send raw attributes for are skipped.
/// Strings are compared only when both sides carry a TestActivity, and only
/// those the backend keeps: `none` values and excluded strings are dropped
/// before classifying.
pub fn classification_drift(input: &TestSuite, candidate: &Candidate) -> Vec<String> {
    let input_view = TestSuite {
        test_cases: backend_view(&input.test_cases),
        ..input.clone()
    };
    let local = classify_suite(&input_view, &backend_view(&candidate.own_test_cases));
    candidate
        .test_cases
        .iter()
        .filter(|(name, remote)| {
            let Some(local) = local.get(*name) else {
                return false;
            };
            let strings_compared = has_activity(&input.test_cases, name)
                && has_activity(&candidate.own_test_cases, name);
            Namespace::ALL
                .iter()
                .filter(|&&ns| ns == Namespace::Boolean || strings_compared)
                .any(|&ns| match (remote.namespace(ns), local.namespace(ns)) {
                    (Some(remote), Some(local)) => buckets(remote, ns) != buckets(local, ns),
                    _ => false,
                })
        })
        .map(|(name, _)| name.clone())
        .collect()
}

fn has_activity(test_cases: &BTreeMap<String, TestCaseAttributes>, name: &str) -> bool {
    test_cases
        .get(name)
        .is_some_and(|tc| tc.test_activity().is_some())
}

fn kept_by_backend(name: &str, value: &str) -> bool {
    value != NONE_VALUE && string_exclusion(name, value).is_none()
}

fn backend_view(
    test_cases: &BTreeMap<String, TestCaseAttributes>,
) -> BTreeMap<String, TestCaseAttributes> {
    test_cases
        .iter()
        .map(|(name, tc)| {
            let string = tc
                .string
                .iter()
                .filter(|(attr, value)| kept_by_backend(attr, value))
                .map(|(attr, value)| (attr.clone(), value.clone()))
                .collect();
            let view = TestCaseAttributes {
                boolean: tc.boolean.clone(),
                string,
            };
            (name.clone(), view)
        })
        .collect()
}

fn buckets(cls: &Classification, ns: Namespace) -> BTreeMap<&str, Bucket> {
    cls.iter()
        .filter(|(name, attribute)| ns == Namespace::Boolean || counted(name, attribute))
        .map(|(name, attribute)| (name.as_str(), attribute.bucket()))
        .collect()
}

// Anything the backend drops, TestActivity included, never counts.
fn counted(name: &str, attribute: &ClassifiedAttribute) -> bool {
    [attribute.input_value(), attribute.candidate_value()]
        .into_iter()
        .flatten()
        .all(|value| kept_by_backend(name, &value.to_string()))
}

/// Everything the detail view shows for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    pub index: usize,
    pub name: String,
    pub score: f64,
    pub downloadable: bool,
    pub issue_link: Option<String>,
    pub test_case_labels: Vec<String>,
    pub tables: DiffTables,
}

impl CandidateDetail {
    /// `issue_prefix` is the tracker URL the ticket number is appended to;
    /// without one no link is produced.
    pub fn build(index: usize, candidate: &Candidate, issue_prefix: Option<&str>) -> Self {
        Self {
            index,
            name: candidate.name.clone(),
            score: candidate.score,
            downloadable: candidate.is_downloadable(),
            issue_link: issue_prefix.and_then(|prefix| issue_link(&candidate.name, prefix)),
            test_case_labels: candidate_test_case_labels(candidate),
            tables: DiffTables::build(candidate),
        }
    }
}
