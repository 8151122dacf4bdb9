// Test utility module for cifinder integration tests
#![allow(dead_code)]

use cifinder::{
    AttributeValue, Candidate, Classification, ClassifiedAttribute, ClassifiedTestCase,
    DownloadStatus, Session,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

pub fn load_fixture_session() -> Session {
    Session::load(&fixture_path("session.json")).expect("fixture session should load")
}

/// Copy the fixture session into a fresh temp dir so a test can modify it.
pub fn session_in_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("session.json");
    fs::copy(fixture_path("session.json"), &path).expect("Failed to copy fixture session");
    (temp_dir, path)
}

pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

/// Builder for a classified test case with both namespaces present.
#[derive(Debug, Default, Clone)]
pub struct TestCaseBuilder {
    boolean: BTreeMap<String, ClassifiedAttribute>,
    string: BTreeMap<String, ClassifiedAttribute>,
    activity: Option<String>,
}

impl TestCaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bool_match(mut self, name: &str, value: bool) -> Self {
        self.boolean.insert(
            name.to_string(),
            ClassifiedAttribute::Match {
                value: AttributeValue::Bool(value),
            },
        );
        self
    }

    pub fn bool_mismatch(mut self, name: &str, input: bool) -> Self {
        self.boolean.insert(
            name.to_string(),
            ClassifiedAttribute::Mismatch {
                input: AttributeValue::Bool(input),
                candidate: AttributeValue::Bool(!input),
            },
        );
        self
    }

    pub fn bool_only_input(mut self, name: &str, value: bool) -> Self {
        self.boolean.insert(
            name.to_string(),
            ClassifiedAttribute::OnlyInput {
                value: AttributeValue::Bool(value),
            },
        );
        self
    }

    pub fn bool_only_candidate(mut self, name: &str, value: bool) -> Self {
        self.boolean.insert(
            name.to_string(),
            ClassifiedAttribute::OnlyCandidate {
                value: AttributeValue::Bool(value),
            },
        );
        self
    }

    pub fn text_match(mut self, name: &str, value: &str) -> Self {
        self.string.insert(
            name.to_string(),
            ClassifiedAttribute::Match {
                value: AttributeValue::from(value),
            },
        );
        self
    }

    pub fn text_mismatch(mut self, name: &str, input: &str, candidate: &str) -> Self {
        self.string.insert(
            name.to_string(),
            ClassifiedAttribute::Mismatch {
                input: AttributeValue::from(input),
                candidate: AttributeValue::from(candidate),
            },
        );
        self
    }

    pub fn activity(mut self, activity: &str) -> Self {
        self.activity = Some(activity.to_string());
        self
    }

    pub fn build(self) -> ClassifiedTestCase {
        ClassifiedTestCase {
            boolean: Some(Classification::new(self.boolean)),
            string: Some(Classification::new(self.string)),
            test_activity: self.activity,
        }
    }
}

pub fn candidate(name: &str, score: f64, test_cases: Vec<(&str, ClassifiedTestCase)>) -> Candidate {
    Candidate {
        name: name.to_string(),
        score,
        status: DownloadStatus::Unavailable,
        tas: None,
        own_test_cases: BTreeMap::new(),
        test_cases: test_cases
            .into_iter()
            .map(|(tc, classified)| (tc.to_string(), classified))
            .collect(),
    }
}
