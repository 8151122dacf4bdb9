use crate::core::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Attribute names checked as filter criteria, per test case.
///
/// A selection is a plain value: every change returns a new selection and
/// leaves the old one untouched. Test cases whose set becomes empty are
/// dropped, so an emptied selection equals a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    per_test_case: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, test_case: &str) -> Option<&BTreeSet<String>> {
        self.per_test_case.get(test_case)
    }

    pub fn contains(&self, test_case: &str, name: &str) -> bool {
        self.get(test_case).is_some_and(|names| names.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.per_test_case.is_empty()
    }

    /// Total number of checked names across test cases.
    pub fn len(&self) -> usize {
        self.per_test_case.values().map(BTreeSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.per_test_case.iter()
    }

    /// Check `name` if unchecked, uncheck it otherwise.
    #[must_use]
    pub fn with_toggled(&self, test_case: &str, name: &str) -> Self {
        let mut next = self.clone();
        let names = next
            .per_test_case
            .entry(test_case.to_string())
            .or_default();
        if !names.remove(name) {
            names.insert(name.to_string());
        }
        next.drop_empty();
        next
    }

    /// Replace the checked names of one test case.
    #[must_use]
    pub fn with_replaced<I, S>(&self, test_case: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.per_test_case.insert(
            test_case.to_string(),
            names.into_iter().map(Into::into).collect(),
        );
        next.drop_empty();
        next
    }

    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    fn drop_empty(&mut self) {
        self.per_test_case.retain(|_, names| !names.is_empty());
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for FilterSelection {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(FilterSelection::new(), |acc, (test_case, names)| {
                let test_case = test_case.into();
                let merged: Vec<String> = acc
                    .get(&test_case)
                    .into_iter()
                    .flatten()
                    .cloned()
                    .chain(names)
                    .collect();
                acc.with_replaced(&test_case, merged)
            })
    }
}

/// One selection per namespace, as checked on the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacedSelection {
    pub boolean: FilterSelection,
    pub string: FilterSelection,
}

impl NamespacedSelection {
    pub fn get(&self, namespace: Namespace) -> &FilterSelection {
        match namespace {
            Namespace::Boolean => &self.boolean,
            Namespace::String => &self.string,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boolean.is_empty() && self.string.is_empty()
    }
}
