//! Interactive filtering of a search result.
//!
//! Both operations are pure over an already-fetched candidate list: the
//! caller owns the [`FilterSelection`] and passes it in explicitly.

pub mod ranking;
pub mod selection;

pub use ranking::rank_by_score;
pub use selection::{FilterSelection, NamespacedSelection};

use crate::classify::is_selectable;
use crate::core::{AttributeValue, Candidate, CandidateList, Classification, Namespace};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Attribute names offered as filter criteria, per input test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterChoices {
    /// Matched in some but not all candidates with data.
    pub selectable: BTreeMap<String, BTreeSet<String>>,
    /// Matched in every candidate with data, so filtering on it changes
    /// nothing.
    pub non_discriminating: BTreeMap<String, BTreeSet<String>>,
}

impl FilterChoices {
    pub fn selectable_for(&self, test_case: &str) -> impl Iterator<Item = &String> {
        self.selectable.get(test_case).into_iter().flatten()
    }

    pub fn non_discriminating_for(&self, test_case: &str) -> impl Iterator<Item = &String> {
        self.non_discriminating.get(test_case).into_iter().flatten()
    }
}

/// Work out which attributes of `namespace` are still worth offering as
/// filters.
///
/// Every input test case gets an entry in both maps, possibly empty.
/// Names in `current` are not offered again, and names failing the
/// selectability rules are never offered.
pub fn derive_filter_choices(
    candidates: &[Candidate],
    input_test_cases: &[&str],
    current: &FilterSelection,
    namespace: Namespace,
) -> FilterChoices {
    let mut choices = FilterChoices::default();

    for &test_case in input_test_cases {
        let with_data: Vec<&Classification> = candidates
            .iter()
            .filter_map(|c| c.classification(test_case, namespace))
            .collect();

        let pool = discriminating_pool(&with_data, namespace);
        let mut selectable = BTreeSet::new();
        let mut non_discriminating = BTreeSet::new();

        for (name, value) in pool {
            if current.contains(test_case, name) || !is_selectable(namespace, name, value) {
                continue;
            }
            if with_data.iter().all(|cls| cls.satisfies(name, namespace)) {
                non_discriminating.insert(name.clone());
            } else {
                selectable.insert(name.clone());
            }
        }

        debug!(
            test_case,
            %namespace,
            candidates_with_data = with_data.len(),
            selectable = selectable.len(),
            non_discriminating = non_discriminating.len(),
            "derived filter choices"
        );
        choices.selectable.insert(test_case.to_string(), selectable);
        choices
            .non_discriminating
            .insert(test_case.to_string(), non_discriminating);
    }

    choices
}

/// Names that satisfy a filter in at least one classification, with the
/// matched value.
fn discriminating_pool<'a>(
    classifications: &[&'a Classification],
    namespace: Namespace,
) -> BTreeMap<&'a String, &'a AttributeValue> {
    let mut pool = BTreeMap::new();
    for &cls in classifications {
        for (name, value) in cls.matches() {
            if cls.satisfies(name, namespace) {
                pool.entry(name).or_insert(value);
            }
        }
    }
    pool
}

/// Indices of the candidates satisfying every selected name of every input
/// test case, in their original order.
pub fn filter_candidates(
    candidates: &[Candidate],
    input_test_cases: &[&str],
    selection: &FilterSelection,
) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| satisfies_selection(candidate, input_test_cases, selection))
        .map(|(index, _)| index)
        .collect()
}

fn satisfies_selection(
    candidate: &Candidate,
    input_test_cases: &[&str],
    selection: &FilterSelection,
) -> bool {
    input_test_cases.iter().all(|&test_case| {
        let Some(names) = selection.get(test_case) else {
            return true;
        };
        match candidate.test_cases.get(test_case) {
            Some(classified) => names.iter().all(|name| classified.satisfies(name)),
            None => names.is_empty(),
        }
    })
}

/// Filter state of one namespace as shown on the result page.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceView {
    pub namespace: Namespace,
    /// Criteria already applied by the search request.
    pub applied: FilterSelection,
    pub choices: FilterChoices,
}

/// Everything the result page renders for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub boolean: NamespaceView,
    pub string: NamespaceView,
    pub selection: FilterSelection,
    /// Indices of the candidates passing `selection`, ranked by score.
    pub visible: Vec<usize>,
}

impl FilterView {
    pub fn build(
        list: &CandidateList,
        input_test_cases: &[&str],
        applied: &NamespacedSelection,
        selection: &FilterSelection,
    ) -> Self {
        let namespace_view = |namespace| NamespaceView {
            namespace,
            applied: applied.get(namespace).clone(),
            choices: derive_filter_choices(
                &list.candidates,
                input_test_cases,
                applied.get(namespace),
                namespace,
            ),
        };
        let passing = filter_candidates(&list.candidates, input_test_cases, selection);

        Self {
            boolean: namespace_view(Namespace::Boolean),
            string: namespace_view(Namespace::String),
            selection: selection.clone(),
            visible: rank_by_score(&list.candidates, &passing),
        }
    }

    pub fn namespace(&self, namespace: Namespace) -> &NamespaceView {
        match namespace {
            Namespace::Boolean => &self.boolean,
            Namespace::String => &self.string,
        }
    }
}
