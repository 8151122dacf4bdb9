//! Preparing a similarity search: report name checks, the `topk` bound,
//! the checklist of attributes offered on the search form and the request
//! body sent to `/Result/{key}`.

use crate::classify::patterns::string_exclusion;
use crate::core::TestSuite;
use crate::error::{CiFinderError, ErrorCode, Result};
use crate::filter::{FilterSelection, NamespacedSelection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Extension every uploaded report must carry. Compared case-sensitively.
pub const REPORT_EXTENSION: &str = ".ste";

pub const DEFAULT_TOPK: u32 = 30;
pub const TOPK_MAX: u32 = 100;

/// Reject a report name that does not end in [`REPORT_EXTENSION`].
pub fn check_report_name(name: &str) -> Result<()> {
    if name.ends_with(REPORT_EXTENSION) {
        Ok(())
    } else {
        Err(CiFinderError::validation(
            ErrorCode::VALIDATION_EXTENSION,
            "This file is not a ste file.",
        ))
    }
}

/// Check a report path and return the file name sent as `fileName`.
pub fn check_report_path(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    check_report_name(name)?;
    Ok(name.to_string())
}

/// Number of candidates requested from a search, within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Topk(u32);

impl Topk {
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= TOPK_MAX)
            .map(Topk)
            .ok_or_else(|| {
                CiFinderError::validation(
                    ErrorCode::VALIDATION_TOPK,
                    format!("topk must be between 0 and {TOPK_MAX}, got {value}"),
                )
            })
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Topk {
    fn default() -> Self {
        Topk(DEFAULT_TOPK)
    }
}

impl TryFrom<i64> for Topk {
    type Error = CiFinderError;

    fn try_from(value: i64) -> Result<Self> {
        Topk::new(value)
    }
}

impl From<Topk> for u32 {
    fn from(topk: Topk) -> Self {
        topk.0
    }
}

impl fmt::Display for Topk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attributes of the input suite offered on the search form.
///
/// Booleans are offered when the input sets them to `true`; strings when
/// they pass the selectability rules, shown with their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchChecklist {
    pub boolean: BTreeMap<String, BTreeSet<String>>,
    pub string: BTreeMap<String, BTreeMap<String, String>>,
}

impl SearchChecklist {
    pub fn build(input: &TestSuite) -> Self {
        let mut checklist = SearchChecklist::default();
        for (test_case, attrs) in &input.test_cases {
            let booleans: BTreeSet<String> = attrs
                .boolean
                .iter()
                .filter(|(_, value)| **value)
                .map(|(name, _)| name.clone())
                .collect();
            let strings: BTreeMap<String, String> = attrs
                .string
                .iter()
                .filter(|(name, value)| string_exclusion(name, value).is_none())
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            checklist.boolean.insert(test_case.clone(), booleans);
            checklist.string.insert(test_case.clone(), strings);
        }
        checklist
    }

    pub fn offers_boolean(&self, test_case: &str, name: &str) -> bool {
        self.boolean
            .get(test_case)
            .is_some_and(|names| names.contains(name))
    }

    pub fn offers_string(&self, test_case: &str, name: &str) -> bool {
        self.string
            .get(test_case)
            .is_some_and(|names| names.contains_key(name))
    }

    /// Reject a selection naming anything the form does not offer.
    pub fn validate(&self, selection: &NamespacedSelection) -> Result<()> {
        let offered = |test_case: &str, name: &str, boolean: bool| {
            if boolean {
                self.offers_boolean(test_case, name)
            } else {
                self.offers_string(test_case, name)
            }
        };
        for (boolean, sel) in [(true, &selection.boolean), (false, &selection.string)] {
            for (test_case, names) in sel.iter() {
                if let Some(name) = names.iter().find(|n| !offered(test_case, n, boolean)) {
                    return Err(CiFinderError::validation(
                        ErrorCode::VALIDATION_SELECTION,
                        format!(
                            "{} attribute '{}' is not offered for test case '{}'",
                            if boolean { "boolean" } else { "string" },
                            name,
                            test_case
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TclFilterItem {
    pub test_case: String,
    pub items: Vec<String>,
}

/// Body of `/Result/{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub topk: Topk,
    pub test_case_boolean: Vec<TclFilterItem>,
    pub test_case_string: Vec<TclFilterItem>,
}

impl SearchRequest {
    pub fn new(topk: Topk, selection: &NamespacedSelection) -> Self {
        Self {
            topk,
            test_case_boolean: items(&selection.boolean),
            test_case_string: items(&selection.string),
        }
    }

    /// The selection this request was built from.
    pub fn criteria(&self) -> NamespacedSelection {
        let collect = |items: &[TclFilterItem]| -> FilterSelection {
            items
                .iter()
                .map(|item| (item.test_case.clone(), item.items.clone()))
                .collect()
        };
        NamespacedSelection {
            boolean: collect(&self.test_case_boolean),
            string: collect(&self.test_case_string),
        }
    }
}

fn items(selection: &FilterSelection) -> Vec<TclFilterItem> {
    selection
        .iter()
        .map(|(test_case, names)| TclFilterItem {
            test_case: test_case.clone(),
            items: names.iter().cloned().collect(),
        })
        .collect()
}

/// Parse a `TC=name,name` command-line argument.
pub fn parse_selection_arg(arg: &str) -> Result<(String, Vec<String>)> {
    let invalid = || {
        CiFinderError::validation(
            ErrorCode::VALIDATION_SELECTION,
            format!("expected TEST_CASE=name[,name...], got '{arg}'"),
        )
    };
    let (test_case, names) = arg.split_once('=').ok_or_else(invalid)?;
    let test_case = test_case.trim();
    if test_case.is_empty() {
        return Err(invalid());
    }
    let names = names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    Ok((test_case.to_string(), names))
}

/// Build a selection from repeated `TC=name,name` arguments.
pub fn selection_from_args<S: AsRef<str>>(args: &[S]) -> Result<FilterSelection> {
    args.iter()
        .map(|arg| parse_selection_arg(arg.as_ref()))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}
