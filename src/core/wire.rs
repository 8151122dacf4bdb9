//! Backend JSON shapes and their conversion into the typed model.
//!
//! The backend types attribute values only at runtime, so every value is
//! read as a `serde_json::Value` and checked against its namespace here.
//! Past this boundary the rest of the crate only sees [`TestSuite`] and
//! [`CandidateList`].

use crate::core::types::{
    AttributeValue, Candidate, CandidateList, Classification, ClassifiedAttribute,
    ClassifiedTestCase, DownloadStatus, Namespace, TasLocation, TestCaseAttributes, TestSuite,
};
use crate::error::{CiFinderError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Status value the backend uses for a suite that can be downloaded.
const DOWNLOADABLE_STATUS: &str = "1";

/// Decode a backend response body.
///
/// The backend serializes its payload with `json.dumps` and returns that
/// string as JSON, so the body is usually a JSON string holding the
/// document. A plain JSON document is accepted as well.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        other => Ok(serde_json::from_value(other)?),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTestCaseData {
    #[serde(default)]
    pub boolean: BTreeMap<String, Value>,
    #[serde(default)]
    pub string: BTreeMap<String, Value>,
}

/// Response of `/Input`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTestSuite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "tclData", default)]
    pub tcl_data: BTreeMap<String, WireTestCaseData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMismatch {
    pub input: Value,
    pub target: Value,
}

/// One namespace of the backend's per-test-case difference analysis.
///
/// `{}` deserializes with every bucket `None`, which means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireNamespaceAnalysis {
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<BTreeMap<String, WireMismatch>>,
    #[serde(rename = "onlyInput", default, skip_serializing_if = "Option::is_none")]
    pub only_input: Option<BTreeMap<String, Value>>,
    #[serde(rename = "onlyCI", default, skip_serializing_if = "Option::is_none")]
    pub only_ci: Option<BTreeMap<String, Value>>,
    /// Added next to the buckets of the string namespace.
    #[serde(rename = "TestActivity", default, skip_serializing_if = "Option::is_none")]
    pub test_activity: Option<WireMismatch>,
}

impl WireNamespaceAnalysis {
    fn has_data(&self) -> bool {
        self.matched.is_some()
            || self.mismatch.is_some()
            || self.only_input.is_some()
            || self.only_ci.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTestCaseAnalysis {
    #[serde(default)]
    pub boolean: WireNamespaceAnalysis,
    #[serde(default)]
    pub string: WireNamespaceAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTas {
    pub address: String,
    #[serde(rename = "libraryId")]
    pub library_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCandidate {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(rename = "TAS", default, skip_serializing_if = "Option::is_none")]
    pub tas: Option<WireTas>,
    #[serde(rename = "tclData", default)]
    pub tcl_data: BTreeMap<String, WireTestCaseData>,
    #[serde(rename = "testCase", default)]
    pub test_case: BTreeMap<String, WireTestCaseAnalysis>,
}

/// Response of `/Result/{key}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireCandidateList {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "topScore", default, skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f64>,
    #[serde(default)]
    pub info: Vec<WireCandidate>,
}

fn expect_value(
    value: &Value,
    namespace: Namespace,
    test_case: &str,
    attribute: &str,
) -> Result<Option<AttributeValue>> {
    match (namespace, value) {
        (Namespace::Boolean, Value::Bool(b)) => Ok(Some(AttributeValue::Bool(*b))),
        (Namespace::String, Value::String(s)) => Ok(Some(AttributeValue::Text(s.clone()))),
        // The parser leaves unset string variables as null.
        (Namespace::String, Value::Null) => Ok(None),
        (Namespace::Boolean, _) => Err(CiFinderError::ingest_type(test_case, attribute, "boolean")),
        (Namespace::String, _) => Err(CiFinderError::ingest_type(test_case, attribute, "string")),
    }
}

fn convert_attributes(test_case: &str, data: &WireTestCaseData) -> Result<TestCaseAttributes> {
    let mut attributes = TestCaseAttributes::default();
    for (name, value) in &data.boolean {
        if let Some(AttributeValue::Bool(b)) = expect_value(value, Namespace::Boolean, test_case, name)? {
            attributes.boolean.insert(name.clone(), b);
        }
    }
    for (name, value) in &data.string {
        if let Some(AttributeValue::Text(s)) = expect_value(value, Namespace::String, test_case, name)? {
            attributes.string.insert(name.clone(), s);
        }
    }
    Ok(attributes)
}

fn convert_test_cases(
    tcl_data: &BTreeMap<String, WireTestCaseData>,
) -> Result<BTreeMap<String, TestCaseAttributes>> {
    tcl_data
        .iter()
        .map(|(name, data)| Ok((name.clone(), convert_attributes(name, data)?)))
        .collect()
}

fn insert_unique(
    target: &mut BTreeMap<String, ClassifiedAttribute>,
    test_case: &str,
    name: &str,
    attribute: ClassifiedAttribute,
) -> Result<()> {
    if target.insert(name.to_string(), attribute).is_some() {
        return Err(CiFinderError::ingest(format!(
            "attribute '{}' of test case '{}' is classified more than once",
            name, test_case
        )));
    }
    Ok(())
}

fn convert_analysis(
    analysis: &WireNamespaceAnalysis,
    namespace: Namespace,
    test_case: &str,
) -> Result<Option<Classification>> {
    if !analysis.has_data() {
        return Ok(None);
    }

    let mut attributes = BTreeMap::new();
    let single_buckets: [(&Option<BTreeMap<String, Value>>, fn(AttributeValue) -> ClassifiedAttribute); 3] = [
        (&analysis.matched, |value| ClassifiedAttribute::Match { value }),
        (&analysis.only_input, |value| ClassifiedAttribute::OnlyInput { value }),
        (&analysis.only_ci, |value| ClassifiedAttribute::OnlyCandidate { value }),
    ];
    for (bucket, classify) in single_buckets {
        for (name, value) in bucket.iter().flatten() {
            let Some(value) = expect_value(value, namespace, test_case, name)? else {
                continue;
            };
            insert_unique(&mut attributes, test_case, name, classify(value))?;
        }
    }
    for (name, pair) in analysis.mismatch.iter().flatten() {
        let input = expect_value(&pair.input, namespace, test_case, name)?;
        let candidate = expect_value(&pair.target, namespace, test_case, name)?;
        if let (Some(input), Some(candidate)) = (input, candidate) {
            insert_unique(
                &mut attributes,
                test_case,
                name,
                ClassifiedAttribute::Mismatch { input, candidate },
            )?;
        }
    }

    Ok(Some(Classification::new(attributes)))
}

fn convert_status(status: Option<&Value>) -> DownloadStatus {
    let downloadable = match status {
        Some(Value::String(s)) => s == DOWNLOADABLE_STATUS,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    };
    if downloadable {
        DownloadStatus::Available
    } else {
        DownloadStatus::Unavailable
    }
}

fn value_to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TryFrom<&WireTestSuite> for TestSuite {
    type Error = CiFinderError;

    fn try_from(wire: &WireTestSuite) -> Result<Self> {
        Ok(TestSuite {
            key: wire.key.clone(),
            name: wire.name.clone(),
            description: wire
                .description
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
            keywords: wire.keywords.clone(),
            test_cases: convert_test_cases(&wire.tcl_data)?,
        })
    }
}

impl TryFrom<&WireCandidate> for Candidate {
    type Error = CiFinderError;

    fn try_from(wire: &WireCandidate) -> Result<Self> {
        let mut test_cases = BTreeMap::new();
        for (name, analysis) in &wire.test_case {
            let classified = ClassifiedTestCase {
                boolean: convert_analysis(&analysis.boolean, Namespace::Boolean, name)?,
                string: convert_analysis(&analysis.string, Namespace::String, name)?,
                test_activity: analysis
                    .string
                    .test_activity
                    .as_ref()
                    .and_then(|pair| pair.target.as_str())
                    .map(str::to_string),
            };
            test_cases.insert(name.clone(), classified);
        }

        Ok(Candidate {
            name: wire.name.clone(),
            score: wire.score,
            status: convert_status(wire.status.as_ref()),
            tas: wire.tas.as_ref().map(|tas| TasLocation {
                address: tas.address.clone(),
                library_id: value_to_plain_string(&tas.library_id),
            }),
            own_test_cases: convert_test_cases(&wire.tcl_data)?,
            test_cases,
        })
    }
}

impl TryFrom<&WireCandidateList> for CandidateList {
    type Error = CiFinderError;

    fn try_from(wire: &WireCandidateList) -> Result<Self> {
        Ok(CandidateList {
            name: wire.name.clone(),
            top_score: wire.top_score,
            candidates: wire
                .info
                .iter()
                .map(Candidate::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Bucket;
    use crate::error::ErrorCode;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const CANDIDATE_LIST: &str = indoc! {r#"
        {
            "name": "customer",
            "topScore": 12,
            "info": [
                {
                    "name": "LS-12345 volte b2b",
                    "score": 12,
                    "status": "1",
                    "TAS": {"address": "10.0.0.5", "libraryId": 7},
                    "tclData": {"TC1": {"boolean": {"ready": true}, "string": {}}},
                    "testCase": {
                        "TC1": {
                            "boolean": {
                                "match": {"ready": true},
                                "mismatch": {"ipsec": {"input": true, "target": false}},
                                "onlyInput": {"volte": true},
                                "onlyCI": {"extra": false}
                            },
                            "string": {
                                "match": {"mode": "auto"},
                                "mismatch": {},
                                "onlyInput": {},
                                "onlyCI": {},
                                "TestActivity": {"input": "Capacity", "target": "Capacity"}
                            }
                        },
                        "TC2": {"boolean": {}, "string": {}}
                    }
                }
            ]
        }
    "#};

    #[test]
    fn test_decode_double_encoded_payload() {
        let inner = r#"{"name": "suite", "tclData": {}}"#;
        let body = serde_json::to_string(inner).unwrap();
        let wire: WireTestSuite = decode_payload(&body).unwrap();
        assert_eq!(wire.name, "suite");

        let plain: WireTestSuite = decode_payload(inner).unwrap();
        assert_eq!(plain, wire);
    }

    #[test]
    fn test_candidate_list_ingest() {
        let wire: WireCandidateList = decode_payload(CANDIDATE_LIST).unwrap();
        let list = CandidateList::try_from(&wire).unwrap();
        assert_eq!(list.len(), 1);

        let candidate = &list.candidates[0];
        assert_eq!(candidate.status, DownloadStatus::Available);
        assert_eq!(
            candidate.tas,
            Some(TasLocation {
                address: "10.0.0.5".to_string(),
                library_id: "7".to_string(),
            })
        );

        let tc1 = &candidate.test_cases["TC1"];
        assert_eq!(tc1.test_activity.as_deref(), Some("Capacity"));
        let boolean = tc1.boolean.as_ref().unwrap();
        let buckets: Vec<Bucket> = ["ready", "ipsec", "volte", "extra"]
            .iter()
            .map(|n| boolean.get(n).unwrap().bucket())
            .collect();
        assert_eq!(
            buckets,
            vec![
                Bucket::Match,
                Bucket::Mismatch,
                Bucket::OnlyInput,
                Bucket::OnlyCandidate
            ]
        );

        // TestActivity is lifted out, not treated as an attribute
        let string = tc1.string.as_ref().unwrap();
        assert_eq!(string.len(), 1);
        assert!(string.get("TestActivity").is_none());

        let tc2 = &candidate.test_cases["TC2"];
        assert!(tc2.boolean.is_none());
        assert!(tc2.string.is_none());
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let body = r#"{"name": "x", "tclData": {"TC1": {"boolean": {"ready": "yes"}}}}"#;
        let wire: WireTestSuite = decode_payload(body).unwrap();
        let err = TestSuite::try_from(&wire).unwrap_err();
        assert_eq!(err.code(), ErrorCode::INGEST_TYPE);
    }

    #[test]
    fn test_null_string_values_are_dropped() {
        let body = r#"{"name": "x", "tclData": {"TC1": {"string": {"Apn": null, "mode": "auto"}}}}"#;
        let wire: WireTestSuite = decode_payload(body).unwrap();
        let suite = TestSuite::try_from(&wire).unwrap();
        let tc1 = &suite.test_cases["TC1"];
        assert_eq!(tc1.string.len(), 1);
        assert_eq!(tc1.string["mode"], "auto");
    }

    #[test]
    fn test_duplicate_classification_is_rejected() {
        let body = indoc! {r#"
            {"info": [{"name": "b2b", "testCase": {"TC1": {
                "boolean": {"match": {"ready": true}, "onlyCI": {"ready": true}}
            }}}]}
        "#};
        let wire: WireCandidateList = decode_payload(body).unwrap();
        assert!(CandidateList::try_from(&wire).is_err());
    }

    #[test]
    fn test_missing_status_is_not_downloadable() {
        let body = r#"{"info": [{"name": "b2b", "score": 3.5}]}"#;
        let wire: WireCandidateList = decode_payload(body).unwrap();
        let list = CandidateList::try_from(&wire).unwrap();
        assert!(!list.candidates[0].is_downloadable());
    }
}
