use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The two attribute namespaces a test case carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Boolean,
    String,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Boolean, Namespace::String];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute value. Booleans and strings never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Text(String),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The four mutually exclusive outcomes of comparing one attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Match,
    Mismatch,
    OnlyInput,
    OnlyCandidate,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Match,
        Bucket::Mismatch,
        Bucket::OnlyInput,
        Bucket::OnlyCandidate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::OnlyInput => "only-input",
            Self::OnlyCandidate => "only-candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifiedAttribute {
    Match {
        value: AttributeValue,
    },
    Mismatch {
        input: AttributeValue,
        candidate: AttributeValue,
    },
    OnlyInput {
        value: AttributeValue,
    },
    OnlyCandidate {
        value: AttributeValue,
    },
}

impl ClassifiedAttribute {
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Match { .. } => Bucket::Match,
            Self::Mismatch { .. } => Bucket::Mismatch,
            Self::OnlyInput { .. } => Bucket::OnlyInput,
            Self::OnlyCandidate { .. } => Bucket::OnlyCandidate,
        }
    }

    /// The shared value when this attribute is a match.
    pub fn matched_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Match { value } => Some(value),
            _ => None,
        }
    }

    /// Value as recorded in the input suite, if it has one.
    pub fn input_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Match { value } | Self::OnlyInput { value } => Some(value),
            Self::Mismatch { input, .. } => Some(input),
            Self::OnlyCandidate { .. } => None,
        }
    }

    /// Value as recorded in the candidate suite, if it has one.
    pub fn candidate_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Match { value } | Self::OnlyCandidate { value } => Some(value),
            Self::Mismatch { candidate, .. } => Some(candidate),
            Self::OnlyInput { .. } => None,
        }
    }
}

/// Classified attributes of one namespace of one test case.
///
/// Keys are unique, so each attribute name sits in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classification {
    attributes: BTreeMap<String, ClassifiedAttribute>,
}

impl Classification {
    pub fn new(attributes: BTreeMap<String, ClassifiedAttribute>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&ClassifiedAttribute> {
        self.attributes.get(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClassifiedAttribute)> {
        self.attributes.iter()
    }

    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = (&String, &ClassifiedAttribute)> {
        self.attributes
            .iter()
            .filter(move |(_, attr)| attr.bucket() == bucket)
    }

    /// Attributes classified as `match`, with their shared value.
    pub fn matches(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes
            .iter()
            .filter_map(|(name, attr)| attr.matched_value().map(|v| (name, v)))
    }

    /// Whether `name` counts as a satisfied filter criterion in this namespace.
    ///
    /// Boolean attributes must match with value `true`; string attributes
    /// only need to be in the `match` bucket.
    pub fn satisfies(&self, name: &str, namespace: Namespace) -> bool {
        match self.get(name).and_then(ClassifiedAttribute::matched_value) {
            Some(value) => match namespace {
                Namespace::Boolean => value.is_true(),
                Namespace::String => true,
            },
            None => false,
        }
    }
}

/// Raw attributes of one test case in a parsed report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestCaseAttributes {
    pub boolean: BTreeMap<String, bool>,
    pub string: BTreeMap<String, String>,
}

impl TestCaseAttributes {
    pub fn values(&self, namespace: Namespace) -> BTreeMap<String, AttributeValue> {
        match namespace {
            Namespace::Boolean => self
                .boolean
                .iter()
                .map(|(k, v)| (k.clone(), AttributeValue::Bool(*v)))
                .collect(),
            Namespace::String => self
                .string
                .iter()
                .map(|(k, v)| (k.clone(), AttributeValue::Text(v.clone())))
                .collect(),
        }
    }

    pub fn test_activity(&self) -> Option<&str> {
        self.string.get(TEST_ACTIVITY).map(String::as_str)
    }
}

/// String attribute naming the activity a test case performs.
pub const TEST_ACTIVITY: &str = "TestActivity";

/// The uploaded report as parsed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestSuite {
    /// Session key issued by the backend on upload.
    pub key: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub test_cases: BTreeMap<String, TestCaseAttributes>,
}

impl TestSuite {
    pub fn test_case_names(&self) -> Vec<&str> {
        self.test_cases.keys().map(String::as_str).collect()
    }
}

/// Classification of one test case of a candidate, per namespace.
///
/// `None` means the candidate has no data for that namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedTestCase {
    pub boolean: Option<Classification>,
    pub string: Option<Classification>,
    /// The candidate's `TestActivity` for this test case.
    pub test_activity: Option<String>,
}

impl ClassifiedTestCase {
    pub fn namespace(&self, namespace: Namespace) -> Option<&Classification> {
        match namespace {
            Namespace::Boolean => self.boolean.as_ref(),
            Namespace::String => self.string.as_ref(),
        }
    }

    /// A selected attribute name is satisfied by a true boolean match or a
    /// string match.
    pub fn satisfies(&self, name: &str) -> bool {
        Namespace::ALL.iter().any(|ns| {
            self.namespace(*ns)
                .is_some_and(|cls| cls.satisfies(name, *ns))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Available,
    Unavailable,
}

/// Where the backend can fetch a reference suite from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TasLocation {
    pub address: String,
    pub library_id: String,
}

/// A reference suite returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub score: f64,
    pub status: DownloadStatus,
    pub tas: Option<TasLocation>,
    /// The candidate's own raw test cases.
    pub own_test_cases: BTreeMap<String, TestCaseAttributes>,
    /// Classification against the input, for test cases both suites share.
    pub test_cases: BTreeMap<String, ClassifiedTestCase>,
}

impl Candidate {
    pub fn classification(&self, test_case: &str, namespace: Namespace) -> Option<&Classification> {
        self.test_cases
            .get(test_case)
            .and_then(|tc| tc.namespace(namespace))
    }

    pub fn is_downloadable(&self) -> bool {
        self.status == DownloadStatus::Available && self.tas.is_some()
    }
}

/// Ordered candidates of one search, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateList {
    pub name: String,
    pub top_score: Option<f64>,
    pub candidates: Vec<Candidate>,
}

impl CandidateList {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }
}
