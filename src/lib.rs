// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod core;
pub mod detail;
pub mod error;
pub mod filter;
pub mod formatting;
pub mod io;
pub mod output;
pub mod progress;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    AttributeValue, Bucket, Candidate, CandidateList, Classification, ClassifiedAttribute,
    ClassifiedTestCase, DownloadStatus, Namespace, TasLocation, TestCaseAttributes, TestSuite,
};

pub use crate::classify::{classify, classify_suite, classify_test_case, is_selectable};

pub use crate::filter::{
    derive_filter_choices, filter_candidates, rank_by_score, FilterChoices, FilterSelection,
    FilterView, NamespacedSelection,
};

pub use crate::client::{Backend, DownloadRequest, HttpBackend};
pub use crate::error::{CiFinderError, ErrorCode, Result};
pub use crate::search::{SearchChecklist, SearchRequest, Topk};
pub use crate::session::Session;
