//! Data model shared by every part of cifinder.
//!
//! `types` holds the closed, validated model the engine works on; `wire`
//! holds the backend's JSON shapes and the conversion between the two.

pub mod types;
pub mod wire;

pub use types::{
    AttributeValue, Bucket, Candidate, CandidateList, Classification, ClassifiedAttribute,
    ClassifiedTestCase, DownloadStatus, Namespace, TasLocation, TestCaseAttributes, TestSuite,
    TEST_ACTIVITY,
};
pub use wire::{decode_payload, WireCandidateList, WireTestSuite};
