//! The session file: what one upload/search round trip left behind.
//!
//! Commands run one at a time, so the state the web page kept between
//! clicks lives in a JSON file instead. It holds backend payloads as
//! received plus the search request that produced the result. The
//! interactive filter selection is never stored.
//!
//! Updates build a new [`Session`] and validate it before anything is
//! written, so a failed call leaves the file untouched.

use crate::core::{Candidate, CandidateList, TestSuite, WireCandidateList, WireTestSuite};
use crate::error::{CiFinderError, ErrorCode, Result};
use crate::filter::NamespacedSelection;
use crate::io;
use crate::search::SearchRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default session file name in the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".cifinder-session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub input: WireTestSuite,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<SearchRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<WireCandidateList>,
}

impl Session {
    /// Start a session from an upload response.
    pub fn new(input: WireTestSuite) -> Result<Self> {
        TestSuite::try_from(&input)?;
        Ok(Self {
            input,
            request: None,
            result: None,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = io::read_file(path)?;
        let session: Session = serde_json::from_str(&contents).map_err(|e| {
            CiFinderError::session(
                ErrorCode::SESSION_GENERIC,
                format!("cannot read session {}: {}", path.display(), e),
            )
        })?;
        debug!(path = %path.display(), "loaded session");
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CiFinderError::session(ErrorCode::SESSION_GENERIC, e.to_string())
        })?;
        io::write_file(path, &contents)?;
        debug!(path = %path.display(), "saved session");
        Ok(())
    }

    /// Session key the backend issued on upload.
    pub fn key(&self) -> Result<&str> {
        self.input.key.as_deref().ok_or_else(|| {
            CiFinderError::session(
                ErrorCode::SESSION_GENERIC,
                "the session has no key; upload the report again",
            )
        })
    }

    pub fn input_suite(&self) -> Result<TestSuite> {
        TestSuite::try_from(&self.input)
    }

    pub fn candidates(&self) -> Result<CandidateList> {
        let wire = self.result.as_ref().ok_or_else(|| {
            CiFinderError::session(
                ErrorCode::SESSION_NO_RESULT,
                "no search result yet; run `cifinder search` first",
            )
        })?;
        CandidateList::try_from(wire)
    }

    /// The selection the stored search was run with.
    pub fn applied_selection(&self) -> NamespacedSelection {
        self.request
            .as_ref()
            .map(SearchRequest::criteria)
            .unwrap_or_default()
    }

    /// A new session holding a search result. The result is validated
    /// first; a result that does not ingest is an error.
    pub fn with_result(&self, request: SearchRequest, result: WireCandidateList) -> Result<Self> {
        CandidateList::try_from(&result)?;
        Ok(Self {
            input: self.input.clone(),
            request: Some(request),
            result: Some(result),
        })
    }
}

/// Candidate at a backend-order index.
pub fn candidate_at(list: &CandidateList, index: usize) -> Result<&Candidate> {
    list.get(index).ok_or_else(|| {
        CiFinderError::session(
            ErrorCode::SESSION_INDEX,
            format!(
                "no candidate at index {} (the result has {})",
                index,
                list.len()
            ),
        )
    })
}
