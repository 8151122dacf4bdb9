//! The three backend calls.
//!
//! [`Backend`] is the seam commands talk to; [`HttpBackend`] is the real
//! implementation over `reqwest`. Each call is a single request with no
//! retry and no timeout. Any failure, transport or status or payload, is
//! folded into one [`CiFinderError::Backend`] per operation.

use crate::core::{decode_payload, Candidate, WireCandidateList, WireTestSuite};
use crate::error::{BackendOperation, CiFinderError, ErrorCode, Result};
use crate::search::SearchRequest;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, info};

/// Query parameters of `/Download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub name: String,
    pub address: String,
    pub library_id: String,
    pub delete_ste: bool,
}

impl DownloadRequest {
    /// Only candidates marked downloadable with a known location qualify.
    pub fn for_candidate(candidate: &Candidate, delete_ste: bool) -> Result<Self> {
        match (&candidate.tas, candidate.is_downloadable()) {
            (Some(tas), true) => Ok(Self {
                name: candidate.name.clone(),
                address: tas.address.clone(),
                library_id: tas.library_id.clone(),
                delete_ste,
            }),
            _ => Err(CiFinderError::validation(
                ErrorCode::VALIDATION_NOT_DOWNLOADABLE,
                format!("'{}' cannot be downloaded", candidate.name),
            )),
        }
    }

    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("name", self.name.clone()),
            ("address", self.address.clone()),
            ("libraryId", self.library_id.clone()),
            ("deleteSte", self.delete_ste.to_string()),
        ]
    }
}

pub trait Backend {
    /// Submit a report; the backend parses it and opens a session.
    fn upload(&self, file_name: &str, contents: Vec<u8>) -> Result<WireTestSuite>;

    /// Run a similarity search for the session `key`.
    fn search(&self, key: &str, request: &SearchRequest) -> Result<WireCandidateList>;

    /// Fetch the raw report of a candidate.
    fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>>;
}

pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Option::<Duration>::None)
            .build()
            .map_err(|e| CiFinderError::config(format!("cannot build HTTP client: {e}"), None))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn a non-success status into a backend error.
fn check_status(operation: BackendOperation, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CiFinderError::backend(
            operation,
            format!("HTTP {}: {}", status, response.text().unwrap_or_default()),
        ))
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    operation: BackendOperation,
    response: Response,
) -> Result<T> {
    let body = response
        .text()
        .map_err(|e| CiFinderError::backend(operation, e))?;
    decode_payload(&body).map_err(|e| CiFinderError::backend(operation, e))
}

impl Backend for HttpBackend {
    fn upload(&self, file_name: &str, contents: Vec<u8>) -> Result<WireTestSuite> {
        let operation = BackendOperation::Upload;
        let url = self.url("Input");
        debug!(%url, file_name, bytes = contents.len(), "uploading report");

        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(contents).file_name(file_name.to_string()),
            )
            .text("fileName", file_name.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| CiFinderError::backend(operation, e))?;
        let suite: WireTestSuite = decode(operation, check_status(operation, response)?)?;

        info!(name = %suite.name, test_cases = suite.tcl_data.len(), "report parsed");
        Ok(suite)
    }

    fn search(&self, key: &str, request: &SearchRequest) -> Result<WireCandidateList> {
        let operation = BackendOperation::Search;
        let url = self.url(&format!("Result/{key}"));
        debug!(%url, topk = request.topk.get(), "searching");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| CiFinderError::backend(operation, e))?;
        let list: WireCandidateList = decode(operation, check_status(operation, response)?)?;

        info!(candidates = list.info.len(), "search finished");
        Ok(list)
    }

    fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        let operation = BackendOperation::Download;
        let url = self.url("Download");
        debug!(%url, name = %request.name, address = %request.address, "downloading");

        let response = self
            .client
            .post(&url)
            .query(&request.query())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| CiFinderError::backend(operation, e))?;
        let bytes = check_status(operation, response)?
            .bytes()
            .map_err(|e| CiFinderError::backend(operation, e))?;

        info!(bytes = bytes.len(), "download finished");
        Ok(bytes.to_vec())
    }
}
