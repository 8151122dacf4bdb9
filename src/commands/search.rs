use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::results::ResultsReport;
use super::{emit, log_backend_cause, CommandContext};
use crate::cli::OutputFormat;
use crate::client::Backend;
use crate::filter::{FilterSelection, FilterView, NamespacedSelection};
use crate::search::{selection_from_args, SearchChecklist, SearchRequest, Topk};
use crate::session::Session;

/// Search criteria as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub topk: Option<i64>,
    pub boolean: Vec<String>,
    pub string: Vec<String>,
}

impl SearchArgs {
    /// Validate everything that can be checked without the backend.
    pub fn to_request(&self, ctx: &CommandContext, session: &Session) -> Result<SearchRequest> {
        let topk = match self.topk {
            Some(value) => Topk::new(value)?,
            None => ctx.config.search.default_topk,
        };
        let selection = NamespacedSelection {
            boolean: selection_from_args(&self.boolean)?,
            string: selection_from_args(&self.string)?,
        };
        SearchChecklist::build(&session.input_suite()?).validate(&selection)?;
        Ok(SearchRequest::new(topk, &selection))
    }
}

/// Run a search and store its result in the session.
///
/// Validation failures happen before any request; a failed request leaves
/// the session file as it was.
pub fn run_search<B: Backend>(
    ctx: &CommandContext,
    backend: &B,
    session_path: &Path,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<()> {
    let session = Session::load(session_path)?;
    let request = args.to_request(ctx, &session)?;
    let key = session.key()?;

    let result = ctx
        .progress
        .with_spinner("Searching for similar B2B suites", || {
            backend.search(key, &request)
        })
        .inspect_err(log_backend_cause)?;

    let updated = session.with_result(request, result)?;
    updated
        .save(session_path)
        .with_context(|| format!("Failed to write session {}", session_path.display()))?;

    let list = updated.candidates()?;
    let input = updated.input_suite()?;
    info!(candidates = list.len(), "search result stored");

    let view = FilterView::build(
        &list,
        &input.test_case_names(),
        &updated.applied_selection(),
        &FilterSelection::new(),
    );
    let report = ResultsReport::new(&list, &view, None);
    let writer = ctx.writer();
    emit(format, None::<PathBuf>, &report, || writer.results(&list, &view, None))
}
