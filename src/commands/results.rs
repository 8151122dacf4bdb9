use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{emit, CommandContext};
use crate::cli::OutputFormat;
use crate::core::CandidateList;
use crate::filter::FilterView;
use crate::search::selection_from_args;
use crate::session::Session;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub index: usize,
    pub name: String,
    pub score: f64,
    pub downloadable: bool,
}

/// JSON form of the result page.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport<'a> {
    pub name: &'a str,
    pub top_score: Option<f64>,
    pub total: usize,
    pub candidates: Vec<RankedCandidate>,
    pub filters: &'a FilterView,
}

impl<'a> ResultsReport<'a> {
    pub fn new(list: &'a CandidateList, view: &'a FilterView, top: Option<usize>) -> Self {
        let candidates = view
            .visible
            .iter()
            .take(top.unwrap_or(usize::MAX))
            .filter_map(|&index| {
                list.get(index).map(|c| RankedCandidate {
                    index,
                    name: c.name.clone(),
                    score: c.score,
                    downloadable: c.is_downloadable(),
                })
            })
            .collect();
        Self {
            name: &list.name,
            top_score: list.top_score,
            total: list.len(),
            candidates,
            filters: view,
        }
    }
}

pub fn show_results(
    ctx: &CommandContext,
    session_path: &Path,
    filters: &[String],
    top: Option<usize>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let session = Session::load(session_path)?;
    let list = session.candidates()?;
    let input = session.input_suite()?;
    let selection = selection_from_args(filters)?;

    let view = FilterView::build(
        &list,
        &input.test_case_names(),
        &session.applied_selection(),
        &selection,
    );
    let report = ResultsReport::new(&list, &view, top);
    let writer = ctx.writer();
    emit(format, output, &report, || writer.results(&list, &view, top))
}
