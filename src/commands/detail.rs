use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{emit, CommandContext};
use crate::cli::OutputFormat;
use crate::detail::{classification_drift, CandidateDetail};
use crate::session::{candidate_at, Session};

pub fn show_detail(
    ctx: &CommandContext,
    session_path: &Path,
    index: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let session = Session::load(session_path)?;
    let list = session.candidates()?;
    let input = session.input_suite()?;
    let candidate = candidate_at(&list, index)?;

    let drift = classification_drift(&input, candidate);
    if !drift.is_empty() {
        warn!(
            candidate = %candidate.name,
            test_cases = ?drift,
            "backend classification differs from the candidate's own attributes"
        );
    }

    let detail = CandidateDetail::build(
        index,
        candidate,
        ctx.config.tracker.issue_url_prefix.as_deref(),
    );
    let writer = ctx.writer();
    emit(format, output, &detail, || {
        format!("{}{}", writer.input_info(&input), writer.detail(&detail))
    })
}
