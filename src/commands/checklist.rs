use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{emit, CommandContext};
use crate::classify::selection_exclusion;
use crate::cli::OutputFormat;
use crate::core::{Namespace, TestSuite};
use crate::search::SearchChecklist;
use crate::session::Session;

pub fn show_checklist(ctx: &CommandContext, session_path: &Path, format: OutputFormat) -> Result<()> {
    let session = Session::load(session_path)?;
    let input = session.input_suite()?;
    log_exclusions(&input);
    let checklist = SearchChecklist::build(&input);

    let writer = ctx.writer();
    emit(format, None::<PathBuf>, &checklist, || writer.checklist(&checklist))
}

/// Log which rule kept each string attribute off the checklist.
fn log_exclusions(input: &TestSuite) {
    for (test_case, attrs) in &input.test_cases {
        for (name, value) in attrs.values(Namespace::String) {
            if let Some(rule) = selection_exclusion(Namespace::String, &name, &value) {
                debug!(test_case = %test_case, name = %name, ?rule, "not offered");
            }
        }
    }
}
