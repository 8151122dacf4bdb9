use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{emit, log_backend_cause, CommandContext};
use crate::cli::OutputFormat;
use crate::client::Backend;
use crate::formatting::OutputFormatter;
use crate::io;
use crate::search::check_report_path;
use crate::session::Session;

/// Upload a report and write a fresh session for it.
///
/// The extension is checked before the file is read, and the session file
/// is only written once the response has been validated.
pub fn upload_report<B: Backend>(
    ctx: &CommandContext,
    backend: &B,
    file: &Path,
    session_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let file_name = check_report_path(file)?;
    let contents = io::read_bytes(file)
        .with_context(|| format!("Failed to read report {}", file.display()))?;

    let wire = ctx
        .progress
        .with_spinner(&format!("Uploading {file_name}"), || {
            backend.upload(&file_name, contents)
        })
        .inspect_err(log_backend_cause)?;

    let session = Session::new(wire)?;
    let suite = session.input_suite()?;
    session
        .save(session_path)
        .with_context(|| format!("Failed to write session {}", session_path.display()))?;
    info!(session = %session_path.display(), "session started");

    let writer = ctx.writer();
    emit(format, None::<PathBuf>, &suite, || {
        format!(
            "{}{}\n",
            writer.input_info(&suite),
            writer.formatter().dim(&format!("Session saved to {}", session_path.display()))
        )
    })
}
