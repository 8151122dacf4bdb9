use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{log_backend_cause, CommandContext};
use crate::client::{Backend, DownloadRequest};
use crate::formatting::OutputFormatter;
use crate::io;
use crate::session::{candidate_at, Session};

/// Fetch a candidate's report and save it as `<name>.ste`.
pub fn download_candidate<B: Backend>(
    ctx: &CommandContext,
    backend: &B,
    session_path: &Path,
    index: usize,
    dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let session = Session::load(session_path)?;
    let list = session.candidates()?;
    let candidate = candidate_at(&list, index)?;
    let request = DownloadRequest::for_candidate(candidate, ctx.config.download.delete_ste)?;

    let bytes = ctx
        .progress
        .with_spinner("Try to download the B2B", || backend.download(&request))
        .inspect_err(log_backend_cause)?;

    let dir = dir.unwrap_or_else(|| ctx.config.download.directory.clone());
    let path = io::write_report(&dir, &candidate.name, &bytes)
        .with_context(|| format!("Failed to save report into {}", dir.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "report saved");

    let writer = ctx.writer();
    println!(
        "{}",
        writer
            .formatter()
            .success(&format!("Success to download! Saved {}", path.display()))
    );
    Ok(path)
}
