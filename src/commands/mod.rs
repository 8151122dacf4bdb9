//! CLI command implementations for cifinder.
//!
//! Each submodule handles one subcommand. Commands that talk to the
//! backend take it as a [`Backend`] so they can run against a fake.
//!
//! Available commands:
//! - **init**: write a default `.cifinder.toml`
//! - **upload**: send a report and start a session
//! - **checklist**: list attributes a search can be narrowed by
//! - **search**: run a similarity search and store the result
//! - **results**: filter and rank the stored result
//! - **detail**: diff one candidate against the input
//! - **download**: save a candidate's report

pub mod checklist;
pub mod detail;
pub mod download;
pub mod init;
pub mod results;
pub mod search;
pub mod upload;

pub use checklist::show_checklist;
pub use detail::show_detail;
pub use download::download_candidate;
pub use init::init_config;
pub use results::show_results;
pub use search::run_search;
pub use upload::upload_report;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::client::HttpBackend;
use crate::config::{apply_backend_override, load_config, load_config_from, CiFinderConfig};
use crate::error::CiFinderError;
use crate::formatting::FormattingConfig;
use crate::io;
use crate::output::{output_json, TerminalWriter};
use crate::progress::ProgressConfig;

/// Settings every command runs with, resolved once from the command line,
/// environment and config file.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: CiFinderConfig,
    pub formatting: FormattingConfig,
    pub progress: ProgressConfig,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => load_config(),
        };
        let formatting = if cli.plain {
            FormattingConfig::plain()
        } else {
            FormattingConfig::from_env()
        };

        Ok(Self {
            config: apply_backend_override(config, cli.backend.clone()),
            formatting,
            progress: ProgressConfig::from_env(cli.quiet),
        })
    }

    pub fn writer(&self) -> TerminalWriter {
        TerminalWriter::new(self.formatting)
    }

    pub fn backend(&self) -> Result<HttpBackend> {
        Ok(HttpBackend::new(&self.config.backend.url)?)
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self {
            config: CiFinderConfig::default(),
            formatting: FormattingConfig::plain(),
            progress: ProgressConfig { quiet_mode: true },
        }
    }
}

/// Log what a failed backend call reported before it was folded into the
/// user-facing message.
pub(crate) fn log_backend_cause(err: &CiFinderError) {
    if let Some(cause) = err.cause() {
        info!(code = %err.code(), cause, "backend call failed");
    }
}

/// Print `text` or `value` depending on the format, to stdout or a file.
pub(crate) fn emit<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    output: Option<PathBuf>,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(value, output),
        OutputFormat::Terminal => match output {
            Some(path) => write_text(&path, &text()),
            None => {
                print!("{}", text());
                Ok(())
            }
        },
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        io::ensure_dir(parent)?;
    }
    io::write_file(path, text)?;
    Ok(())
}
