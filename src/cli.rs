use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::BACKEND_URL_ENV;
use crate::session::DEFAULT_SESSION_FILE;

#[derive(Parser, Debug)]
#[command(name = "cifinder")]
#[command(
    about = "Find CI B2B test suites similar to a customer .ste report",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the nearest .cifinder.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, env = BACKEND_URL_ENV, global = true)]
    pub backend: Option<String>,

    /// Disable colors and Unicode table borders
    #[arg(long, global = true)]
    pub plain: bool,

    /// Hide the progress spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .cifinder.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Upload a .ste report and start a session
    Upload {
        /// Report to upload; the name must end in .ste
        file: PathBuf,

        /// Session file to create
        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// List the attributes that can be checked for a search
    Checklist {
        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        session: PathBuf,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Search for similar B2B suites
    Search {
        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        session: PathBuf,

        /// Number of suites to request (0-100, defaults to the configured value)
        #[arg(long, allow_negative_numbers = true)]
        topk: Option<i64>,

        /// Boolean criteria as TEST_CASE=name[,name...] (repeatable)
        #[arg(long = "bool", value_name = "TC=NAMES")]
        boolean: Vec<String>,

        /// String criteria as TEST_CASE=name[,name...] (repeatable)
        #[arg(long = "string", value_name = "TC=NAMES")]
        string: Vec<String>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Show the stored result, optionally narrowed by filters
    Results {
        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        session: PathBuf,

        /// Keep only candidates matching TEST_CASE=name[,name...] (repeatable)
        #[arg(long = "filter", value_name = "TC=NAMES")]
        filter: Vec<String>,

        /// Limit the number of suites shown
        #[arg(long = "top", visible_alias = "head")]
        top: Option<usize>,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how one candidate differs from the input
    Detail {
        /// Candidate index as listed by `results`
        index: usize,

        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        session: PathBuf,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the .ste report of a candidate
    Download {
        /// Candidate index as listed by `results`
        index: usize,

        #[arg(short, long, default_value = DEFAULT_SESSION_FILE)]
        session: PathBuf,

        /// Directory to save into (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_arguments() {
        let cli = Cli::try_parse_from([
            "cifinder",
            "search",
            "--topk",
            "-1",
            "--bool",
            "TC1=VolteEn",
            "--bool",
            "TC2=ImsEn",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 2);
        match cli.command {
            Commands::Search { topk, boolean, .. } => {
                assert_eq!(topk, Some(-1));
                assert_eq!(boolean, vec!["TC1=VolteEn", "TC2=ImsEn"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
