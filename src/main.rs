use anyhow::Result;
use clap::Parser;
use cifinder::cli::{Cli, Commands};
use cifinder::commands::search::SearchArgs;
use cifinder::commands::{self, CommandContext};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    if let Commands::Init { force } = cli.command {
        return commands::init_config(&std::env::current_dir()?, force);
    }

    let ctx = CommandContext::from_cli(&cli)?;
    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Upload {
            file,
            output,
            format,
        } => commands::upload_report(&ctx, &ctx.backend()?, &file, &output, format),
        Commands::Checklist { session, format } => {
            commands::show_checklist(&ctx, &session, format)
        }
        Commands::Search {
            session,
            topk,
            boolean,
            string,
            format,
        } => {
            let args = SearchArgs {
                topk,
                boolean,
                string,
            };
            commands::run_search(&ctx, &ctx.backend()?, &session, &args, format)
        }
        Commands::Results {
            session,
            filter,
            top,
            format,
            output,
        } => commands::show_results(&ctx, &session, &filter, top, format, output),
        Commands::Detail {
            index,
            session,
            format,
            output,
        } => commands::show_detail(&ctx, &session, index, format, output),
        Commands::Download {
            index,
            session,
            dir,
        } => commands::download_candidate(&ctx, &ctx.backend()?, &session, index, dir).map(|_| ()),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises cifinder from warn to info and
/// `-vv` to debug.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cifinder={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
