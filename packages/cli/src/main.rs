mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::{export, serve, sync, ExportArgs, ServeArgs, SyncArgs};
use tracing_subscriber::EnvFilter;

/// Sitekit CLI - compose and publish block-built sites
#[derive(Parser, Debug)]
#[command(name = "sitekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the public site renderer
    Serve(ServeArgs),

    /// Push a local editor snapshot to the backend
    Sync(SyncArgs),

    /// Compile a project's pages to HTML files
    Export(ExportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve::run(args).await,
        Command::Sync(args) => sync::run(args).await,
        Command::Export(args) => export::run(args).await,
    }
}
