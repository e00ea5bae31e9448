use crate::config::Config;
use clap::Args;
use colored::Colorize;
use sitekit_renderer::{serve as run_renderer, RendererConfig};
use std::net::SocketAddr;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Project directory containing sitekit.config.json
    #[arg(short, long, default_value = ".")]
    pub cwd: String,

    /// Override the bind address from the config
    #[arg(short, long)]
    pub bind: Option<String>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.cwd)?;
    let bind: SocketAddr = args.bind.unwrap_or(config.bind).parse()?;

    println!(
        "{} public renderer on {}",
        "Serving".green().bold(),
        bind.to_string().cyan()
    );

    run_renderer(RendererConfig::new(config.backend_url, bind)).await?;
    Ok(())
}
