use crate::config::Config;
use anyhow::{bail, Context};
use clap::Args;
use colored::Colorize;
use sitekit_sync::{HttpApiClient, SnapshotStore, SyncEngine};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Project id to sync
    pub project_id: String,

    /// Project directory containing sitekit.config.json
    #[arg(short, long, default_value = ".")]
    pub cwd: String,
}

pub async fn run(args: SyncArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.cwd)?;

    let store = SnapshotStore::new(config.snapshot_dir(&args.cwd));
    let state = store
        .load(&args.project_id)?
        .with_context(|| format!("no local snapshot for project {}", args.project_id))?;

    let client = HttpApiClient::new(&config.backend_url)?;
    let engine = SyncEngine::new(client, &args.project_id);

    let report = engine.sync_to_cloud(&state).await?;

    for stage in &report.pushed {
        println!("{} {}", "pushed".green(), stage);
    }

    if let Some(failure) = &report.failure {
        eprintln!(
            "{} sync aborted at the {} stage",
            "error:".red().bold(),
            failure.stage
        );
        bail!("{} push failed: {}", failure.stage, failure.message);
    }

    println!("{} all resources pushed", "Done.".green().bold());
    Ok(())
}
