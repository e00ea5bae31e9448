use crate::config::Config;
use clap::Args;
use colored::Colorize;
use sitekit_engine::{compile_page, BlockRegistry, CompileOptions, EvalInput, PageEvaluator};
use sitekit_sync::{into_editor_state, ApiTransport, HttpApiClient};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project id to export
    pub project_id: String,

    /// Output directory for compiled HTML
    #[arg(short, long, default_value = "./dist")]
    pub output: PathBuf,

    /// Project directory containing sitekit.config.json
    #[arg(short, long, default_value = ".")]
    pub cwd: String,
}

pub async fn run(args: ExportArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.cwd)?;
    let client = HttpApiClient::new(&config.backend_url)?;

    let payload = client.fetch_project(&args.project_id).await?;
    let state = into_editor_state(payload, None)?;

    let registry = BlockRegistry::builtin();
    let evaluator = PageEvaluator::new(&registry);

    std::fs::create_dir_all(&args.output)?;

    for page in &state.pages {
        let rendered = evaluator.evaluate(&EvalInput::from(&state), &page.id);
        let html = compile_page(&state.project, page, &rendered, CompileOptions::default());

        let file_name = if page.path == "/" {
            "index.html".to_string()
        } else {
            format!("{}.html", page.path.trim_start_matches('/'))
        };
        let out_path = args.output.join(file_name);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, html)?;

        println!(
            "{} {} {}",
            "exported".green(),
            page.path.cyan(),
            format!("-> {}", out_path.display()).dimmed()
        );
    }

    println!(
        "{} {} pages written",
        "Done.".green().bold(),
        state.pages.len()
    );
    Ok(())
}
