pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;

use clap::Parser;
use commands::batch::run_daily_analysis;
use error::Result;
use std::path::PathBuf;

/// Score every account in a workspace and print the batch report as JSON.
#[derive(Parser, Debug)]
#[command(name = "signalscore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rule-based account health, churn and growth scoring")]
pub struct Cli {
    /// Workspace holding `.signalscore/state.db` and `settings.json`
    #[arg(default_value = ".")]
    pub workspace: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

/// Entry point of the `signalscore` binary: runs one daily batch over the
/// workspace and prints the batch report as JSON.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let workspace_path = cli.workspace.to_string_lossy().into_owned();
    log::info!("Running daily analysis for workspace {workspace_path}");

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(run_daily_analysis(workspace_path))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
