use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use backend_infrastructure::CONFIG_ENV;

#[derive(Parser, Debug)]
#[command(name = "tenderscope-backend")]
#[command(about = "Tenderscope Benford analysis server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Also write daily rolling log files into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Emit console logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = backend_bootstrap::init_logging(args.log_dir.as_deref(), args.log_json);

    if let Some(config) = args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    backend_bootstrap::run_standalone().await
}
