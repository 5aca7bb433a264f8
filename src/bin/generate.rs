//! Synthetic dataset generator: writes demographics, transactions, telco, social media and
//! repayment history CSVs, then prints a one-line JSON summary.

use clap::Parser;
use credit_scoring::{config::ServiceConfig, generator, logging::StructuredLogger};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "generate", about = "Write synthetic customer datasets")]
struct Args {
    /// JSON config file (defaults to $CREDIT_CONFIG_PATH or config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Number of customer profiles
    #[arg(long)]
    customers: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(ServiceConfig::path_from_env);
    let service_config = ServiceConfig::load(&config_path);
    StructuredLogger::init(service_config.log.json, &service_config.log.level);
    let mut config = service_config.generator;
    if let Some(dir) = args.out_dir {
        config.out_dir = dir;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(n) = args.customers {
        config.n_customers = n;
    }

    info!(out_dir = %config.out_dir.display(), seed = config.seed, "generating datasets");

    let summary = generator::run(&config)?;
    StructuredLogger::emit_json(&summary, &mut std::io::stdout())?;
    Ok(())
}
