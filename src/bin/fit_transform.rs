//! Fit the persisted preprocessing transform (category vocabulary + min-max ranges) on the
//! record snapshot, for `features.scaling.mode = "fitted"`.

use clap::Parser;
use credit_scoring::features::FittedTransform;
use credit_scoring::{CustomerRecord, FeatureSchema, RecordStore, ServiceConfig, StructuredLogger};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "fit-transform", about = "Fit the preprocessing transform on a record snapshot")]
struct Args {
    /// JSON config file (defaults to $CREDIT_CONFIG_PATH or config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Snapshot to fit on; defaults to `data_path`
    #[arg(long)]
    data: Option<PathBuf>,
    /// Where to write the artifact; defaults to `features.scaling.transform_path`
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(ServiceConfig::path_from_env);
    let config = ServiceConfig::load(&config_path);
    StructuredLogger::init(config.log.json, &config.log.level);

    let out = args
        .out
        .or_else(|| config.features.scaling.transform_path.clone())
        .ok_or("no output path: pass --out or set features.scaling.transform_path")?;
    let data = args.data.unwrap_or_else(|| config.data_path.clone());

    let schema = FeatureSchema::from(&config.features);
    let store = RecordStore::load(&data, &schema)?;
    let rows: Vec<&CustomerRecord> = store.records().iter().collect();
    let transform = FittedTransform::fit(&rows, &schema)?;
    transform.save(&out)?;

    info!(
        out = %out.display(),
        rows = rows.len(),
        columns = transform.columns.len(),
        "preprocessing transform written"
    );
    Ok(())
}
