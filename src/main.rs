//! Credit score service entrypoint: load snapshot + model once, then serve until Ctrl+C.

use credit_scoring::{config::ServiceConfig, logging::StructuredLogger, server, CreditService};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = ServiceConfig::path_from_env();
    let config = ServiceConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        config = %config_path.display(),
        data = %config.data_path.display(),
        model = %config.model.path.display(),
        scaling = ?config.features.scaling.mode,
        "credit score service starting"
    );

    let service = match CreditService::from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!(error = %e, "startup failed");
            return Err(e.into());
        }
    };

    server::run(service, &config.server).await?;
    info!("credit score service stopped");
    Ok(())
}
