use anyhow::Result;
use std::path::Path;

use telemetry_api::config::Config;
use telemetry_api::server;

/// Run the server until a shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path);
    telemetry_api::init_tracing(&config.server.log_level);

    server::start_server(config).await
}
