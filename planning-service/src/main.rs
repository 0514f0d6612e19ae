use std::sync::Arc;

use anyhow::Result;
use planning_service::{
    config::AppConfig,
    http_api::{self, ApiState},
    metrics_server, observability,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    tracing::info!(
        unit_consumption = cfg.params.unit_consumption,
        ramp = %cfg.params.ramp,
        "planning parameters loaded"
    );

    let state = ApiState {
        params: Arc::new(cfg.params.clone()),
    };

    http_api::serve(&cfg.api.bind_addr, state).await
}
