//! # lvs-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the License Verification Stack.
//! Binds to configurable port (default 8080).

use anyhow::Context;
use lvs_api::state::AppConfig;
use lvs_probe::ProbeConfig;
use metrics_exporter_prometheus::PrometheusBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured tracing; LVS_LOG_FORMAT=json switches to JSON lines.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if std::env::var("LVS_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::debug!(?config, "configuration loaded");

    let probe = ProbeConfig::from_env().context("invalid probe configuration")?;

    let state = lvs_api::bootstrap::bootstrap(config, &probe).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    let app = lvs_api::app(state.with_metrics(handle));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("LVS API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
