//! CDK4/6 Knowledge-Base web server
//!
//! Run with: cargo run -p cdk46kb-web

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cdk46kb_config::Config;
use cdk46kb_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cdk46kb=debug,info")),
        )
        .init();

    info!("Starting CDK4/6 KB web server, version {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("loading configuration")?;
    config.validate()?;
    if !config.paths.data_dir.is_dir() {
        warn!(
            "Data directory {} does not exist yet; run `cdk46kb-build all` first",
            config.paths.data_dir.display()
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(config.paths.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
