use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ontoserve_common::Config;
use ontoserve_store::ContentStore;
use ontoserve_web::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ontoserve_web=info".parse()?)
                .add_directive("ontoserve_store=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let state = Arc::new(AppState {
        store: ContentStore::new(&config.data_root, &config.static_root),
        api_key: config.api_key.clone(),
    });

    let app = build_app(state, &config.cors_origins);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("ontoserve web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
