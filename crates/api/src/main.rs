use anyhow::Context;

use amara_api::app::{self, ServicesConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    amara_observability::init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let config = ServicesConfig::from_env();

    let app = app::build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
