use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use certvault_api::{config::CertVaultConfig, context::ApiContext, server};
use certvault_db::{blobs::MemoryBlobStore, storage::MemoryStorage};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CertVaultConfig::parse();

    if config.dump_openapi {
        // The document does not depend on the stores, so none are opened.
        let context = ApiContext::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryBlobStore::new()),
        );
        let allow_origin = config.public_url.parse::<HeaderValue>()?;
        let (_, api) = server::router(context, allow_origin);
        print!("{}", api.to_pretty_json()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or(
                "certvault_api=info,certvault_db=info,certvault_x509=info".into(),
            ),
        )
        .pretty()
        .init();

    let (router, _) = server::make(&config).await?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(
        db_path = %config.db_path.display(),
        upload_dir = %config.upload_dir.display(),
        "Listening on http://{:?}",
        config.bind_addr
    );

    axum::serve(listener, router)
        .await
        .context("server terminated")?;

    Ok(())
}
