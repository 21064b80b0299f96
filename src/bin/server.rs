//! Note assistant server binary
//!
//! Run with: cargo run --bin lucidnote-server

use lucidnote::{config::NotebookConfig, server::NotebookServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lucidnote=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NotebookConfig::load()?;

    tracing::info!("configuration loaded");
    tracing::info!("  - embedding model: {}", config.embeddings.model);
    tracing::info!("  - llm model: {}", config.llm.model);
    tracing::info!("  - chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - collection: {}", config.vector_index.collection);

    let server = NotebookServer::new(config)?;

    println!("lucidnote server starting");
    println!("  API:    http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!();
    println!("Endpoints:");
    println!("  POST   /ingest - ingest a PDF, web page, or YouTube transcript");
    println!("  DELETE /ingest - remove a source by id");
    println!("  POST   /notes  - store a note");
    println!("  POST   /chat   - ask a question");

    server.start().await?;

    Ok(())
}
