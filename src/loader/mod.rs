//! Document loaders for the four ingestion sources
//!
//! Each loader converts one raw source into normalized documents carrying
//! provenance metadata. Every path must produce at least one document;
//! zero documents aborts the pipeline rather than being silently accepted.

mod note;
mod pdf;
mod web;
mod youtube;

pub use note::load_note;
pub use pdf::load_pdf;
pub use web::{PageRenderer, StaticRenderer, WebDriverRenderer, WebLoader};
pub use youtube::YoutubeLoader;

use crate::config::{LoaderConfig, RendererBackend};
use crate::error::{Error, Result};
use crate::types::Document;

/// A raw ingestion source, as received from the HTTP surface
#[derive(Debug, Clone)]
pub enum IngestSource {
    /// PDF file bytes uploaded by the user
    Pdf { filename: String, data: Vec<u8> },
    /// Web page URL
    Web { url: String },
    /// YouTube video URL
    Youtube { url: String },
    /// Free-form note text
    Note { content: String },
}

impl IngestSource {
    /// The source id this ingestion will be stored (and later deleted) under
    pub fn source_id(&self) -> String {
        match self {
            Self::Pdf { filename, .. } => filename.clone(),
            Self::Web { url } | Self::Youtube { url } => url.clone(),
            Self::Note { content } => note::note_source_id(content),
        }
    }
}

/// Dispatching loader over all four source types
pub struct DocumentLoader {
    web: WebLoader,
    youtube: YoutubeLoader,
}

impl DocumentLoader {
    /// Build a loader from configuration
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let renderer: Box<dyn PageRenderer> = match config.renderer {
            RendererBackend::Webdriver => Box::new(WebDriverRenderer::new(config)),
            RendererBackend::Static => Box::new(StaticRenderer::new(config)?),
        };

        Ok(Self {
            web: WebLoader::new(renderer),
            youtube: YoutubeLoader::new(config)?,
        })
    }

    /// Load a source into normalized documents
    ///
    /// Fails with `Error::EmptyIngestion` when a loader produced nothing
    /// usable; nothing is ever written to the index for such inputs.
    pub async fn load(&self, source: IngestSource) -> Result<Vec<Document>> {
        let docs = match source {
            IngestSource::Pdf { filename, data } => {
                tokio::task::spawn_blocking(move || load_pdf(&filename, &data))
                    .await
                    .map_err(|e| Error::Internal(format!("pdf task failed: {}", e)))??
            }
            IngestSource::Web { url } => self.web.load(&url).await?,
            IngestSource::Youtube { url } => self.youtube.load(&url).await?,
            IngestSource::Note { content } => load_note(&content)?,
        };

        let docs: Vec<Document> = docs
            .into_iter()
            .filter(|doc| !doc.text.trim().is_empty())
            .collect();

        if docs.is_empty() {
            return Err(Error::EmptyIngestion);
        }

        tracing::info!(count = docs.len(), "loaded documents");
        Ok(docs)
    }
}
