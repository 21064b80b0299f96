//! Configuration for the note assistant

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration, loadable from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding endpoint configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// LLM endpoint configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector index configuration
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Source loader configuration
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl NotebookConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from `LUCIDNOTE_CONFIG`, `./lucidnote.toml`, or
    /// defaults, in that order
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("LUCIDNOTE_CONFIG") {
            return Self::from_file(path);
        }
        if Path::new("lucidnote.toml").exists() {
            return Self::from_file("lucidnote.toml");
        }
        Ok(Self::default())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (PDF multipart)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Embedding endpoint configuration (OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embeddings API
    pub base_url: String,
    /// API key (falls back to `OPENAI_API_KEY` when empty)
    #[serde(default)]
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            timeout_secs: 30,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// LLM endpoint configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat completions API
    pub base_url: String,
    /// API key (falls back to `LLM_API_KEY` when empty)
    #[serde(default)]
    pub api_key: String,
    /// Generation model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Remote Qdrant service
    #[default]
    Qdrant,
    /// In-process index (tests, standalone runs)
    Memory,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: IndexBackend,
    /// Qdrant base URL
    pub url: String,
    /// Qdrant API key (optional)
    #[serde(default)]
    pub api_key: String,
    /// Collection name; one flat collection shared across all source types
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Qdrant,
            url: "http://localhost:6333".to_string(),
            api_key: String::new(),
            collection: "notes".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Web page renderer backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// Headless Chrome via a WebDriver endpoint; executes client-side
    /// script before extracting the DOM
    #[default]
    Webdriver,
    /// Plain HTTP GET; no script execution
    Static,
}

/// Source loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Which page renderer to use for web ingestion
    #[serde(default)]
    pub renderer: RendererBackend,
    /// WebDriver endpoint (chromedriver)
    pub webdriver_url: String,
    /// Fetch timeout in seconds for web pages and transcripts
    pub fetch_timeout_secs: u64,
    /// Preferred transcript language
    pub transcript_language: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            renderer: RendererBackend::Webdriver,
            webdriver_url: "http://localhost:9515".to_string(),
            fetch_timeout_secs: 30,
            transcript_language: "en".to_string(),
        }
    }
}
